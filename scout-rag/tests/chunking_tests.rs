//! Property tests for chunk size, overlap and coverage.

use proptest::prelude::*;
use scout_rag::{Chunker, Document, FixedSizeChunker, RecursiveChunker};

fn expected_fixed_chunks(len: usize, size: usize, overlap: usize) -> usize {
    if len <= size {
        return 1;
    }
    (len - overlap).div_ceil(size - overlap)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn fixed_chunk_count_matches_window_formula(
        text in "[a-zé ]{1,400}",
        size in 2usize..60,
        overlap_ratio in 0.0f64..0.9,
    ) {
        let overlap = ((size as f64) * overlap_ratio) as usize;
        let overlap = overlap.min(size - 1);
        let chunks = FixedSizeChunker::new(size, overlap).chunk(&Document::new("d", text.clone()));
        let len = text.chars().count();

        prop_assert_eq!(chunks.len(), expected_fixed_chunks(len, size, overlap));
        prop_assert!(chunks.iter().all(|c| c.text.chars().count() <= size));

        // Stripping each chunk's overlap prefix reassembles the original text.
        let mut rebuilt: String = chunks[0].text.clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.text.chars().skip(overlap));
        }
        prop_assert_eq!(rebuilt, text);
    }

    #[test]
    fn recursive_chunks_never_exceed_size(
        words in proptest::collection::vec("[a-zA-Z]{1,12}", 1..200),
        size in 20usize..200,
    ) {
        let text = words.join(" ");
        let chunks = RecursiveChunker::new(size, size / 10).chunk(&Document::new("d", text));
        prop_assert!(!chunks.is_empty());
        prop_assert!(chunks.iter().all(|c| c.text.chars().count() <= size));
        prop_assert!(chunks.iter().all(|c| !c.text.trim().is_empty()));
    }
}
