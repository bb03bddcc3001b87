//! End-to-end tests for the qualitative agent over a temporary report corpus.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use scout_rag::{
    EmbeddingProvider, EmptyContextPolicy, ErrorKind, HashEmbeddingProvider, InMemoryVectorStore,
    NO_DOCUMENTS_MESSAGE, Prompt, QualitativeAgent, RagConfig, RagError, RagPipeline, Result,
    TextGenerator,
};

/// Wraps the hashing provider and counts calls.
#[derive(Default)]
struct CountingEmbedder {
    inner: HashEmbeddingProvider,
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Echoes the sources it was given and counts calls.
#[derive(Default)]
struct EchoGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let sources: Vec<_> = prompt.passages.iter().map(|p| p.source.as_str()).collect();
        Ok(format!("sources: {}", sources.join(", ")))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &Prompt) -> Result<String> {
        Err(RagError::Generation { model: "failing".into(), message: "quota exceeded".into() })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn write_corpus(root: &Path) {
    fs::write(
        root.join("saka.txt"),
        "Bukayo Saka is a left-footed right winger. He dribbles past full backs and \
         delivers dangerous crosses into the box.",
    )
    .unwrap();
    fs::write(
        root.join("rice.txt"),
        "Declan Rice is a defensive midfielder. He intercepts passes, screens the back four \
         and carries the ball forward through midfield.",
    )
    .unwrap();
    fs::write(
        root.join("raya.txt"),
        "David Raya is a goalkeeper whose distribution with both feet starts attacks.",
    )
    .unwrap();
}

fn pipeline(embedder: Arc<dyn EmbeddingProvider>, config: RagConfig) -> RagPipeline {
    RagPipeline::builder()
        .config(config)
        .embedding_provider(embedder)
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn empty_corpus_answers_without_upstream_calls() {
    let temp = tempfile::tempdir().unwrap();
    let embedder = Arc::new(CountingEmbedder::default());
    let generator = Arc::new(EchoGenerator::default());

    let agent = QualitativeAgent::from_directory(
        temp.path().join("missing"),
        pipeline(embedder.clone(), RagConfig::default()),
        generator.clone(),
    )
    .await
    .unwrap();

    assert!(!agent.is_ready());
    assert_eq!(agent.document_count(), 0);
    let answer = agent.answer_question("Who is the best winger?").await.unwrap();
    assert_eq!(answer, NO_DOCUMENTS_MESSAGE);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn answers_from_the_nearest_reports() {
    let temp = tempfile::tempdir().unwrap();
    write_corpus(temp.path());
    let generator = Arc::new(EchoGenerator::default());
    let config = RagConfig::builder().top_k(1).build().unwrap();

    let agent = QualitativeAgent::from_directory(
        temp.path(),
        pipeline(Arc::new(HashEmbeddingProvider::default()), config),
        generator.clone(),
    )
    .await
    .unwrap();

    assert_eq!(agent.document_count(), 3);
    assert_eq!(agent.chunk_count(), 3);

    let answer = agent.answer_question("which goalkeeper has good distribution?").await.unwrap();
    assert_eq!(answer, "sources: raya.txt");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_questions_give_identical_answers() {
    let temp = tempfile::tempdir().unwrap();
    write_corpus(temp.path());
    let agent = QualitativeAgent::from_directory(
        temp.path(),
        pipeline(Arc::new(HashEmbeddingProvider::default()), RagConfig::default()),
        Arc::new(EchoGenerator::default()),
    )
    .await
    .unwrap();

    let first = agent.answer_question("Who carries the ball through midfield?").await.unwrap();
    let second = agent.answer_question("Who carries the ball through midfield?").await.unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("sources: rice.txt"));
}

#[tokio::test]
async fn blank_question_is_a_validation_error() {
    let temp = tempfile::tempdir().unwrap();
    write_corpus(temp.path());
    let agent = QualitativeAgent::from_directory(
        temp.path(),
        pipeline(Arc::new(HashEmbeddingProvider::default()), RagConfig::default()),
        Arc::new(EchoGenerator::default()),
    )
    .await
    .unwrap();

    let err = agent.answer_question("   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn generation_failure_is_reported_and_agent_stays_usable() {
    let temp = tempfile::tempdir().unwrap();
    write_corpus(temp.path());
    let config = RagConfig::builder()
        .request_timeout(Duration::from_secs(5))
        .empty_context(EmptyContextPolicy::Generate)
        .build()
        .unwrap();
    let agent = QualitativeAgent::from_directory(
        temp.path(),
        pipeline(Arc::new(HashEmbeddingProvider::default()), config),
        Arc::new(FailingGenerator),
    )
    .await
    .unwrap();

    for _ in 0..2 {
        let err = agent.answer_question("Who crosses best?").await.unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("quota exceeded"));
    }
    assert_eq!(agent.pipeline().indexed_chunks().await, 3);
}
