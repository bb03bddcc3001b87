//! Generative model seam and the prompt handed to it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One retrieved passage as presented to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    /// ID of the document the passage came from.
    pub source: String,
    /// Passage text.
    pub text: String,
}

/// A question plus the passages retrieved for it, in retrieval order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    /// The analyst's question.
    pub question: String,
    /// Supporting context, nearest first.
    pub passages: Vec<Passage>,
}

impl Prompt {
    const INSTRUCTION: &'static str = "You are a football scouting analyst. Use the following \
        excerpts from scouting reports to answer the question at the end. If the excerpts do \
        not contain the answer, say that you don't know instead of making one up.";

    /// Render the prompt as a single block of text.
    ///
    /// Passages appear in the order given, each labelled with its position
    /// and source document.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            Self::INSTRUCTION.len()
                + self.question.len()
                + self.passages.iter().map(|p| p.text.len() + p.source.len() + 24).sum::<usize>()
                + 64,
        );
        out.push_str(Self::INSTRUCTION);
        out.push_str("\n\nContext:\n");
        if self.passages.is_empty() {
            out.push_str("(no relevant scouting reports were found)\n");
        }
        for (i, passage) in self.passages.iter().enumerate() {
            out.push_str(&format!(
                "[{}] (source: {})\n{}\n\n",
                i + 1,
                passage.source,
                passage.text
            ));
        }
        out.push_str("\nQuestion: ");
        out.push_str(&self.question);
        out.push_str("\nHelpful answer:");
        out
    }
}

/// A generative model: prompt in, single textual answer out.
///
/// Remote backends send [`Prompt::render`]; local backends may use the
/// structured passages directly.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce an answer for `prompt`.
    async fn generate(&self, prompt: &Prompt) -> Result<String>;

    /// Model name used in logs and error messages.
    fn name(&self) -> &str;
}

/// Offline generator that answers by quoting the nearest passages.
///
/// Used when no model API key is configured so that the qualitative panel
/// still shows the evidence retrieval found.
#[derive(Debug, Clone)]
pub struct ExtractiveGenerator {
    max_passages: usize,
}

impl ExtractiveGenerator {
    /// Quote at most `max_passages` passages per answer.
    pub fn new(max_passages: usize) -> Self {
        Self { max_passages: max_passages.max(1) }
    }
}

impl Default for ExtractiveGenerator {
    fn default() -> Self {
        Self::new(2)
    }
}

#[async_trait]
impl TextGenerator for ExtractiveGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        if prompt.passages.is_empty() {
            return Ok("I don't know: no scouting report excerpt covers this question.".to_string());
        }
        let quoted = prompt
            .passages
            .iter()
            .take(self.max_passages)
            .map(|p| format!("From {}:\n{}", p.source, p.text.trim()))
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(format!("Most relevant report excerpts:\n\n{quoted}"))
    }

    fn name(&self) -> &str {
        "extractive"
    }
}
