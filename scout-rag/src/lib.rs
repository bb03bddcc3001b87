//! # scout-rag
//!
//! Retrieval-augmented question answering over a corpus of scouting reports.
//!
//! ## Overview
//!
//! The crate is organised as a pipeline of narrow, swappable stages:
//!
//! - [`load_documents`]: read every plain-text report under a directory
//! - [`Chunker`]: split reports into overlapping chunks
//!   ([`RecursiveChunker`], [`FixedSizeChunker`])
//! - [`EmbeddingProvider`]: turn text into vectors
//!   ([`HashEmbeddingProvider`], or Gemini with the `gemini` feature)
//! - [`VectorStore`]: nearest-neighbour search ([`InMemoryVectorStore`])
//! - [`TextGenerator`]: produce an answer from a [`Prompt`]
//!   ([`ExtractiveGenerator`], or Gemini with the `gemini` feature)
//!
//! [`RagPipeline`] composes the first four, [`AnswerSynthesizer`] wraps the
//! generator, and [`QualitativeAgent`] ties them together behind
//! [`answer_question`](QualitativeAgent::answer_question).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scout_rag::{
//!     ExtractiveGenerator, HashEmbeddingProvider, InMemoryVectorStore, QualitativeAgent,
//!     RagConfig, RagPipeline,
//! };
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(HashEmbeddingProvider::default()))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//! let generator = Arc::new(ExtractiveGenerator::default());
//! let agent = QualitativeAgent::from_directory("data/articles", pipeline, generator).await?;
//! println!("{}", agent.answer_question("Who is the best ball carrier?").await?);
//! ```

pub mod agent;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod generation;
pub mod hashing;
pub mod inmemory;
pub mod loader;
pub mod pipeline;
pub mod synthesis;
pub mod vectorstore;

pub use agent::{NO_DOCUMENTS_MESSAGE, QualitativeAgent};
pub use chunking::{Chunker, FixedSizeChunker, RecursiveChunker, chunker_for};
pub use config::{ChunkStrategy, EmptyContextPolicy, RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{ErrorKind, RagError, Result};
#[cfg(feature = "gemini")]
pub use gemini::{GeminiEmbeddingProvider, GeminiGenerator};
pub use generation::{ExtractiveGenerator, Passage, Prompt, TextGenerator};
pub use hashing::HashEmbeddingProvider;
pub use inmemory::InMemoryVectorStore;
pub use loader::load_documents;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use synthesis::{AnswerSynthesizer, NO_RELEVANT_CONTEXT_MESSAGE};
pub use vectorstore::VectorStore;
