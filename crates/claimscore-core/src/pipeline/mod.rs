//! The RAG pipeline under evaluation.
//!
//! Two adapters ship with the crate: [`http::HttpPipeline`] talks to a live
//! service, [`recorded::RecordedPipeline`] replays answers captured earlier.

pub mod http;
pub mod recorded;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One retrieved chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagContext {
    pub text: String,
    pub chunk_number: u32,
}

/// The pipeline's reply to one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub answer: String,
    #[serde(default)]
    pub contexts: Vec<RagContext>,
}

impl Generation {
    /// Chunk texts joined with newlines, as shown to the direct judge
    pub fn joined_context(&self) -> String {
        self.contexts
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A retrieval-augmented generation system.
///
/// Each `generate` call stands alone: implementations must not carry
/// conversation state from one query to the next.
#[async_trait]
pub trait RagPipeline: Send + Sync {
    /// Answer `query`, returning the retrieved chunks alongside the answer
    async fn generate(&self, query: &str) -> Result<Generation>;

    /// Ingest a document into the pipeline's store
    async fn load(&self, path: &Path) -> Result<()>;
}
