//! Semantic product search over an opaque vector index.

pub mod embedding;
pub mod index;

pub use embedding::{Embedder, HashingEmbedder, RemoteEmbedder, DEFAULT_HASHING_DIMENSIONS};
pub use index::{InMemoryIndex, DEFAULT_BATCH_SIZE};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Number of records returned per search.
pub const DEFAULT_TOP_K: usize = 8;

/// A retrieved product document and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    /// Originating product URL.
    pub source: String,
}

/// Similarity search capability: the top `k` documents for a query, most
/// similar first.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Snippet>>;
}

pub struct SemanticRetriever {
    index: Arc<dyn VectorIndex>,
    k: usize,
}

impl SemanticRetriever {
    pub fn new(index: Arc<dyn VectorIndex>) -> Self {
        Self::with_k(index, DEFAULT_TOP_K)
    }

    pub fn with_k(index: Arc<dyn VectorIndex>, k: usize) -> Self {
        Self { index, k }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Snippet>> {
        let snippets = self.index.search(query, self.k).await?;
        debug!(query, hits = snippets.len(), "Semantic search");
        Ok(snippets)
    }

    /// Search and render the hits as one tool-result text block.
    pub async fn search_text(&self, query: &str) -> Result<String> {
        let snippets = self.search(query).await?;
        Ok(render_snippets(&snippets))
    }
}

pub fn render_snippets(snippets: &[Snippet]) -> String {
    if snippets.is_empty() {
        return "No matching products found.".to_string();
    }
    snippets
        .iter()
        .map(|s| format!("{}\nSource: {}", s.text, s.source))
        .collect::<Vec<_>>()
        .join("\n\n")
}
