use std::cmp::Ordering;

use async_trait::async_trait;
use tracing::{debug, info};

use super::embedding::Embedder;
use super::{Snippet, VectorIndex};
use crate::error::{ChatbotError, Result};
use crate::models::ProductRecord;

pub const DEFAULT_BATCH_SIZE: usize = 64;

struct IndexedDocument {
    snippet: Snippet,
    vector: Vec<f32>,
}

/// Flat cosine-similarity index held in memory for the process lifetime.
pub struct InMemoryIndex {
    embedder: Box<dyn Embedder>,
    documents: Vec<IndexedDocument>,
}

impl InMemoryIndex {
    /// Embed every record with the document template, `batch_size` at a time.
    pub async fn build(
        records: &[ProductRecord],
        embedder: Box<dyn Embedder>,
        batch_size: usize,
    ) -> Result<Self> {
        let batch_size = batch_size.max(1);
        let mut documents = Vec::with_capacity(records.len());

        for (batch_number, chunk) in records.chunks(batch_size).enumerate() {
            let texts: Vec<String> = chunk.iter().map(ProductRecord::document_text).collect();
            let vectors = embedder.embed_batch(&texts).await?;
            if vectors.len() != texts.len() {
                return Err(ChatbotError::CapabilityError(format!(
                    "embedder returned {} vectors for {} documents",
                    vectors.len(),
                    texts.len()
                )));
            }
            for ((record, text), vector) in chunk.iter().zip(texts).zip(vectors) {
                documents.push(IndexedDocument {
                    snippet: Snippet {
                        text,
                        source: record.url.clone(),
                    },
                    vector,
                });
            }
            debug!(batch = batch_number + 1, indexed = documents.len(), "Embedded batch");
        }

        info!(documents = documents.len(), "Built in-memory vector index");
        Ok(Self {
            embedder,
            documents,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Snippet>> {
        let query_vector = self.embedder.embed(query).await?;

        let mut scored: Vec<(f64, &IndexedDocument)> = self
            .documents
            .iter()
            .map(|doc| (cosine_similarity(&query_vector, &doc.vector), doc))
            .collect();

        // Stable: equal scores keep catalog order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, doc)| doc.snippet.clone())
            .collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();

    let mag_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}
