mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::routing::post;
use axum::{Json, Router};
use common::{product, FixedIndex};
use serde_json::{json, Value};
use shopchat::error::{ChatbotError, Result};
use shopchat::retrieval::{
    render_snippets, Embedder, HashingEmbedder, InMemoryIndex, RemoteEmbedder, SemanticRetriever,
    Snippet, VectorIndex,
};

/// Counts batches and delegates to a hashing embedder.
struct CountingEmbedder {
    batches: Arc<AtomicUsize>,
    inner: HashingEmbedder,
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_batch(texts).await
    }
}

/// Drops the last vector of every batch.
struct ShortEmbedder;

#[async_trait]
impl Embedder for ShortEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().skip(1).map(|_| vec![1.0]).collect())
    }
}

fn catalog_records() -> Vec<shopchat::models::ProductRecord> {
    vec![
        product("Blue Denim Jeans", Some(999.0), Some(4.0), Some("Levi's")),
        product("Puma Running Shoes", Some(2499.0), Some(4.5), Some("Puma")),
        product("Cotton Kurta", Some(599.0), Some(3.9), Some("FabIndia")),
    ]
}

#[test]
fn test_hashing_embedder_is_deterministic_and_normalized() {
    let embedder = HashingEmbedder::new(64);
    let a = embedder.vectorize("Puma running shoes");
    let b = embedder.vectorize("puma RUNNING shoes!");

    assert_eq!(a.len(), 64);
    assert_eq!(a, b);
    let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[test]
fn test_hashing_embedder_empty_text_is_zero_vector() {
    let vector = HashingEmbedder::default().vectorize("   ");
    assert_eq!(vector.len(), 384);
    assert!(vector.iter().all(|v| *v == 0.0));
}

#[tokio::test]
async fn test_index_ranks_by_similarity() {
    let index = InMemoryIndex::build(&catalog_records(), Box::new(HashingEmbedder::new(512)), 2)
        .await
        .unwrap();
    assert_eq!(index.len(), 3);

    let hits = index.search("puma running shoes", 2).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits[0].text.starts_with("Product Name: Puma Running Shoes"));
    assert_eq!(hits[0].source, "https://www.flipkart.com/puma-running-shoes");
}

#[tokio::test]
async fn test_index_embeds_in_batches() {
    let batches = Arc::new(AtomicUsize::new(0));
    let embedder = CountingEmbedder {
        batches: Arc::clone(&batches),
        inner: HashingEmbedder::new(32),
    };

    let mut records = catalog_records();
    records.extend(catalog_records());
    records.push(product("Extra", None, None, None));
    InMemoryIndex::build(&records, Box::new(embedder), 3).await.unwrap();

    assert_eq!(batches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_index_rejects_short_embedding_batch() {
    let result = InMemoryIndex::build(&catalog_records(), Box::new(ShortEmbedder), 64).await;
    assert!(matches!(result, Err(ChatbotError::CapabilityError(_))));
}

#[tokio::test]
async fn test_empty_index_returns_no_hits() {
    let index = InMemoryIndex::build(&[], Box::new(HashingEmbedder::default()), 64)
        .await
        .unwrap();
    assert!(index.is_empty());
    assert!(index.search("anything", 8).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_retriever_limits_to_k() {
    let snippets: Vec<Snippet> = (0..10)
        .map(|i| Snippet {
            text: format!("doc {}", i),
            source: format!("https://x/{}", i),
        })
        .collect();
    let index: Arc<dyn VectorIndex> = Arc::new(FixedIndex { snippets });

    assert_eq!(SemanticRetriever::new(Arc::clone(&index)).search("q").await.unwrap().len(), 8);
    assert_eq!(SemanticRetriever::with_k(index, 3).search("q").await.unwrap().len(), 3);
}

#[test]
fn test_render_snippets() {
    let snippets = vec![
        Snippet {
            text: "Product Name: A".to_string(),
            source: "https://x/a".to_string(),
        },
        Snippet {
            text: "Product Name: B".to_string(),
            source: "https://x/b".to_string(),
        },
    ];
    assert_eq!(
        render_snippets(&snippets),
        "Product Name: A\nSource: https://x/a\n\nProduct Name: B\nSource: https://x/b"
    );
    assert_eq!(render_snippets(&[]), "No matching products found.");
}

#[tokio::test]
async fn test_remote_embedder_orders_by_index() {
    let router = Router::new().route(
        "/v1/embeddings",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["model"], "embed-model");
            assert_eq!(body["input"].as_array().unwrap().len(), 2);
            Json(json!({
                "data": [
                    { "index": 1, "embedding": [0.0, 1.0] },
                    { "index": 0, "embedding": [1.0, 0.0] }
                ]
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let embedder = RemoteEmbedder::new(
        "key",
        &format!("http://{}/v1/embeddings", addr),
        "embed-model",
        5,
    )
    .unwrap();
    let vectors = embedder
        .embed_batch(&["first".to_string(), "second".to_string()])
        .await
        .unwrap();

    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}
