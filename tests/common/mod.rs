#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use shopchat::catalog::Catalog;
use shopchat::error::{ChatbotError, Result};
use shopchat::llm::{LanguageModel, ModelReply};
use shopchat::models::{Message, ProductRecord, Role, ToolCall};
use shopchat::orchestrator::ConversationOrchestrator;
use shopchat::retrieval::{SemanticRetriever, Snippet, VectorIndex};
use shopchat::structured::StructuredQueryEngine;
use shopchat::tools::{catalog_tools, STRUCTURED_QUERY_TOOL};

pub enum Step {
    Reply(ModelReply),
    Fail(String),
}

/// Plays back a fixed list of replies and records every history it was
/// shown.
pub struct ScriptedModel {
    steps: Mutex<VecDeque<Step>>,
    pub seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedModel {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn last_history(&self) -> Vec<Message> {
        self.seen.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn respond(&self, history: &[Message], _tools: &[Value]) -> Result<ModelReply> {
        self.seen.lock().unwrap().push(history.to_vec());
        match self.steps.lock().unwrap().pop_front() {
            Some(Step::Reply(reply)) => Ok(reply),
            Some(Step::Fail(message)) => Err(ChatbotError::CapabilityError(message)),
            None => Err(ChatbotError::CapabilityError("script exhausted".to_string())),
        }
    }
}

/// Answers with every user message in the history joined by " | ".
pub struct HistoryEchoModel;

#[async_trait]
impl LanguageModel for HistoryEchoModel {
    async fn respond(&self, history: &[Message], _tools: &[Value]) -> Result<ModelReply> {
        let users: Vec<&str> = history
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.text_content())
            .collect();
        Ok(ModelReply::Answer(users.join(" | ")))
    }
}

/// Yields to the scheduler before every reply. A latest user message of the
/// form `lookup: <question>` gets one structured-query round first; anything
/// else is echoed back.
pub struct YieldingModel;

#[async_trait]
impl LanguageModel for YieldingModel {
    async fn respond(&self, history: &[Message], _tools: &[Value]) -> Result<ModelReply> {
        tokio::task::yield_now().await;

        if let Some(last) = history.last().filter(|m| m.role == Role::Tool) {
            return Ok(ModelReply::Answer(format!("tool said: {}", last.text_content())));
        }
        let latest = history
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.text_content())
            .unwrap_or_default();
        match latest.strip_prefix("lookup:") {
            Some(question) => Ok(ModelReply::ToolCalls {
                content: None,
                calls: vec![query_call("", STRUCTURED_QUERY_TOOL, question.trim())],
            }),
            None => Ok(ModelReply::Answer(format!("echo: {}", latest))),
        }
    }
}

/// Always returns the same snippets, truncated to `k`.
pub struct FixedIndex {
    pub snippets: Vec<Snippet>,
}

#[async_trait]
impl VectorIndex for FixedIndex {
    async fn search(&self, _query: &str, k: usize) -> Result<Vec<Snippet>> {
        Ok(self.snippets.iter().take(k).cloned().collect())
    }
}

pub fn answer(text: &str) -> Step {
    Step::Reply(ModelReply::Answer(text.to_string()))
}

pub fn tool_calls(calls: Vec<ToolCall>) -> Step {
    Step::Reply(ModelReply::ToolCalls {
        content: None,
        calls,
    })
}

pub fn query_call(id: &str, tool: &str, query: &str) -> ToolCall {
    ToolCall::new(id, tool, serde_json::json!({ "query": query }).to_string())
}

pub fn product(
    name: &str,
    price: Option<f64>,
    rating: Option<f64>,
    brand: Option<&str>,
) -> ProductRecord {
    ProductRecord {
        pid: format!("PID-{}", name),
        url: format!("https://www.flipkart.com/{}", name.to_lowercase().replace(' ', "-")),
        name: name.to_string(),
        category_tree: "[\"Clothing >> Men's Clothing\"]".to_string(),
        retail_price: price.map(|p| p * 2.0),
        discounted_price: price,
        image: String::new(),
        flipkart_advantage: false,
        description: format!("{} description", name),
        product_rating: rating,
        overall_rating: rating,
        brand: brand.map(|b| b.to_string()),
        specifications: String::new(),
    }
}

pub fn sample_catalog() -> Arc<Catalog> {
    let mut shoes = product("Running Shoes", Some(2499.0), Some(4.5), Some("Puma"));
    shoes.flipkart_advantage = true;
    Arc::new(Catalog::from_records(vec![
        product("Puma Tee", Some(499.0), Some(4.1), Some("Puma")),
        product("Slim Jeans", Some(999.0), Some(3.8), Some("Levi's")),
        shoes,
    ]))
}

pub fn sample_snippets() -> Vec<Snippet> {
    sample_catalog()
        .records()
        .iter()
        .map(|r| Snippet {
            text: r.document_text(),
            source: r.url.clone(),
        })
        .collect()
}

pub fn orchestrator_with(model: Arc<dyn LanguageModel>) -> ConversationOrchestrator {
    let index = Arc::new(FixedIndex {
        snippets: sample_snippets(),
    });
    let retriever = Arc::new(SemanticRetriever::new(index));
    let engine = Arc::new(StructuredQueryEngine::new(sample_catalog()));
    ConversationOrchestrator::new(model, catalog_tools(retriever, engine))
}
