//! Conversational shopping assistant over a Flipkart product catalog.
//!
//! A language model answers user turns and may call two tools: semantic
//! product search and structured catalog statistics.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod structured;
pub mod tools;
pub mod ui;

pub use error::{ChatbotError, Result};
