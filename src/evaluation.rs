//! Keyword-based evaluation of the assistant.
//!
//! Each case is a question plus a keyword the answer is expected to contain
//! (case-insensitive). A run uses its own fresh session so runs never see
//! each other's history.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ChatbotError, Result};
use crate::orchestrator::ConversationOrchestrator;
use crate::session::SessionStore;

/// A `(question, expected keyword)` pair; serialized as a two-element array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase(pub String, pub String);

impl TestCase {
    pub fn new(question: impl Into<String>, expected: impl Into<String>) -> Self {
        Self(question.into(), expected.into())
    }

    pub fn question(&self) -> &str {
        &self.0
    }

    pub fn expected(&self) -> &str {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    #[serde(rename = "Retrieval Accuracy (%)")]
    pub accuracy: f64,
    #[serde(rename = "Average Response Time (s)")]
    pub average_response_time: f64,
    #[serde(rename = "Coverage/Scope (%)")]
    pub coverage: f64,
    #[serde(rename = "Total Queries Tested")]
    pub total_queries: usize,
}

impl EvaluationReport {
    /// Label/value rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Retrieval Accuracy (%)", format!("{}", self.accuracy)),
            (
                "Average Response Time (s)",
                format!("{}", self.average_response_time),
            ),
            ("Coverage/Scope (%)", format!("{}", self.coverage)),
            ("Total Queries Tested", self.total_queries.to_string()),
        ]
    }
}

pub fn default_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("Do you have any Puma t-shirts?", "Puma"),
        TestCase::new("Which jeans are available for women?", "jeans"),
        TestCase::new("Top-rated shoes above ₹2000", "shoes"),
        TestCase::new("What is the most common brand?", "brand"),
        TestCase::new("Show me Flipkart Advantage products", "Flipkart Advantage"),
    ]
}

/// Load cases from a YAML or JSON list of `[question, keyword]` pairs.
pub fn load_test_cases(path: &Path) -> Result<Vec<TestCase>> {
    let contents = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );
    let cases: Vec<TestCase> = if is_yaml {
        serde_yaml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    if cases.is_empty() {
        return Err(ChatbotError::ConfigError(format!(
            "no test cases in {}",
            path.display()
        )));
    }
    Ok(cases)
}

/// Run every case through one fresh session and score the answers.
pub async fn evaluate(
    orchestrator: &ConversationOrchestrator,
    sessions: &dyn SessionStore,
    session_key: &str,
    cases: &[TestCase],
) -> EvaluationReport {
    let mut correct = 0usize;
    let mut total_secs = 0.0f64;
    let mut covered: HashSet<String> = HashSet::new();

    for case in cases {
        let start = Instant::now();
        let answer = match orchestrator.chat(sessions, session_key, case.question()).await {
            Ok(outcome) => outcome.answer,
            Err(e) => {
                warn!(question = case.question(), error = %e, "Evaluation turn failed");
                String::new()
            }
        };
        total_secs += start.elapsed().as_secs_f64();

        let expected = case.expected().to_lowercase();
        if answer.to_lowercase().contains(&expected) {
            correct += 1;
            covered.insert(expected);
        }
    }

    let report = score(cases, correct, total_secs, covered.len());
    info!(
        accuracy = report.accuracy,
        coverage = report.coverage,
        total = report.total_queries,
        "Evaluation finished"
    );
    report
}

fn score(cases: &[TestCase], correct: usize, total_secs: f64, covered: usize) -> EvaluationReport {
    if cases.is_empty() {
        return EvaluationReport {
            accuracy: 0.0,
            average_response_time: 0.0,
            coverage: 0.0,
            total_queries: 0,
        };
    }

    let distinct_expected: HashSet<String> =
        cases.iter().map(|c| c.expected().to_lowercase()).collect();
    let total = cases.len() as f64;

    EvaluationReport {
        accuracy: round2(correct as f64 / total * 100.0),
        average_response_time: round2(total_secs / total),
        coverage: round2(covered as f64 / distinct_expected.len() as f64 * 100.0),
        total_queries: cases.len(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
