use colored::*;

use crate::evaluation::EvaluationReport;
use crate::orchestrator::ToolInvocation;

pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "What are the best-rated shoes?",
    "Do you have any Puma t-shirts?",
    "Which jeans are available for women?",
    "Suggest some Flipkart Advantage products",
];

const RULE: &str = "──────────────────────────────────────────────────";

pub fn display_welcome(session_key: &str) {
    println!("{}", "Sales Assistant".bold().cyan());
    println!(
        "Chatbot trained on fashion products from Flipkart. Ask for suggestions, deals, or explore categories!"
    );
    println!("{}", "Try:".dimmed());
    for question in EXAMPLE_QUESTIONS {
        println!("  {} {}", "•".dimmed(), question);
    }
    println!(
        "{}",
        format!("session {} · /new for a fresh session · /exit to quit", session_key).dimmed()
    );
    println!();
}

/// Show one tool call as a boxed block.
pub fn display_tool_invocation(invocation: &ToolInvocation) {
    println!(
        "{} {} {}",
        "┌─".dimmed(),
        format!("TOOL: {}", invocation.tool).cyan(),
        RULE.dimmed()
    );
    println!("{} {}", "│".dimmed(), format!("input: {}", invocation.input).dimmed());
    for line in invocation.output.lines() {
        println!("{} {}", "│".dimmed(), line);
    }
    println!("{}", format!("└{}", RULE).dimmed());
}

pub fn display_answer(answer: &str) {
    println!("{} {}", "assistant>".green().bold(), answer.trim_end());
    println!();
}

pub fn display_error(error: &dyn std::fmt::Display) {
    eprintln!("{} {}", "Error:".red(), error);
}

pub fn display_report(report: &EvaluationReport) {
    println!("{}", "Evaluation".bold().cyan());
    for (label, value) in report.rows() {
        println!("  {:<28} {}", format!("{}:", label), value.bold());
    }
}
