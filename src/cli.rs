use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shopchat")]
#[command(about = "Shopping assistant for a Flipkart product catalog", long_about = None)]
pub struct Args {
    #[arg(long = "dataset", global = true, help = "Path to the product CSV")]
    pub dataset: Option<PathBuf>,

    #[arg(long = "model", global = true, help = "Chat model identifier")]
    pub model: Option<String>,

    #[arg(
        long = "api-endpoint",
        global = true,
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        help = "Show tool calls and debug logs"
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive chat in the terminal
    Chat {
        #[arg(long = "session", help = "Session key to use (default: a new one)")]
        session: Option<String>,
    },

    /// Ask a single question and print the answer
    Ask {
        #[arg(long = "session", help = "Session key to use (default: a new one)")]
        session: Option<String>,

        #[arg(required = true, help = "Question to send")]
        question: Vec<String>,
    },

    /// Score the assistant against (question, keyword) cases
    Evaluate {
        #[arg(long = "cases", help = "YAML or JSON list of [question, keyword] pairs")]
        cases: Option<PathBuf>,
    },

    /// Run the HTTP service
    Serve {
        #[arg(long = "addr", help = "Bind address (default: 127.0.0.1:8000)")]
        addr: Option<String>,
    },
}
