use std::io::Write;
use std::process;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shopchat::catalog::Catalog;
use shopchat::cli::{Args, Command};
use shopchat::config::{Config, EmbeddingProvider};
use shopchat::error::{ChatbotError, Result};
use shopchat::evaluation::{default_test_cases, evaluate, load_test_cases};
use shopchat::llm::ChatCompletionsClient;
use shopchat::orchestrator::ConversationOrchestrator;
use shopchat::prompt::system_prompt;
use shopchat::retrieval::{
    Embedder, HashingEmbedder, InMemoryIndex, RemoteEmbedder, SemanticRetriever,
};
use shopchat::server::{start_server, AppState};
use shopchat::session::{new_session_key, InMemorySessionStore, SessionStore};
use shopchat::structured::StructuredQueryEngine;
use shopchat::tools::catalog_tools;
use shopchat::ui;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    init_tracing(&config, &args.command);

    if let Err(e) = run(args.command, config).await {
        ui::display_error(&e);
        process::exit(1);
    }
}

fn init_tracing(config: &Config, command: &Command) {
    let default_filter = if config.verbose {
        "shopchat=debug"
    } else if matches!(command, Command::Serve { .. }) {
        "shopchat=info"
    } else {
        "shopchat=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

struct Assistant {
    orchestrator: Arc<ConversationOrchestrator>,
    sessions: Arc<InMemorySessionStore>,
    catalog_size: usize,
}

/// Load the catalog, build the index, and wire the tools to the model.
async fn build_assistant(config: &Config) -> Result<Assistant> {
    let api_key = config.require_api_key()?;
    let catalog = Arc::new(Catalog::load(&config.dataset_path)?);

    let embedder: Box<dyn Embedder> = match config.embedding.provider {
        EmbeddingProvider::Hashing => Box::new(HashingEmbedder::new(config.embedding.dimensions)),
        EmbeddingProvider::Remote => {
            let key = config.embedding.api_key.as_deref().ok_or_else(|| {
                ChatbotError::ConfigError("SHOPCHAT_EMBEDDING_API_KEY not set".to_string())
            })?;
            Box::new(RemoteEmbedder::new(
                key,
                &config.embedding.endpoint,
                &config.embedding.model,
                config.request_timeout,
            )?)
        }
    };
    info!(provider = %config.embedding.provider, "Building product index");
    let index =
        InMemoryIndex::build(catalog.records(), embedder, config.embedding.batch_size).await?;

    let retriever = Arc::new(SemanticRetriever::with_k(Arc::new(index), config.top_k));
    let engine = Arc::new(StructuredQueryEngine::new(Arc::clone(&catalog)));
    let tools = catalog_tools(retriever, engine);

    let model = ChatCompletionsClient::new(
        api_key,
        &config.api_endpoint,
        &config.model,
        config.temperature,
        config.request_timeout,
    )?;
    info!(model = %config.model, "Assistant ready");

    let orchestrator = ConversationOrchestrator::new(Arc::new(model), tools)
        .with_max_tool_rounds(config.max_tool_rounds);

    Ok(Assistant {
        orchestrator: Arc::new(orchestrator),
        sessions: Arc::new(InMemorySessionStore::new(system_prompt())),
        catalog_size: catalog.len(),
    })
}

async fn run(command: Command, config: Config) -> Result<()> {
    let assistant = build_assistant(&config).await?;

    match command {
        Command::Chat { session } => run_chat(&assistant, session, config.verbose).await,
        Command::Ask { session, question } => {
            let key = session.unwrap_or_else(new_session_key);
            let outcome = assistant
                .orchestrator
                .chat(assistant.sessions.as_ref(), &key, &question.join(" "))
                .await?;
            if config.verbose {
                outcome.invocations.iter().for_each(ui::display_tool_invocation);
            }
            println!("{}", outcome.answer.trim_end());
            Ok(())
        }
        Command::Evaluate { cases } => {
            let cases = match cases {
                Some(path) => load_test_cases(&path)?,
                None => default_test_cases(),
            };
            let key = format!("eval-{}", new_session_key());
            let report = evaluate(
                &assistant.orchestrator,
                assistant.sessions.as_ref(),
                &key,
                &cases,
            )
            .await;
            ui::display_report(&report);
            Ok(())
        }
        Command::Serve { .. } => {
            let sessions: Arc<dyn SessionStore> = assistant.sessions;
            let state = AppState::new(assistant.orchestrator, sessions, assistant.catalog_size);
            start_server(state, &config.bind_addr).await
        }
    }
}

async fn run_chat(assistant: &Assistant, session: Option<String>, verbose: bool) -> Result<()> {
    let mut key = session.unwrap_or_else(new_session_key);
    ui::display_welcome(&key);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "you>".blue().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "" => continue,
            "/exit" | "/quit" => break,
            "/new" => {
                key = new_session_key();
                println!("{}", format!("Started session {}", key).dimmed());
                continue;
            }
            _ => {}
        }

        match assistant
            .orchestrator
            .chat(assistant.sessions.as_ref(), &key, input)
            .await
        {
            Ok(outcome) => {
                if verbose {
                    outcome.invocations.iter().for_each(ui::display_tool_invocation);
                }
                ui::display_answer(&outcome.answer);
            }
            // The session is untouched on failure, so the user can retry.
            Err(e) => ui::display_error(&e),
        }
    }

    Ok(())
}
