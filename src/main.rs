use anyhow::Result;
use clap::Parser;
use hr_assistant::cli::{Cli, Commands};
use hr_assistant::core::llm::LLMClient;
use hr_assistant::retrieval::OpenAIEmbedder;
use hr_assistant::{ingest, sanitize, utils, Assistant, Session, Settings, TurnOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::new()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let api_key = Settings::api_key()?;

    match cli.command {
        Commands::Ask { question } => handle_ask(&settings, api_key, question).await,
        Commands::Chat => handle_chat(&settings, api_key).await,
        Commands::Classify { text } => handle_classify(&settings, api_key, text).await,
        Commands::Ingest {
            source,
            concurrency,
        } => handle_ingest(&settings, api_key, source, concurrency).await,
    }
}

async fn handle_ask(settings: &Settings, api_key: String, question: String) -> Result<()> {
    let assistant = Assistant::new(settings, api_key)?;
    let mut session = assistant.start_session();

    utils::print_info("Sending request...");
    let outcome = assistant.handle_turn(&mut session, &question).await?;
    print_outcome(&outcome);
    Ok(())
}

async fn handle_chat(settings: &Settings, api_key: String) -> Result<()> {
    let assistant = Assistant::new(settings, api_key)?;
    let mut session = assistant.start_session();

    utils::print_header("HR Assistant");
    utils::print_info("Ask an HR question (/help for commands, Ctrl+D to exit)\n");

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);

    loop {
        utils::print_prompt("You: ");
        let mut input = String::new();
        if reader.read_line(&mut input).await? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/exit" | "/quit" => break,
            "/clear" => {
                session.reset();
                utils::print_success("Conversation cleared\n");
                continue;
            }
            "/history" => {
                print_history(&session);
                continue;
            }
            "/help" => {
                println!("Special commands:");
                println!("  /history - Show the remembered conversation");
                println!("  /clear   - Forget the conversation");
                println!("  /exit    - Leave the chat");
                println!("  /help    - Show this help\n");
                continue;
            }
            _ => {}
        }

        match assistant.handle_turn(&mut session, input).await {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => utils::print_error(&format!("Could not look up HR policies: {}\n", e)),
        }
    }

    Ok(())
}

async fn handle_classify(settings: &Settings, api_key: String, text: String) -> Result<()> {
    let assistant = Assistant::new(settings, api_key)?;
    let result = assistant.guardrail().classify(&sanitize(&text)).await;

    if result.in_domain {
        utils::print_success(&format!("in domain: {}", result.reason));
    } else {
        utils::print_warning(&format!("out of domain: {}", result.reason));
    }
    Ok(())
}

async fn handle_ingest(
    settings: &Settings,
    api_key: String,
    source: Option<PathBuf>,
    concurrency: Option<usize>,
) -> Result<()> {
    let source = source.unwrap_or_else(|| settings.ingest.source_dir.clone());
    let concurrency = concurrency.unwrap_or(settings.ingest.concurrency);

    let client = Arc::new(LLMClient::new(api_key, settings.llm.clone())?);
    let embedder = OpenAIEmbedder::new(client);

    utils::print_info(&format!("Ingesting documents from {:?}", source));
    let index = ingest::ingest_directory(&embedder, &source, concurrency).await?;
    index
        .save(
            &settings.retrieval.index_path,
            &settings.retrieval.documents_path,
        )
        .await?;

    utils::print_success(&format!(
        "Indexed {} documents into {:?}",
        index.len(),
        settings.retrieval.index_path
    ));
    Ok(())
}

fn print_outcome(outcome: &TurnOutcome) {
    if let TurnOutcome::Degraded { error, .. } = outcome {
        utils::print_warning(&format!("Request error: {}", error));
    }
    utils::print_info("Assistant: ");
    println!("{}\n", outcome.reply());
}

fn print_history(session: &Session) {
    let history = session.history();
    if history.is_empty() {
        utils::print_info("No conversation yet\n");
        return;
    }
    for turn in history.window() {
        utils::print_turn(&turn);
    }
    println!();
}
