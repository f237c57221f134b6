use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hr-assistant")]
#[command(author, version, about = "HR policy assistant grounded in your own documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question
    Ask { question: String },

    /// Start an interactive chat session
    Chat,

    /// Show how the topic guardrail classifies a message
    Classify { text: String },

    /// Build the vector index from a directory of policy documents
    Ingest {
        /// Source directory (defaults to `ingest.source_dir`)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Maximum embedding requests in flight
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
}
