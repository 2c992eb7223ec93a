//! Binary entry point that loads configuration and launches the chat
//! session or the speech interpreter.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use carebot::config::{AppConfig, SpeechCredentials, CONFIG_PATH};
use carebot::interpreter::{self, DEFAULT_TARGETS};
use carebot::language::Language;
use carebot::session;

#[derive(Parser)]
#[command(name = "carebot", about = "Customer-care chatbot with voice and translation")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,
    /// FAQ table (overrides the configured path)
    #[arg(long)]
    faq: Option<PathBuf>,
    /// Run without speech credentials; typed questions only
    #[arg(long)]
    text_only: bool,
    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive question answering (default)
    Chat,
    /// Speak in the source language, hear it in the target languages
    Interpret {
        /// Comma-separated target language codes
        #[arg(long, value_delimiter = ',')]
        targets: Vec<Language>,
    },
}

#[tokio::main]
/// Bootstraps environment variables and logging, then runs the chosen mode.
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load(&cli.config);
    if let Some(faq) = cli.faq {
        config.faq_path = faq;
    }

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let credentials = if cli.text_only {
                None
            } else {
                Some(SpeechCredentials::from_env()?)
            };
            session::run_chat_session(&config, credentials).await
        }
        Command::Interpret { targets } => {
            let credentials = SpeechCredentials::from_env()?;
            let targets = if targets.is_empty() {
                DEFAULT_TARGETS.to_vec()
            } else {
                targets
            };
            interpreter::run_interpreter(&config, &credentials, &targets).await
        }
    }
}
