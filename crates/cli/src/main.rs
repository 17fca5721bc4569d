//! fplscout CLI
//!
//! Main entry point for the fplscout command-line tool: a retrieval-augmented
//! Fantasy Premier League assistant.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, CollectCommand, IndexCommand, StatsCommand};
use fplscout_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// fplscout - Fantasy Premier League assistant with local RAG
#[derive(Parser, Debug)]
#[command(name = "fplscout")]
#[command(about = "Ask questions about Fantasy Premier League players and strategies", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to data directory (default: current directory)
    #[arg(short, long, global = true, env = "FPLSCOUT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "FPLSCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Completion provider (openai, ollama)
    #[arg(short, long, global = true, env = "FPLSCOUT_PROVIDER")]
    provider: Option<String>,

    /// Completion model identifier
    #[arg(short, long, global = true, env = "FPLSCOUT_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the FPL feed and build text documents
    Collect(CollectCommand),

    /// Chunk, embed, and persist the vector index
    Index(IndexCommand),

    /// Ask a single question
    Ask(AskCommand),

    /// Interactive chat session with conversation memory
    Chat(ChatCommand),

    /// Show index statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.data_dir,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("fplscout starting");
    tracing::debug!("Data dir: {:?}", config.data_dir);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    // Ensure .fplscout directory exists
    config.ensure_fplscout_dir()?;

    let command_name = match &cli.command {
        Commands::Collect(_) => "collect",
        Commands::Index(_) => "index",
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Collect(cmd) => cmd.execute(&config).await,
        Commands::Index(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
