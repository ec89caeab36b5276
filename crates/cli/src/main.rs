//! Windlass CLI — the main entry point.
//!
//! Commands:
//! - `add`      — Append a turn to a session's conversation
//! - `assemble` — Run the session handoff and print the assembled window
//! - `show`     — Print a session's live transcript
//! - `search`   — Query the retrieval index
//! - `sessions` — List stored sessions with live/offloaded turn counts
//! - `config`   — Print the effective configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "windlass",
    about = "Windlass — bounded context assembly for conversational agents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a turn to a session's conversation
    Add {
        /// Session id; a fresh one is minted and printed when omitted
        #[arg(short, long)]
        session: Option<String>,

        /// Speaker of the turn: "user" or "assistant"
        #[arg(short, long, default_value = "user")]
        role: String,

        /// The turn's text
        message: String,
    },

    /// Assemble and print the context window for a session
    Assemble {
        /// Session id
        #[arg(short, long)]
        session: String,

        /// Override the configured token ceiling
        #[arg(short, long)]
        ceiling: Option<usize>,
    },

    /// Print a session's live transcript
    Show {
        /// Session id
        #[arg(short, long)]
        session: String,
    },

    /// Query the retrieval index for offloaded conversation chunks
    Search {
        /// Free-text query
        query: String,

        /// How many chunks to return
        #[arg(short, long)]
        top_k: Option<usize>,
    },

    /// List stored sessions
    Sessions,

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Add {
            session,
            role,
            message,
        } => commands::add::run(session, &role, &message).await?,
        Commands::Assemble { session, ceiling } => {
            commands::assemble::run(&session, ceiling).await?
        }
        Commands::Show { session } => commands::show::run(&session).await?,
        Commands::Search { query, top_k } => commands::search::run(&query, top_k).await?,
        Commands::Sessions => commands::sessions::run().await?,
        Commands::Config => commands::config_cmd::run().await?,
    }

    Ok(())
}
