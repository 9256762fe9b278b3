//! TavernKit CLI — the main entry point.
//!
//! Commands:
//! - `init`    — Write a default config file
//! - `card`    — Decode, encode, and inspect card PNGs
//! - `preview` — Assemble and print the prompt a card would produce

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "tavernkit",
    about = "TavernKit — character-card codec and prompt assembly",
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
    /// Write a default config file
    Init,

    /// Decode, encode, and inspect card PNGs
    #[command(subcommand)]
    Card(CardCommands),

    /// Assemble and print the prompt a card would produce
    Preview {
        /// Card PNG to load the persona from
        #[arg(short, long)]
        card: Option<PathBuf>,

        /// Display name of the human participant
        #[arg(short, long, default_value = "User")]
        user: String,

        /// The new utterance to append
        #[arg(short, long)]
        message: Option<String>,

        /// Assemble as if history replay were active
        #[arg(long)]
        memory: bool,

        /// Print the message list as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CardCommands {
    /// Extract the embedded card JSON from a PNG
    Decode {
        /// Card PNG to read
        png: PathBuf,

        /// Write the JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Embed card JSON into a PNG
    Encode {
        /// Inline JSON, or a path to a JSON file
        source: String,

        /// Base PNG to embed into
        input: PathBuf,

        /// Where to write the resulting PNG
        output: PathBuf,
    },

    /// List a PNG's chunks and summarize the embedded card
    Inspect {
        /// Card PNG to read
        png: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
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
        Commands::Init => commands::init::run()?,
        Commands::Card(CardCommands::Decode { png, output }) => {
            commands::card_cmd::decode(&png, output.as_deref())?
        }
        Commands::Card(CardCommands::Encode {
            source,
            input,
            output,
        }) => commands::card_cmd::encode(&source, &input, &output)?,
        Commands::Card(CardCommands::Inspect { png }) => commands::card_cmd::inspect(&png)?,
        Commands::Preview {
            card,
            user,
            message,
            memory,
            json,
        } => commands::preview::run(card.as_deref(), &user, message.as_deref(), memory, json)?,
    }

    Ok(())
}
