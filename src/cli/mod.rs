use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod init;
pub mod serve;

use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Create the database and its tables
    Init {
        #[arg(long, action, default_value = "false")]
        db: bool,
    },
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "5001")]
        port: String,
    },
    /// Chat with the configured provider from the terminal
    Chat {
        /// JSON profile with a persona and rules to build the system prompt from
        #[arg(long)]
        profile: Option<String>,

        /// Log the conversation under this session ID instead of a new one
        #[arg(long)]
        session_id: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Init { db }) => {
            let config = AppConfig::from_env()?;
            init::run(db, &config.db_path).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Chat {
            profile,
            session_id,
        }) => {
            chat::run(profile, session_id).await?;
        }
        None => {}
    }

    Ok(())
}
