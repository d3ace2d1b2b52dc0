//! Command line entry points
//!
//! - `serve`: HTTP API
//! - `ask`: answer one question and exit

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{error, info};

/// Natural-language question answering over a Neo4j graph
#[derive(Parser)]
#[command(name = "graph-qa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Answer a single question and print the result
    Ask {
        /// The question, in natural language
        question: String,
    },
}

/// Resolves on Ctrl+C or SIGTERM
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from(["graph-qa", "ask", "Who teaches Rust?"]).unwrap();

        match cli.command {
            Command::Ask { question } => assert_eq!(question, "Who teaches Rust?"),
            Command::Serve => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["graph-qa", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["graph-qa", "ask"]).is_err());
    }
}
