use std::process::ExitCode;

use clap::Parser;
use graph_qa::cli::{self, Cli, Command};
use graph_qa::config::AppConfig;
use graph_qa::infrastructure::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;
    init_logging(&config.logging);

    match cli.command {
        Command::Serve => cli::serve::run(config).await.map(|_| ExitCode::SUCCESS),
        Command::Ask { question } => cli::ask::run(config, question).await,
    }
}
