//! Ask command - answers one question from the command line

use std::process::ExitCode;

use tokio::signal;
use tracing::info;

use crate::config::AppConfig;
use crate::context::AppContext;

/// Prints the answer, or the fixed error message with a failing exit code
pub async fn run(config: AppConfig, question: String) -> anyhow::Result<ExitCode> {
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("Question must not be empty");
    }

    let context = AppContext::build(config).await?;
    let cancel = context.shutdown.child_token();

    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, cancelling");
                cancel.cancel();
            }
        }
    });

    let outcome = context.pipeline.run(question, &cancel).await;
    watcher.abort();
    context.shutdown().await;

    match outcome.result {
        Ok(answer) => {
            println!("{}", answer);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            info!(code = error.code(), retryable = error.is_retryable(), "No answer");
            eprintln!("{}", error.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
