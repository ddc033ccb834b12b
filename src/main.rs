//! ecr-image-retag CLI entry point
//!
//! Moves a tag from whichever ECR image holds it onto another image.

use clap::Parser;
use ecr_image_retag::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print()?;
            std::process::exit(ecr_image_retag::cli::exit_code(&err));
        }
    };

    ecr_image_retag::cli::execute(cli).await
}
