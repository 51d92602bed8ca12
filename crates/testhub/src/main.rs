//! TestHub CLI binary.

use anyhow::Result;
use testhub::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the testhub CLI.
///
/// Uses tokio's current_thread runtime; every command runs sequentially.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so `--json` output on stdout stays parseable.
    // Example: RUST_LOG=testhub=debug,testhub_slots=trace testhub bug list
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("testhub=info,testhub_slots=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting testhub CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("TestHub CLI completed successfully");
    Ok(())
}
