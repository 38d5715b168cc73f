//! silkworker CLI
//!
//! Command-line front end that encodes audio files on background workers.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use silkworker::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("silkworker v{}", env!("CARGO_PKG_VERSION"));

    let config = commands::load_config(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Encode {
            input,
            output,
            sample_rate,
            mock,
        } => commands::encode(&input, output.as_deref(), sample_rate, mock, &config)
            .await
            .with_context(|| format!("encoding {}", input.display()))?,
        Commands::Batch {
            dir,
            sample_rate,
            mock,
        } => {
            let summary = commands::batch(&dir, sample_rate, mock, &config)
                .await
                .with_context(|| format!("encoding files in {}", dir.display()))?;
            if !summary.failed.is_empty() {
                anyhow::bail!("{} files failed to encode", summary.failed.len());
            }
        }
    }

    Ok(())
}
