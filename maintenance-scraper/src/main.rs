mod cli;
mod completion;
mod config;
mod error;
mod pipeline;
mod prompt;
mod response;
mod sink;
mod source;
#[cfg(test)]
mod testing;

use std::io::Write;
use anyhow::{Context, Result};
use clap::Parser;
use crate::cli::Cli;
use crate::config::Config;
use crate::pipeline::{Pipeline, RunOptions, RunOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("maintenance_scraper=info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load config
    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            tracing::info!("Loaded config from {}", path.display());
            config
        }
        None => Config::default(),
    };

    if let Some(kind) = cli.source {
        config.source.kind = kind;
    }
    if let Some(url) = cli.url {
        tracing::info!("overriding url");
        config.source.url = Some(url);
    }

    let options = RunOptions {
        fetch_only: cli.fetch_only,
        output: cli.output.or_else(|| config.output.path.clone()),
    };

    let pipeline = Pipeline::new(&config, options)?;

    match pipeline.run().await? {
        RunOutcome::Fetched(document) => {
            println!("{}", document.text);
        }
        RunOutcome::Classified { records, written_to: None } => {
            let json = sink::render(&records).context("Failed to render records")?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&json)?;
            writeln!(stdout)?;
        }
        RunOutcome::Classified { written_to: Some(_), .. } => {}
    }

    tracing::info!("done");
    Ok(())
}
