use std::path::PathBuf;
use clap::Parser;
use crate::config::SourceKind;

#[derive(Debug, Parser)]
#[command(name = "maintenance-scraper")]
#[command(about = "Turns game-server maintenance announcements into structured JSON", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML config file; built-in defaults are used when omitted
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Only fetch and print the source text, skip the completion step
    #[arg(long)]
    pub fetch_only: bool,

    /// Where to write the records (overrides output.path)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Source URL (overrides source.url)
    #[arg(long, env = "OVERRIDE_URL")]
    pub url: Option<String>,

    /// Source format (overrides source.kind)
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,
}
