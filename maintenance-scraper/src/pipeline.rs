use std::path::PathBuf;
use chrono::Utc;
use shared::types::MaintenanceRecord;
use crate::completion::CompletionClient;
use crate::config::{Config, SourceConfig};
use crate::error::PipelineError;
use crate::source::{self, SourceDocument};
use crate::{prompt, response, sink};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after fetching the source text
    pub fetch_only: bool,
    /// Destination for the records; `None` skips the write
    pub output: Option<PathBuf>,
}

/// Completion client plus the instruction template it is driven with
pub struct Classifier {
    client: CompletionClient,
    template: String,
}

impl Classifier {
    pub fn new(client: CompletionClient, template: String) -> Self {
        Self { client, template }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    Fetched(SourceDocument),
    Classified {
        records: Vec<MaintenanceRecord>,
        written_to: Option<PathBuf>,
    },
}

/// One run: fetch → prompt → complete → validate → persist.
/// Every configuration problem is raised by `new`, before any network traffic.
pub struct Pipeline {
    source: SourceConfig,
    classifier: Option<Classifier>,
    output: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(config: &Config, options: RunOptions) -> Result<Self, PipelineError> {
        // Catch a bad source config early too
        config.source.resolved_url()?;

        let classifier = if options.fetch_only {
            None
        } else {
            let api_key = config.completion.resolve_api_key()?;
            let template = config.completion.prompt_template()?;
            let client = CompletionClient::new(&config.completion, api_key)?;
            Some(Classifier::new(client, template))
        };

        Ok(Self::from_parts(config.source.clone(), classifier, options.output))
    }

    pub fn from_parts(source: SourceConfig, classifier: Option<Classifier>, output: Option<PathBuf>) -> Self {
        Self {
            source,
            classifier,
            output,
        }
    }

    pub async fn run(&self) -> Result<RunOutcome, PipelineError> {
        let document = source::fetch(&self.source).await?;
        tracing::info!("fetched {} bytes of source text from {}", document.text.len(), document.url);

        let Some(classifier) = &self.classifier else {
            return Ok(RunOutcome::Fetched(document));
        };

        let system_prompt = prompt::build_for(&classifier.template, Utc::now());
        let raw = classifier.client.complete(&system_prompt, &document.fenced()).await?;

        let records = response::parse_records(&raw)?;
        tracing::info!("parsed {} maintenance records", records.len());

        if let Some(path) = &self.output {
            sink::write_records(path, &records)?;
        }

        Ok(RunOutcome::Classified {
            records,
            written_to: self.output.clone(),
        })
    }
}
