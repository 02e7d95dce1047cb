use std::path::PathBuf;

/// Errors that end a run. Only `TransientCompletion` is ever retried, and it
/// never leaves the completion client.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to fetch source from {url}: {reason}")]
    SourceFetch { url: String, reason: String },

    #[error("completion attempt failed: {0}")]
    TransientCompletion(String),

    #[error("max retries reached after {attempts} attempts, last error: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },

    /// Carries the model's answer verbatim, it is not kept anywhere else
    #[error("failed to parse completion response: {source}\n\n{raw}")]
    ResponseParse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn source_fetch(url: &str, reason: impl ToString) -> Self {
        Self::SourceFetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
