mod html;
mod http;
mod feed;

pub use self::html::extract_article;
pub use self::feed::filter_feed;

use crate::config::{SourceConfig, SourceKind};
use crate::error::PipelineError;

/// Text handed to the model, plus what it was made from
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub kind: SourceKind,
    pub url: String,
    pub text: String,
}

impl SourceDocument {
    /// The text wrapped in a code fence tagged with its format
    pub fn fenced(&self) -> String {
        let lang = match self.kind {
            SourceKind::Rss => "xml",
            SourceKind::Html => "html",
        };
        format!("```{}\n{}\n```", lang, self.text)
    }
}

/// Fetch the configured source and reduce it to the text worth classifying
pub async fn fetch(config: &SourceConfig) -> Result<SourceDocument, PipelineError> {
    let url = config.resolved_url()?;
    let client = http::build_client(config.kind, config.timeout())?;

    tracing::info!("fetching {:?} source from {}", config.kind, url);
    let body = http::get_text(&client, &url).await?;

    let text = match config.kind {
        SourceKind::Rss => filter_feed(body.as_bytes(), &config.keywords, &config.replacements)
            .map_err(|e| PipelineError::source_fetch(&url, format!("failed to parse xml: {}", e)))?,
        SourceKind::Html => {
            tracing::info!("extracting article and stripping attributes");
            extract_article(&body, &config.article_selector)
                .map_err(|reason| PipelineError::source_fetch(&url, reason))?
        }
    };

    tracing::debug!("source text:\n{}", text);
    Ok(SourceDocument {
        kind: config.kind,
        url,
        text,
    })
}
