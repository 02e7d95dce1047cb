use std::time::Duration;
use rand::Rng;
use crate::config::SourceKind;
use crate::error::PipelineError;

/// Desktop Chrome user agent with randomized build numbers
fn browser_user_agent() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.{}.{} Safari/537.36",
        rng.gen_range(0..9999),
        rng.gen_range(0..99)
    )
}

pub fn build_client(kind: SourceKind, timeout: Duration) -> Result<reqwest::Client, PipelineError> {
    let user_agent = browser_user_agent();
    tracing::debug!("user agent: {}", user_agent);

    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent);

    // The help center sits behind a CDN that rejects older TLS handshakes
    if kind == SourceKind::Html {
        builder = builder.min_tls_version(reqwest::tls::Version::TLS_1_3);
    }

    builder
        .build()
        .map_err(|e| PipelineError::Configuration(format!("failed to build HTTP client: {}", e)))
}

pub async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, PipelineError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| PipelineError::source_fetch(url, format!("failed to make request: {}", e)))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(PipelineError::source_fetch(url, format!("http error {}", status.as_u16())));
    }

    response
        .text()
        .await
        .map_err(|e| PipelineError::source_fetch(url, format!("failed to read body: {}", e)))
}
