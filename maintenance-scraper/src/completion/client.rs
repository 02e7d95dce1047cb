use std::sync::Arc;
use shared::protocol::CHAT_COMPLETIONS_PATH;
use crate::completion::{run_with_retry, RetryObserver, RetryPolicy, TracingObserver};
use crate::completion::wire::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat};
use crate::config::{ApiKey, CompletionConfig};
use crate::error::PipelineError;

/// Longest error body quoted back in a failed-attempt message
const MAX_ERROR_BODY: usize = 512;

/// Client for an OpenAI-compatible chat completions endpoint.
/// One call to `complete` is one logical generation, retried per `RetryPolicy`.
pub struct CompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: ApiKey,
    model: String,
    temperature: f32,
    max_tokens: u32,
    policy: RetryPolicy,
    observer: Arc<dyn RetryObserver>,
}

impl CompletionClient {
    pub fn new(config: &CompletionConfig, api_key: ApiKey) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("maintenance-scraper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), CHAT_COMPLETIONS_PATH),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            policy: config.retry_policy(),
            observer: Arc::new(TracingObserver),
        })
    }

    #[cfg(test)]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[cfg(test)]
    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Ask the model to turn `user_content` into structured data and return its raw text
    pub async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String, PipelineError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            n: 1,
            response_format: ResponseFormat::json_object(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(user_content)],
        };

        tracing::info!("contacting completion endpoint {} with model {}", self.endpoint, self.model);

        run_with_retry(&self.policy, self.observer.as_ref(), |_| self.request_once(&request)).await
    }

    async fn request_once(&self, request: &ChatRequest<'_>) -> Result<String, PipelineError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| PipelineError::TransientCompletion(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
                body.truncate(cut);
            }
            return Err(PipelineError::TransientCompletion(format!("HTTP {}: {}", status, body)));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::TransientCompletion(format!("invalid completion body: {}", e)))?;

        completion
            .into_content()
            .ok_or_else(|| PipelineError::TransientCompletion("completion has no content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::testing::{MockBehavior, MockServer, RecordingObserver};

    fn client_for(server: &MockServer, max_attempts: u32) -> (CompletionClient, Arc<RecordingObserver>) {
        let config = CompletionConfig {
            base_url: server.base_url(),
            ..CompletionConfig::default()
        };
        let observer = Arc::new(RecordingObserver::default());
        let client = CompletionClient::new(&config, ApiKey::new("test-key"))
            .unwrap()
            .with_policy(RetryPolicy {
                max_attempts,
                attempt_timeout: Duration::from_millis(500),
                backoff: Duration::from_millis(5),
            })
            .with_observer(observer.clone());
        (client, observer)
    }

    #[tokio::test]
    async fn test_returns_content_on_first_success() {
        let server = MockServer::start(MockBehavior::answering("[]")).await;
        let (client, observer) = client_for(&server, 3);

        let text = client.complete("system", "user").await.unwrap();

        assert_eq!(text, "[]");
        assert_eq!(server.completion_calls(), 1);
        assert_eq!(observer.failures(), 0);
    }

    #[tokio::test]
    async fn test_sends_expected_request() {
        let server = MockServer::start(MockBehavior::answering("[]")).await;
        let (client, _) = client_for(&server, 1);

        client.complete("the prompt", "```xml\n<rss/>\n```").await.unwrap();

        let request = server.last_request().unwrap();
        assert_eq!(request.authorization.as_deref(), Some("Bearer test-key"));
        assert_eq!(request.body["model"], "gemini-2.0-flash-lite");
        assert_eq!(request.body["max_tokens"], 8000);
        assert_eq!(request.body["n"], 1);
        assert_eq!(request.body["response_format"]["type"], "json_object");
        assert_eq!(request.body["messages"][0]["role"], "system");
        assert_eq!(request.body["messages"][0]["content"], "the prompt");
        assert_eq!(request.body["messages"][1]["role"], "user");
        assert_eq!(request.body["messages"][1]["content"], "```xml\n<rss/>\n```");
    }

    #[tokio::test]
    async fn test_recovers_after_failures() {
        let server = MockServer::start(MockBehavior::answering("[]").failing_first(2)).await;
        let (client, observer) = client_for(&server, 3);

        let text = client.complete("system", "user").await.unwrap();

        assert_eq!(text, "[]");
        assert_eq!(server.completion_calls(), 3);
        assert_eq!(observer.failures(), 2);
        assert_eq!(observer.successes(), 1);
    }

    #[tokio::test]
    async fn test_always_failing_endpoint_exhausts_retries() {
        let server = MockServer::start(MockBehavior::answering("[]").failing_first(u32::MAX)).await;
        let (client, observer) = client_for(&server, 3);

        let err = client.complete("system", "user").await.unwrap_err();

        match err {
            PipelineError::MaxRetriesExceeded { attempts, last_error } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("500"));
            }
            other => panic!("expected MaxRetriesExceeded, got {:?}", other),
        }
        assert_eq!(server.completion_calls(), 3);
        assert_eq!(observer.exhausted(), 1);
    }

    #[tokio::test]
    async fn test_slow_endpoint_hits_attempt_deadline() {
        let server = MockServer::start(
            MockBehavior::answering("[]").delayed(Duration::from_secs(3)),
        )
        .await;
        let (client, _) = client_for(&server, 2);

        let err = client.complete("system", "user").await.unwrap_err();

        assert!(matches!(err, PipelineError::MaxRetriesExceeded { attempts: 2, .. }));
        assert_eq!(server.completion_calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_choices_is_retried() {
        let server = MockServer::start(MockBehavior::without_choices()).await;
        let (client, observer) = client_for(&server, 2);

        let err = client.complete("system", "user").await.unwrap_err();

        assert!(matches!(err, PipelineError::MaxRetriesExceeded { .. }));
        assert_eq!(observer.failures(), 2);
    }
}
