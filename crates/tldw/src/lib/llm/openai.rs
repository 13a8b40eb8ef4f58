use reqwest::Client;
use serde::Deserialize;

use crate::error::SummaryError;
use crate::llm::{CompletionBackend, CompletionRequest};

/// Chat-completions client for the OpenAI API.
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Empty completion: {0}")]
    EmptyCompletion(String),
}

impl OpenAIClient {
    pub const DEFAULT_MODEL: &'static str = "gpt-4o";

    pub fn new(api_key: impl Into<String>) -> Self {
        OpenAIClient {
            client: Client::new(),
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.into(),
            base_url: "https://api.openai.com/v1".into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn send_completion_request(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<CompletionResponse, OpenAIError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": request.system_prompt
                },
                {
                    "role": "user",
                    "content": request.user_prompt
                }
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_output_tokens,
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl CompletionBackend for OpenAIClient {
    type Error = OpenAIError;

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, OpenAIError> {
        let response = self
            .send_completion_request(&request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Completion request failed"))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| OpenAIError::EmptyCompletion("no content in response".into()))
    }
}

impl From<OpenAIError> for SummaryError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::Api { status, message } => classify_api_error(status, message),
            OpenAIError::Request(e) if e.is_timeout() || e.is_connect() || e.is_decode() => {
                SummaryError::UpstreamTransient(e.to_string())
            }
            OpenAIError::Request(e) => SummaryError::Backend(e.to_string()),
            OpenAIError::EmptyCompletion(msg) => SummaryError::UpstreamTransient(msg),
        }
    }
}

/// Classifies an API error response, in fixed priority order: credential,
/// then rate limit, then context length, then everything else.
fn classify_api_error(status: u16, message: String) -> SummaryError {
    let lowered = message.to_lowercase();
    if status == 401 || status == 403 || lowered.contains("api_key") || lowered.contains("api key")
    {
        return SummaryError::Configuration(message);
    }
    if status == 429 || lowered.contains("rate_limit") || lowered.contains("rate limit") {
        return SummaryError::Throttled(message);
    }
    if lowered.contains("context_length") || lowered.contains("maximum context") {
        return SummaryError::InputTooLarge(message);
    }
    if (500..600).contains(&status) {
        return SummaryError::UpstreamTransient(message);
    }
    SummaryError::Backend(message)
}
