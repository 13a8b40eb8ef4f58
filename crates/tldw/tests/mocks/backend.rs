use std::sync::{Arc, Mutex};
use std::time::Duration;

use tldw::{CompletionBackend, CompletionRequest, SummaryError};

/// One recorded completion call, in arrival order.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Copy)]
pub enum FailKind {
    Throttled,
    Configuration,
}

impl FailKind {
    fn to_error(self, message: &str) -> SummaryError {
        match self {
            FailKind::Throttled => SummaryError::Throttled(message.to_string()),
            FailKind::Configuration => SummaryError::Configuration(message.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct MockBackend {
    pub summary: String,
    /// When set, respond with the request's user prompt instead of `summary`.
    pub echo: bool,
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    /// Fail the nth call (1-based) with the given error.
    pub fail_on: Option<(usize, FailKind, String)>,
    /// Per-call sleep before responding, indexed by call order.
    pub delays: Vec<Duration>,
}

impl MockBackend {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            echo: false,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
            delays: Vec::new(),
        }
    }

    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::new("")
        }
    }

    pub fn failing_at(ordinal: usize, kind: FailKind, message: &str) -> Self {
        Self {
            fail_on: Some((ordinal, kind, message.to_string())),
            ..Self::new("")
        }
    }

    pub fn with_delays(mut self, delays: Vec<Duration>) -> Self {
        self.delays = delays;
        self
    }
}

impl CompletionBackend for MockBackend {
    type Error = SummaryError;

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, SummaryError> {
        let ordinal = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                system_prompt: request.system_prompt.to_string(),
                user_prompt: request.user_prompt.clone(),
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            });
            calls.len()
        };

        if let Some(delay) = self.delays.get(ordinal - 1) {
            tokio::time::sleep(*delay).await;
        }

        if let Some((fail_ordinal, kind, message)) = &self.fail_on {
            if *fail_ordinal == ordinal {
                return Err(kind.to_error(message));
            }
        }

        if self.echo {
            Ok(request.user_prompt)
        } else {
            Ok(self.summary.clone())
        }
    }
}
