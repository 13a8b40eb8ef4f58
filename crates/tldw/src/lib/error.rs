/// Failure taxonomy for the summarization pipeline.
///
/// Display messages are short and actionable; each variant keeps the raw
/// backend diagnostic for logging without surfacing it to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    /// Missing or invalid API credential. Fatal until the user fixes it.
    #[error("Invalid or missing OpenAI API key. Please check your configuration.")]
    Configuration(String),

    /// The backend signalled a rate limit. Retry later, not automatically.
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    Throttled(String),

    /// The model rejected the input as too large. Should not occur given the
    /// chunk budget, but kept distinguishable so callers can suggest a
    /// smaller budget.
    #[error("Transcript too long for the model. Try a shorter video or a smaller chunk budget.")]
    InputTooLarge(String),

    /// Malformed or transient backend response. Safe to retry immediately.
    #[error("The backend returned an invalid response. Please try again in a few moments.")]
    UpstreamTransient(String),

    /// There is nothing to summarize.
    #[error("{0}")]
    ContentUnavailable(String),

    /// Catch-all for anything the classifier does not recognize.
    #[error("Error calling LLM API: {0}")]
    Backend(String),
}

impl SummaryError {
    /// The raw diagnostic carried by this error, for logs.
    pub fn diagnostic(&self) -> &str {
        match self {
            SummaryError::Configuration(msg)
            | SummaryError::Throttled(msg)
            | SummaryError::InputTooLarge(msg)
            | SummaryError::UpstreamTransient(msg)
            | SummaryError::ContentUnavailable(msg)
            | SummaryError::Backend(msg) => msg,
        }
    }
}
