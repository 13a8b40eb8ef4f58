pub mod openai;

use std::fmt::Debug;
use std::future::Future;

use crate::error::SummaryError;

/// Sampling temperature for every pipeline call. Kept low so repeated runs
/// lean toward the same output.
pub const TEMPERATURE: f32 = 0.3;

/// Output ceiling for per-segment extraction calls.
pub const SEGMENT_MAX_TOKENS: u32 = 2_000;

/// Output ceiling for the single-shot and synthesis calls.
pub const FINAL_MAX_TOKENS: u32 = 3_000;

/// One completion request as the pipeline shapes it: fixed prompts and
/// sampling parameters, no streaming.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub system_prompt: &'a str,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// The LLM backend seam.
///
/// Implementations are plain request/response clients with no retry logic;
/// retry policy belongs to callers further out. Errors must classify into
/// the [`SummaryError`] taxonomy.
pub trait CompletionBackend {
    type Error: Into<SummaryError> + Debug;

    fn complete(
        &self,
        request: CompletionRequest<'_>,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
