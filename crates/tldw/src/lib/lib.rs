mod chunker;
mod error;
pub mod export;
mod llm;
mod pipeline;
mod progress;
pub mod tracing;

pub use chunker::{chunk, Segment, DEFAULT_MAX_CHUNK_CHARS};
pub use error::SummaryError;
pub use llm::openai;
pub use llm::{
    CompletionBackend, CompletionRequest, FINAL_MAX_TOKENS, SEGMENT_MAX_TOKENS, TEMPERATURE,
};
pub use pipeline::{builder::SummaryPipelineBuilder, FinalSummary, SummaryPipeline};
pub use progress::{NoopProgress, ProgressSink, ProgressUpdate};
