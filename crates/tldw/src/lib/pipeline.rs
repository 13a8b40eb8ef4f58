pub mod builder;

use futures::{StreamExt, TryStreamExt};
use itertools::Itertools;

use crate::chunker::{chunk, Segment};
use crate::error::SummaryError;
use crate::llm::{
    CompletionBackend, CompletionRequest, FINAL_MAX_TOKENS, SEGMENT_MAX_TOKENS, TEMPERATURE,
};
use crate::progress::{ProgressSink, ProgressUpdate};

/// Rich single-shot prompt, used when the transcript fits in one request.
const SUMMARY_SYSTEM_PROMPT: &str = include_str!("./pipeline/prompts/summary_system.txt");

/// Per-segment extraction prompt for the chunked path.
const SEGMENT_EXTRACT_PROMPT: &str = include_str!("./pipeline/prompts/segment_extract.txt");

/// Merge prompt combining the section summaries into one document.
const SYNTHESIS_PROMPT: &str = include_str!("./pipeline/prompts/synthesis.txt");

const SECTION_DELIMITER: &str = "\n\n---\n\n";

/// The finished summary, a markdown document with the fixed three-section
/// structure. Immutable once produced; hand it to [`crate::export::render`]
/// or discard it when the request ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalSummary {
    pub markdown: String,
    /// How many transcript segments fed the summary (1 for single-shot).
    pub segment_count: usize,
}

/// The summarization pipeline.
///
/// Each [`run`](Self::run) is an independent request: chunk the transcript,
/// summarize directly when it fits in one call, otherwise summarize every
/// segment and merge the partial summaries with a final synthesis call. Any
/// backend failure aborts the run; no partial results are returned.
pub struct SummaryPipeline<B, P>
where
    B: CompletionBackend + Send + Sync,
    P: ProgressSink,
{
    backend: B,
    progress: P,
    max_chunk_chars: usize,
    concurrency: usize,
}

impl<B, P> SummaryPipeline<B, P>
where
    B: CompletionBackend + Send + Sync,
    P: ProgressSink,
{
    #[tracing::instrument(skip_all, fields(transcript_chars = transcript.len()))]
    pub async fn run(&self, transcript: &str) -> Result<FinalSummary, SummaryError> {
        let segments = chunk(transcript, self.max_chunk_chars);
        match segments.len() {
            0 => Err(SummaryError::ContentUnavailable(
                "The transcript is empty.".into(),
            )),
            1 => self.summarize_single(&segments[0]).await,
            _ => self.summarize_chunked(&segments).await,
        }
    }

    async fn summarize_single(&self, segment: &Segment) -> Result<FinalSummary, SummaryError> {
        self.progress.notify(ProgressUpdate::SingleShot);
        let request = CompletionRequest {
            system_prompt: SUMMARY_SYSTEM_PROMPT,
            user_prompt: format!(
                "Please summarize the following transcript:\n\n{}",
                segment.text
            ),
            temperature: TEMPERATURE,
            max_output_tokens: FINAL_MAX_TOKENS,
        };
        let markdown = self.backend.complete(request).await.map_err(Into::into)?;
        Ok(FinalSummary {
            markdown,
            segment_count: 1,
        })
    }

    async fn summarize_chunked(&self, segments: &[Segment]) -> Result<FinalSummary, SummaryError> {
        let total = segments.len();
        tracing::info!(segments = total, "Transcript exceeds chunk budget, summarizing per segment");

        // `buffered` keeps at most `concurrency` calls in flight and yields
        // results in segment order regardless of completion order; the first
        // failure short-circuits collection.
        let summaries: Vec<String> =
            futures::stream::iter(segments.iter().map(|segment| self.summarize_segment(segment, total)))
                .buffered(self.concurrency)
                .try_collect()
                .await?;

        self.progress.notify(ProgressUpdate::Synthesizing { total });
        let request = CompletionRequest {
            system_prompt: SYNTHESIS_PROMPT,
            user_prompt: synthesis_payload(&summaries),
            temperature: TEMPERATURE,
            max_output_tokens: FINAL_MAX_TOKENS,
        };
        let markdown = self.backend.complete(request).await.map_err(Into::into)?;
        Ok(FinalSummary {
            markdown,
            segment_count: total,
        })
    }

    async fn summarize_segment(
        &self,
        segment: &Segment,
        total: usize,
    ) -> Result<String, SummaryError> {
        self.progress.notify(ProgressUpdate::Segment {
            index: segment.index,
            total,
        });
        let request = CompletionRequest {
            system_prompt: SEGMENT_EXTRACT_PROMPT,
            user_prompt: segment.text.clone(),
            temperature: TEMPERATURE,
            max_output_tokens: SEGMENT_MAX_TOKENS,
        };
        self.backend.complete(request).await.map_err(Into::into)
    }
}

/// Joins segment summaries into the synthesis payload, each prefixed with
/// its 1-based section index, in original segment order.
fn synthesis_payload(summaries: &[String]) -> String {
    summaries
        .iter()
        .enumerate()
        .map(|(i, summary)| format!("Section {} Summary:\n{}", i + 1, summary))
        .join(SECTION_DELIMITER)
}
