use std::fmt;

/// Progress events emitted by the pipeline before each backend call.
///
/// These are a side channel for hosts that want to show activity; they are
/// not part of the pipeline result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// The transcript fits in a single request.
    SingleShot,
    /// About to summarize segment `index` of `total`.
    Segment { index: usize, total: usize },
    /// All segments summarized; the merge call is next.
    Synthesizing { total: usize },
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressUpdate::SingleShot => write!(f, "Generating summary..."),
            ProgressUpdate::Segment { index, total } => {
                write!(f, "Summarizing section {index} of {total}...")
            }
            ProgressUpdate::Synthesizing { .. } => write!(f, "Creating final summary..."),
        }
    }
}

/// Observer for [`ProgressUpdate`] events.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, update: ProgressUpdate);
}

/// Default sink that drops every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn notify(&self, _update: ProgressUpdate) {}
}
