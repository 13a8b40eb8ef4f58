use crate::chunker::DEFAULT_MAX_CHUNK_CHARS;
use crate::llm::CompletionBackend;
use crate::pipeline::SummaryPipeline;
use crate::progress::{NoopProgress, ProgressSink};

/// Default bound on concurrent segment calls. 1 means fully sequential.
pub const DEFAULT_CONCURRENCY: usize = 4;

pub struct SummaryPipelineBuilder<B = (), P = NoopProgress> {
    backend: B,
    progress: P,
    max_chunk_chars: usize,
    concurrency: usize,
}

impl SummaryPipelineBuilder {
    pub fn new() -> Self {
        Self {
            backend: (),
            progress: NoopProgress,
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Default for SummaryPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<B, P> SummaryPipelineBuilder<B, P> {
    pub fn backend<B2: CompletionBackend + Send + Sync>(
        self,
        backend: B2,
    ) -> SummaryPipelineBuilder<B2, P> {
        SummaryPipelineBuilder {
            backend,
            progress: self.progress,
            max_chunk_chars: self.max_chunk_chars,
            concurrency: self.concurrency,
        }
    }

    pub fn progress<P2: ProgressSink>(self, progress: P2) -> SummaryPipelineBuilder<B, P2> {
        SummaryPipelineBuilder {
            backend: self.backend,
            progress,
            max_chunk_chars: self.max_chunk_chars,
            concurrency: self.concurrency,
        }
    }

    pub fn max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

impl<B, P> SummaryPipelineBuilder<B, P>
where
    B: CompletionBackend + Send + Sync,
    P: ProgressSink,
{
    pub fn build(self) -> SummaryPipeline<B, P> {
        SummaryPipeline {
            backend: self.backend,
            progress: self.progress,
            max_chunk_chars: self.max_chunk_chars,
            concurrency: self.concurrency,
        }
    }
}
