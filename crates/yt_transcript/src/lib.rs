//! # YouTube Transcript Fetcher
//!
//! This crate fetches plain-text transcripts for YouTube videos by scraping
//! the caption tracks advertised in a video's watch page.
//!
//! The summarization pipeline only depends on the [`TranscriptSource`] trait
//! and the closed [`FetchError`] enum; everything about how transcripts are
//! located and retrieved (track selection, translation fallback, retries)
//! stays behind that boundary.

mod client;
mod error;
mod types;
mod video_id;

use std::future::Future;

pub use client::YtTranscriptClient;
pub use error::{FetchError, UrlError};
pub use video_id::{extract_video_id, validate_youtube_url};

/// A source of plain-text transcripts keyed by video id.
pub trait TranscriptSource {
    fn fetch(&self, video_id: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}
