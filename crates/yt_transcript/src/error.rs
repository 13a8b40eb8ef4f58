/// Failures produced while fetching a transcript.
///
/// Display messages are user-facing; variants carrying a `String` keep the
/// raw diagnostic for logs without surfacing it to the caller.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Transcripts are disabled for this video.")]
    TranscriptsDisabled,

    #[error("This video is unavailable (private, deleted, or region-restricted).")]
    VideoUnavailable,

    #[error("No transcript available for this video.")]
    NoTranscriptAvailable,

    #[error("YouTube returned an invalid response. This may be temporary - please try again in a few moments.")]
    TransientUpstream(String),

    #[error("Error fetching transcript: {0}")]
    Unknown(String),
}

/// Failures produced while validating a YouTube URL, before any fetch.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("Please enter a YouTube URL.")]
    Empty,

    #[error("This doesn't appear to be a YouTube URL.")]
    NotYoutube,

    #[error("Could not extract video ID from URL. Please check the URL format.")]
    NoVideoId,
}
