use std::sync::LazyLock;

use regex::Regex;

use crate::error::UrlError;

static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // standard watch URLs, with v= anywhere in the query string
        r"youtube\.com/watch\?(?:v=|.+&v=)([A-Za-z0-9_-]{11})",
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        r"youtube\.com/embed/([A-Za-z0-9_-]{11})",
        r"youtube\.com/v/([A-Za-z0-9_-]{11})",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Extracts the 11-character video id from any of the supported URL forms.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url).map(|captures| captures[1].to_string()))
}

/// Validates a user-supplied URL and returns the video id it names.
pub fn validate_youtube_url(url: &str) -> Result<String, UrlError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlError::Empty);
    }

    let lowered = url.to_lowercase();
    if !lowered.contains("youtube.com") && !lowered.contains("youtu.be") {
        return Err(UrlError::NotYoutube);
    }

    extract_video_id(url).ok_or(UrlError::NoVideoId)
}
