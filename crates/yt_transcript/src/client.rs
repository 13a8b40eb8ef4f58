use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_retry_after::RetryAfterMiddleware;

use crate::error::FetchError;
use crate::types::{CaptionTrack, PlayerResponse, TimedText};
use crate::TranscriptSource;

static PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)var\s+ytInitialPlayerResponse\s*=\s*(\{.*?\})\s*;(?:\s*var\s+\w|\s*</script>)")
        .unwrap()
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Fetches transcripts by scraping the caption tracks of a video's watch page.
///
/// HTTP-level transient failures (connection resets, 5xx, `Retry-After`) are
/// retried by the middleware stack; malformed response bodies are retried by
/// [`TranscriptSource::fetch`] with exponential backoff.
pub struct YtTranscriptClient {
    http: ClientWithMiddleware,
    base_url: String,
    languages: Vec<String>,
}

impl YtTranscriptClient {
    const DEFAULT_LANGUAGES: [&'static str; 3] = ["en", "en-US", "en-GB"];
    const MAX_ATTEMPTS: u32 = 3;

    pub fn new() -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(2);
        let http = ClientBuilder::new(reqwest::Client::new())
            .with(RetryAfterMiddleware::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        YtTranscriptClient {
            http,
            base_url: "https://www.youtube.com".into(),
            languages: Self::DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Overrides the caption language preference order.
    pub fn with_languages(mut self, languages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    #[tracing::instrument(skip(self))]
    async fn try_fetch(&self, video_id: &str) -> Result<String, FetchError> {
        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        let response = self
            .http
            .get(&watch_url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(classify_request_error)?;
        check_status(response.status(), "watch page")?;

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::TransientUpstream(e.to_string()))?;

        let player = parse_player_response(&html)?;
        check_playability(&player)?;
        let tracks = caption_tracks(&player)?;
        let track = select_caption_track(tracks, &self.languages);
        tracing::debug!(language = %track.language_code, "Fetching timed text");

        let response = self
            .http
            .get(timed_text_url(track, &self.languages))
            .send()
            .await
            .map_err(classify_request_error)?;
        check_status(response.status(), "timed text")?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::TransientUpstream(e.to_string()))?;

        let text = parse_timed_text(&body)?;
        if text.is_empty() {
            return Err(FetchError::NoTranscriptAvailable);
        }
        Ok(text)
    }
}

impl Default for YtTranscriptClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptSource for YtTranscriptClient {
    /// Fetches and normalizes the transcript, retrying transient upstream
    /// failures with exponential backoff (1s, 2s).
    async fn fetch(&self, video_id: &str) -> Result<String, FetchError> {
        let mut last_reason = String::new();
        for attempt in 0..Self::MAX_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_secs(1 << (attempt - 1))).await;
            }
            match self.try_fetch(video_id).await {
                Ok(text) => return Ok(text),
                Err(FetchError::TransientUpstream(reason)) => {
                    tracing::warn!(attempt, %reason, "Transient upstream failure, will retry");
                    last_reason = reason;
                }
                Err(e) => return Err(e),
            }
        }
        Err(FetchError::TransientUpstream(last_reason))
    }
}

fn classify_request_error(err: reqwest_middleware::Error) -> FetchError {
    match &err {
        reqwest_middleware::Error::Reqwest(e) if e.is_timeout() || e.is_connect() => {
            FetchError::TransientUpstream(err.to_string())
        }
        _ => FetchError::Unknown(err.to_string()),
    }
}

fn check_status(status: reqwest::StatusCode, context: &str) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else if status.is_server_error() {
        Err(FetchError::TransientUpstream(format!(
            "{context} returned {status}"
        )))
    } else {
        Err(FetchError::Unknown(format!("{context} returned {status}")))
    }
}

fn parse_player_response(html: &str) -> Result<PlayerResponse, FetchError> {
    // a missing blob usually means a consent or anti-bot interstitial
    let captures = PLAYER_RESPONSE_RE.captures(html).ok_or_else(|| {
        FetchError::TransientUpstream("ytInitialPlayerResponse not found in watch page".into())
    })?;
    serde_json::from_str(&captures[1])
        .map_err(|e| FetchError::TransientUpstream(format!("malformed player response: {e}")))
}

fn check_playability(player: &PlayerResponse) -> Result<(), FetchError> {
    let Some(status) = player
        .playability_status
        .as_ref()
        .and_then(|s| s.status.as_deref())
    else {
        return Ok(());
    };
    match status {
        "ERROR" | "LOGIN_REQUIRED" | "UNPLAYABLE" => Err(FetchError::VideoUnavailable),
        _ => Ok(()),
    }
}

fn caption_tracks(player: &PlayerResponse) -> Result<&[CaptionTrack], FetchError> {
    let renderer = player
        .captions
        .as_ref()
        .and_then(|c| c.player_captions_tracklist_renderer.as_ref())
        .ok_or(FetchError::TranscriptsDisabled)?;
    if renderer.caption_tracks.is_empty() {
        return Err(FetchError::NoTranscriptAvailable);
    }
    Ok(&renderer.caption_tracks)
}

/// Picks the first track matching the language preference order, falling back
/// to whatever track is listed first.
fn select_caption_track<'a>(tracks: &'a [CaptionTrack], preferred: &[String]) -> &'a CaptionTrack {
    preferred
        .iter()
        .find_map(|lang| tracks.iter().find(|t| &t.language_code == lang))
        .unwrap_or(&tracks[0])
}

fn timed_text_url(track: &CaptionTrack, preferred: &[String]) -> String {
    let mut url = format!("{}&fmt=json3", track.base_url);
    // ask YouTube to translate fallback tracks into English when it can
    if !preferred.contains(&track.language_code) && track.is_translatable {
        url.push_str("&tlang=en");
    }
    url
}

fn parse_timed_text(body: &str) -> Result<String, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::TransientUpstream("empty timed text response".into()));
    }
    let timed_text: TimedText = serde_json::from_str(body)
        .map_err(|e| FetchError::TransientUpstream(format!("malformed timed text: {e}")))?;

    let event_texts: Vec<String> = timed_text
        .events
        .iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|seg| seg.utf8.as_str()).collect();
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect();

    let joined = event_texts.join(" ");
    Ok(WHITESPACE_RE.replace_all(&joined, " ").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watch_page(player_json: &str) -> String {
        format!(
            "<html><head><script>var ytInitialPlayerResponse = {player_json};</script></head></html>"
        )
    }

    fn player_with_tracks(tracks_json: &str) -> String {
        format!(
            r#"{{"playabilityStatus":{{"status":"OK"}},"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":{tracks_json}}}}}}}"#
        )
    }

    #[test]
    fn extracts_player_response_from_watch_page() {
        let html = watch_page(&player_with_tracks(
            r#"[{"baseUrl":"https://example.com/tt?v=1","languageCode":"en"}]"#,
        ));
        let player = parse_player_response(&html).unwrap();
        let tracks = caption_tracks(&player).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].language_code, "en");
    }

    #[test]
    fn missing_player_response_is_transient() {
        let err = parse_player_response("<html><body>consent page</body></html>").unwrap_err();
        assert!(matches!(err, FetchError::TransientUpstream(_)));
    }

    #[test]
    fn truncated_player_response_is_transient() {
        let html = "<script>var ytInitialPlayerResponse = {\"captions\": ;</script>";
        let err = parse_player_response(html).unwrap_err();
        assert!(matches!(err, FetchError::TransientUpstream(_)));
    }

    #[test]
    fn unplayable_video_maps_to_unavailable() {
        let player: PlayerResponse =
            serde_json::from_str(r#"{"playabilityStatus":{"status":"LOGIN_REQUIRED"}}"#).unwrap();
        assert!(matches!(
            check_playability(&player),
            Err(FetchError::VideoUnavailable)
        ));
    }

    #[test]
    fn missing_captions_renderer_means_transcripts_disabled() {
        let player: PlayerResponse =
            serde_json::from_str(r#"{"playabilityStatus":{"status":"OK"}}"#).unwrap();
        assert!(matches!(
            caption_tracks(&player).unwrap_err(),
            FetchError::TranscriptsDisabled
        ));
    }

    #[test]
    fn empty_track_list_means_no_transcript() {
        let player: PlayerResponse = serde_json::from_str(&player_with_tracks("[]")).unwrap();
        assert!(matches!(
            caption_tracks(&player).unwrap_err(),
            FetchError::NoTranscriptAvailable
        ));
    }

    #[test]
    fn prefers_english_track_over_first_listed() {
        let player: PlayerResponse = serde_json::from_str(&player_with_tracks(
            r#"[{"baseUrl":"https://example.com/fr","languageCode":"fr"},
                {"baseUrl":"https://example.com/en","languageCode":"en"}]"#,
        ))
        .unwrap();
        let tracks = caption_tracks(&player).unwrap();
        let preferred: Vec<String> = ["en", "en-US", "en-GB"].iter().map(|s| s.to_string()).collect();
        let track = select_caption_track(tracks, &preferred);
        assert_eq!(track.language_code, "en");
    }

    #[test]
    fn falls_back_to_first_track_and_requests_translation() {
        let player: PlayerResponse = serde_json::from_str(&player_with_tracks(
            r#"[{"baseUrl":"https://example.com/fr?v=1","languageCode":"fr","isTranslatable":true}]"#,
        ))
        .unwrap();
        let tracks = caption_tracks(&player).unwrap();
        let preferred: Vec<String> = ["en", "en-US", "en-GB"].iter().map(|s| s.to_string()).collect();
        let track = select_caption_track(tracks, &preferred);
        let url = timed_text_url(track, &preferred);
        assert!(url.contains("&fmt=json3"));
        assert!(url.ends_with("&tlang=en"));
    }

    #[test]
    fn preferred_track_is_not_translated() {
        let preferred: Vec<String> = ["en"].iter().map(|s| s.to_string()).collect();
        let track = CaptionTrack {
            base_url: "https://example.com/en?v=1".into(),
            language_code: "en".into(),
            is_translatable: true,
        };
        assert!(!timed_text_url(&track, &preferred).contains("tlang"));
    }

    #[test]
    fn joins_and_normalizes_timed_text() {
        let body = r#"{"events":[
            {"segs":[{"utf8":"Alice said"},{"utf8":" hello."}]},
            {"segs":[{"utf8":"\n"}]},
            {"segs":[{"utf8":"Bob   replied hi."}]}
        ]}"#;
        assert_eq!(
            parse_timed_text(body).unwrap(),
            "Alice said hello. Bob replied hi."
        );
    }

    #[test]
    fn empty_timed_text_body_is_transient() {
        assert!(matches!(
            parse_timed_text("  ").unwrap_err(),
            FetchError::TransientUpstream(_)
        ));
    }
}
