use serde::Deserialize;

/// The slice of `ytInitialPlayerResponse` this crate cares about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerResponse {
    pub playability_status: Option<PlayabilityStatus>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayabilityStatus {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Captions {
    pub player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TracklistRenderer {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    #[serde(default)]
    pub is_translatable: bool,
}

/// Timed-text document in the `json3` wire format.
#[derive(Debug, Deserialize)]
pub(crate) struct TimedText {
    #[serde(default)]
    pub events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimedTextEvent {
    #[serde(default)]
    pub segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimedTextSeg {
    #[serde(default)]
    pub utf8: String,
}
