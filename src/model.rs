use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenEvent {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub duration_ms: u64,
    pub song_id: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub start_reason: String,
    pub end_reason: String,
    pub shuffle: Option<bool>,
    pub offline: Option<bool>,
    pub private: Option<bool>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::ListenEvent;
    use time::OffsetDateTime;

    pub fn play(song_id: &str, timestamp: OffsetDateTime, duration_ms: u64) -> ListenEvent {
        ListenEvent {
            timestamp,
            duration_ms,
            song_id: song_id.to_string(),
            title: format!("Title {song_id}"),
            artist: Some(format!("Artist {song_id}")),
            album: Some(format!("Album {song_id}")),
            start_reason: String::from("trackdone"),
            end_reason: String::from("trackdone"),
            shuffle: Some(false),
            offline: Some(false),
            private: Some(false),
        }
    }
}
