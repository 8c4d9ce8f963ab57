use crate::error::StatsError;
use crate::model::ListenEvent;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};
use walkdir::WalkDir;

const HISTORY_FILE_PREFIXES: [&str; 2] = ["endsong_", "Streaming_History_Audio_"];
const UNKNOWN_REASON: &str = "unknown";

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlay {
    pub ts: Option<Value>,
    pub ms_played: Option<Value>,
    #[serde(default)]
    pub spotify_track_uri: Option<String>,
    #[serde(default)]
    pub spotify_episode_uri: Option<String>,
    #[serde(default)]
    pub master_metadata_track_name: Option<String>,
    #[serde(default)]
    pub master_metadata_album_artist_name: Option<String>,
    #[serde(default)]
    pub master_metadata_album_album_name: Option<String>,
    #[serde(default)]
    pub reason_start: Option<String>,
    #[serde(default)]
    pub reason_end: Option<String>,
    #[serde(default)]
    pub shuffle: Option<bool>,
    #[serde(default)]
    pub offline: Option<bool>,
    #[serde(default)]
    pub incognito_mode: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub files: Vec<PathBuf>,
    pub plays: usize,
    pub skipped_episodes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LoadedHistory {
    pub events: Vec<ListenEvent>,
    pub summary: LoadSummary,
}

// `Ok(None)` is a podcast episode, not a song play.
pub fn convert(index: usize, raw: RawPlay) -> Result<Option<ListenEvent>, StatsError> {
    let malformed = |reason: String| StatsError::MalformedEvent { index, reason };

    let ts = match raw.ts {
        Some(Value::String(ts)) => ts,
        Some(other) => return Err(malformed(format!("`ts` is not a string: {other}"))),
        None => return Err(malformed(String::from("missing `ts`"))),
    };
    let timestamp = OffsetDateTime::parse(&ts, &Rfc3339)
        .map_err(|err| malformed(format!("unparsable `ts` {ts:?}: {err}")))?;

    let ms_played = raw
        .ms_played
        .ok_or_else(|| malformed(String::from("missing `ms_played`")))?;
    let duration_ms = match ms_played.as_u64() {
        Some(ms) => ms,
        None if ms_played.is_i64() => {
            return Err(malformed(format!("negative `ms_played` {ms_played}")));
        }
        None => {
            return Err(malformed(format!(
                "`ms_played` is not an integer: {ms_played}"
            )));
        }
    };

    let song_id = match raw.spotify_track_uri.filter(|uri| !uri.trim().is_empty()) {
        Some(uri) => uri,
        None if raw.spotify_episode_uri.is_some() => return Ok(None),
        None => return Err(malformed(String::from("missing `spotify_track_uri`"))),
    };

    Ok(Some(ListenEvent {
        timestamp,
        duration_ms,
        title: raw
            .master_metadata_track_name
            .unwrap_or_else(|| song_id.clone()),
        song_id,
        artist: raw.master_metadata_album_artist_name,
        album: raw.master_metadata_album_album_name,
        start_reason: raw
            .reason_start
            .unwrap_or_else(|| String::from(UNKNOWN_REASON)),
        end_reason: raw
            .reason_end
            .unwrap_or_else(|| String::from(UNKNOWN_REASON)),
        shuffle: raw.shuffle,
        offline: raw.offline,
        private: raw.incognito_mode,
    }))
}

pub fn parse_plays(raw: &str) -> Result<(Vec<ListenEvent>, usize)> {
    let records: Vec<RawPlay> =
        serde_json::from_str(raw).context("history is not a JSON array of play records")?;
    let mut events = Vec::with_capacity(records.len());
    let mut skipped_episodes = 0;
    for (index, record) in records.into_iter().enumerate() {
        match convert(index, record)? {
            Some(event) => events.push(event),
            None => skipped_episodes += 1,
        }
    }
    Ok((events, skipped_episodes))
}

pub fn load_file(path: &Path) -> Result<(Vec<ListenEvent>, usize)> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_plays(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn history_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("history directory {} does not exist", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("failed to scan {}", dir.display()))?;
        if entry.file_type().is_file() && is_history_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

pub fn load_dir(dir: &Path) -> Result<LoadedHistory> {
    let files = history_files(dir)?;
    if files.is_empty() {
        anyhow::bail!(
            "no endsong_*.json or Streaming_History_Audio_*.json files in {}",
            dir.display()
        );
    }

    let mut loaded = LoadedHistory::default();
    for path in &files {
        let (events, skipped) = load_file(path)?;
        debug!(
            file = %path.display(),
            plays = events.len(),
            skipped_episodes = skipped,
            "loaded history file"
        );
        loaded.summary.skipped_episodes += skipped;
        loaded.events.extend(events);
    }
    loaded.summary.plays = loaded.events.len();
    loaded.summary.files = files;
    info!(
        files = loaded.summary.files.len(),
        plays = loaded.summary.plays,
        skipped_episodes = loaded.summary.skipped_episodes,
        "history loaded"
    );
    Ok(loaded)
}

fn is_history_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    name.ends_with(".json")
        && HISTORY_FILE_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}
