use crate::catalog::RecentWindow;
use crate::error::StatsError;
use crate::model::ListenEvent;
use crate::tally::Tally;
use std::collections::{BTreeMap, HashMap};
use time::OffsetDateTime;
use tracing::debug;

/// `play_timestamps` and `durations` are parallel: index `i` of each
/// describes the same play.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackAggregate {
    pub song_id: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    play_timestamps: Vec<OffsetDateTime>,
    durations: Vec<u64>,
    start_reasons: BTreeMap<String, u64>,
    end_reasons: BTreeMap<String, u64>,
    shuffle: Tally,
    offline: Tally,
    private: Tally,
}

impl TrackAggregate {
    pub fn new(event: &ListenEvent) -> Self {
        Self {
            song_id: event.song_id.clone(),
            title: event.title.clone(),
            artist: event.artist.clone(),
            album: event.album.clone(),
            play_timestamps: Vec::new(),
            durations: Vec::new(),
            start_reasons: BTreeMap::new(),
            end_reasons: BTreeMap::new(),
            shuffle: Tally::default(),
            offline: Tally::default(),
            private: Tally::default(),
        }
    }

    pub fn fold(&mut self, event: &ListenEvent) -> Result<(), StatsError> {
        if event.song_id != self.song_id {
            return Err(StatsError::IdentityMismatch {
                expected: self.song_id.clone(),
                found: event.song_id.clone(),
            });
        }

        self.play_timestamps.push(event.timestamp);
        self.durations.push(event.duration_ms);
        bump(&mut self.start_reasons, &event.start_reason, 1);
        bump(&mut self.end_reasons, &event.end_reason, 1);
        self.shuffle.record(event.shuffle);
        self.offline.record(event.offline);
        self.private.record(event.private);
        Ok(())
    }

    pub fn absorb(&mut self, other: TrackAggregate) -> Result<(), StatsError> {
        if other.song_id != self.song_id {
            return Err(StatsError::IdentityMismatch {
                expected: self.song_id.clone(),
                found: other.song_id,
            });
        }

        self.play_timestamps.extend(other.play_timestamps);
        self.durations.extend(other.durations);
        for (reason, count) in &other.start_reasons {
            bump(&mut self.start_reasons, reason, *count);
        }
        for (reason, count) in &other.end_reasons {
            bump(&mut self.end_reasons, reason, *count);
        }
        self.shuffle.merge(&other.shuffle);
        self.offline.merge(&other.offline);
        self.private.merge(&other.private);
        Ok(())
    }

    pub fn play_timestamps(&self) -> &[OffsetDateTime] {
        &self.play_timestamps
    }

    pub fn durations(&self) -> &[u64] {
        &self.durations
    }

    pub fn start_reasons(&self) -> &BTreeMap<String, u64> {
        &self.start_reasons
    }

    pub fn end_reasons(&self) -> &BTreeMap<String, u64> {
        &self.end_reasons
    }

    pub fn shuffle(&self) -> Tally {
        self.shuffle
    }

    pub fn offline(&self) -> Tally {
        self.offline
    }

    pub fn private(&self) -> Tally {
        self.private
    }

    pub fn play_count(&self) -> u64 {
        self.play_timestamps.len() as u64
    }

    pub fn play_count_recent(&self, window: RecentWindow) -> u64 {
        self.play_timestamps
            .iter()
            .filter(|timestamp| window.contains(**timestamp))
            .count() as u64
    }

    pub fn total_duration(&self) -> u64 {
        self.durations
            .iter()
            .fold(0_u64, |total, ms| total.saturating_add(*ms))
    }

    pub fn total_duration_recent(&self, window: RecentWindow) -> u64 {
        self.play_timestamps
            .iter()
            .zip(&self.durations)
            .filter(|(timestamp, _)| window.contains(**timestamp))
            .fold(0_u64, |total, (_, ms)| total.saturating_add(*ms))
    }

    pub fn average_duration(&self) -> Result<f64, StatsError> {
        let plays = self.play_count();
        if plays == 0 {
            return Err(StatsError::DivisionUndefined {
                song_id: self.song_id.clone(),
            });
        }
        Ok(self.total_duration() as f64 / plays as f64)
    }

    pub fn first_play(&self) -> Result<OffsetDateTime, StatsError> {
        self.play_timestamps
            .iter()
            .min()
            .copied()
            .ok_or_else(|| StatsError::NoPlays {
                song_id: self.song_id.clone(),
            })
    }

    pub fn last_play(&self) -> Result<OffsetDateTime, StatsError> {
        self.play_timestamps
            .iter()
            .max()
            .copied()
            .ok_or_else(|| StatsError::NoPlays {
                song_id: self.song_id.clone(),
            })
    }
}

fn bump(counts: &mut BTreeMap<String, u64>, reason: &str, by: u64) {
    match counts.get_mut(reason) {
        Some(count) => *count = count.saturating_add(by),
        None => {
            counts.insert(reason.to_string(), by);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    tracks: Vec<TrackAggregate>,
    track_lookup: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: &[ListenEvent]) -> Result<Self, StatsError> {
        let mut aggregator = Self::new();
        aggregator.ingest(events)?;
        Ok(aggregator)
    }

    pub fn ingest(&mut self, events: &[ListenEvent]) -> Result<(), StatsError> {
        let before = self.tracks.len();
        for event in events {
            let idx = self.slot_for(event);
            self.tracks[idx].fold(event)?;
        }
        debug!(
            plays = events.len(),
            new_tracks = self.tracks.len() - before,
            "ingested plays"
        );
        Ok(())
    }

    pub fn merge(&mut self, other: Aggregator) -> Result<(), StatsError> {
        for track in other.tracks {
            match self.track_lookup.get(&track.song_id) {
                Some(&idx) => self.tracks[idx].absorb(track)?,
                None => {
                    self.track_lookup
                        .insert(track.song_id.clone(), self.tracks.len());
                    self.tracks.push(track);
                }
            }
        }
        Ok(())
    }

    pub fn all_aggregates(&self) -> &[TrackAggregate] {
        &self.tracks
    }

    pub fn aggregate_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn get(&self, song_id: &str) -> Option<&TrackAggregate> {
        self.track_lookup
            .get(song_id)
            .map(|&idx| &self.tracks[idx])
    }

    pub fn total_plays(&self) -> u64 {
        self.tracks
            .iter()
            .fold(0_u64, |total, track| total.saturating_add(track.play_count()))
    }

    pub fn total_duration(&self) -> u64 {
        self.tracks
            .iter()
            .fold(0_u64, |total, track| total.saturating_add(track.total_duration()))
    }

    pub fn total_duration_recent(&self, window: RecentWindow) -> u64 {
        self.tracks.iter().fold(0_u64, |total, track| {
            total.saturating_add(track.total_duration_recent(window))
        })
    }

    fn slot_for(&mut self, event: &ListenEvent) -> usize {
        if let Some(&idx) = self.track_lookup.get(&event.song_id) {
            return idx;
        }
        let idx = self.tracks.len();
        self.tracks.push(TrackAggregate::new(event));
        self.track_lookup.insert(event.song_id.clone(), idx);
        idx
    }
}
