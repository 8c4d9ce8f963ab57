use crate::catalog::Catalog;
use crate::ranking::{Metric, top_n};
use crate::stats::{Aggregator, TrackAggregate};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedTrack {
    pub rank: usize,
    pub song_id: String,
    pub title: String,
    pub artist: Option<String>,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    #[serde(with = "time::serde::rfc3339")]
    pub now: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub one_year_ago: OffsetDateTime,
    pub unique_tracks: usize,
    pub total_plays: u64,
    pub total_listen_ms: u64,
    pub total_listen_ms_recent: u64,
    pub top_all_time: Vec<RankedTrack>,
    pub top_past_year: Vec<RankedTrack>,
    pub top_listen_time: Vec<RankedTrack>,
}

pub fn build_report(catalog: &Catalog, aggregator: &Aggregator, results: usize) -> Report {
    let ranked = |metric: Metric| {
        ranked_tracks(
            &top_n(aggregator.all_aggregates(), results, metric, catalog.window()),
            metric,
            catalog,
        )
    };

    let report = Report {
        now: catalog.now(),
        one_year_ago: catalog.one_year_ago(),
        unique_tracks: aggregator.aggregate_count(),
        total_plays: aggregator.total_plays(),
        total_listen_ms: aggregator.total_duration(),
        total_listen_ms_recent: aggregator.total_duration_recent(catalog.window()),
        top_all_time: ranked(Metric::Plays),
        top_past_year: ranked(Metric::PlaysRecent),
        top_listen_time: ranked(Metric::ListenTime),
    };
    debug!(
        unique_tracks = report.unique_tracks,
        results, "report built"
    );
    report
}

fn ranked_tracks(tracks: &[&TrackAggregate], metric: Metric, catalog: &Catalog) -> Vec<RankedTrack> {
    tracks
        .iter()
        .enumerate()
        .map(|(idx, track)| RankedTrack {
            rank: idx + 1,
            song_id: track.song_id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            value: metric.value(track, catalog.window()),
        })
        .collect()
}
