use crate::error::StatsError;
use crate::model::ListenEvent;
use time::{Duration, OffsetDateTime};
use tracing::debug;

pub const RECENT_WINDOW: Duration = Duration::days(365);

/// Exclusive lower bound of the trailing one-year window, taken from the
/// newest play rather than the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentWindow {
    cutoff: OffsetDateTime,
}

impl RecentWindow {
    pub fn ending_at(now: OffsetDateTime) -> Self {
        Self {
            cutoff: now.saturating_sub(RECENT_WINDOW),
        }
    }

    pub fn cutoff(&self) -> OffsetDateTime {
        self.cutoff
    }

    pub fn contains(&self, timestamp: OffsetDateTime) -> bool {
        timestamp > self.cutoff
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    events: Vec<ListenEvent>,
    now: OffsetDateTime,
    window: RecentWindow,
}

impl Catalog {
    pub fn new(mut events: Vec<ListenEvent>) -> Result<Self, StatsError> {
        let now = events
            .iter()
            .map(|event| event.timestamp)
            .max()
            .ok_or(StatsError::EmptyDataset)?;
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let window = RecentWindow::ending_at(now);
        debug!(
            plays = events.len(),
            %now,
            cutoff = %window.cutoff(),
            "catalog anchored"
        );
        Ok(Self {
            events,
            now,
            window,
        })
    }

    pub fn events(&self) -> &[ListenEvent] {
        &self.events
    }

    pub fn now(&self) -> OffsetDateTime {
        self.now
    }

    pub fn one_year_ago(&self) -> OffsetDateTime {
        self.window.cutoff()
    }

    pub fn window(&self) -> RecentWindow {
        self.window
    }

    pub fn is_within_last_year(&self, timestamp: OffsetDateTime) -> bool {
        self.window.contains(timestamp)
    }

    pub fn total_listen_ms(&self) -> u64 {
        self.events
            .iter()
            .fold(0_u64, |total, event| total.saturating_add(event.duration_ms))
    }

    pub fn total_listen_ms_recent(&self) -> u64 {
        self.events
            .iter()
            .filter(|event| self.window.contains(event.timestamp))
            .fold(0_u64, |total, event| total.saturating_add(event.duration_ms))
    }
}
