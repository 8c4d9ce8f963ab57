use crate::catalog::RecentWindow;
use crate::stats::TrackAggregate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    Plays,
    PlaysRecent,
    ListenTime,
    ListenTimeRecent,
}

impl Metric {
    pub fn value(self, track: &TrackAggregate, window: RecentWindow) -> u64 {
        match self {
            Self::Plays => track.play_count(),
            Self::PlaysRecent => track.play_count_recent(window),
            Self::ListenTime => track.total_duration(),
            Self::ListenTimeRecent => track.total_duration_recent(window),
        }
    }
}

pub fn top_n<'a>(
    tracks: &'a [TrackAggregate],
    n: usize,
    metric: Metric,
    window: RecentWindow,
) -> Vec<&'a TrackAggregate> {
    top_n_by(tracks, n, |track| metric.value(track, window))
}

/// The working set is re-sorted after each change, so its last element is
/// the admission threshold. A candidate must beat it strictly: on ties the
/// item scanned first stays.
pub fn top_n_by<T, K, F>(items: &[T], n: usize, key: F) -> Vec<&T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    if n == 0 {
        return Vec::new();
    }

    let mut kept: Vec<(K, &T)> = Vec::with_capacity(n.min(items.len()));
    for item in items {
        let value = key(item);
        if kept.len() < n {
            kept.push((value, item));
            kept.sort_by(|a, b| b.0.cmp(&a.0));
            continue;
        }

        let beats_threshold = kept.last().is_some_and(|(lowest, _)| value > *lowest);
        if beats_threshold {
            kept.pop();
            kept.push((value, item));
            kept.sort_by(|a, b| b.0.cmp(&a.0));
        }
    }

    kept.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::model::fixtures::play;
    use crate::stats::Aggregator;
    use proptest::prop_assert;
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};

    const NOW: OffsetDateTime = datetime!(2024-06-01 12:00 UTC);

    fn scenario() -> (Catalog, Aggregator) {
        let events = vec![
            play("a", NOW - Duration::days(1), 1_000),
            play("a", NOW - Duration::days(2), 1_000),
            play("a", NOW - Duration::days(3), 1_000),
            play("b", NOW - Duration::days(1), 5_000),
            play("c", NOW - Duration::days(800), 1_000),
            play("c", NOW - Duration::days(801), 1_000),
            play("c", NOW - Duration::days(802), 1_000),
            play("c", NOW - Duration::days(803), 1_000),
            play("d", NOW, 1),
        ];
        let catalog = Catalog::new(events).expect("catalog");
        let aggregator = Aggregator::from_events(catalog.events()).expect("ingest");
        (catalog, aggregator)
    }

    fn ids(tracks: &[&TrackAggregate]) -> Vec<String> {
        tracks.iter().map(|track| track.song_id.clone()).collect()
    }

    #[test]
    fn most_played_wins() {
        let (catalog, aggregator) = scenario();
        let top = top_n(aggregator.all_aggregates(), 1, Metric::Plays, catalog.window());
        assert_eq!(ids(&top), vec!["c"]);
    }

    #[test]
    fn recent_ranking_ignores_old_plays() {
        let (catalog, aggregator) = scenario();
        let top = top_n(
            aggregator.all_aggregates(),
            2,
            Metric::PlaysRecent,
            catalog.window(),
        );
        assert_eq!(ids(&top), vec!["a", "d"]);
    }

    #[test]
    fn listen_time_ranking() {
        let (catalog, aggregator) = scenario();
        let top = top_n(
            aggregator.all_aggregates(),
            3,
            Metric::ListenTime,
            catalog.window(),
        );
        assert_eq!(ids(&top), vec!["b", "c", "a"]);
    }

    #[test]
    fn zero_returns_nothing() {
        let (catalog, aggregator) = scenario();
        assert!(top_n(aggregator.all_aggregates(), 0, Metric::Plays, catalog.window()).is_empty());
    }

    #[test]
    fn short_input_returns_everything_sorted() {
        let (catalog, aggregator) = scenario();
        let top = top_n(aggregator.all_aggregates(), 50, Metric::Plays, catalog.window());
        assert_eq!(ids(&top), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn ties_do_not_evict_earlier_candidates() {
        let items = [("first", 5), ("second", 3), ("third", 5), ("fourth", 3)];
        let top = top_n_by(&items, 2, |item| item.1);
        let names: Vec<&str> = top.iter().map(|item| item.0).collect();
        assert_eq!(names, vec!["first", "third"]);

        let top = top_n_by(&items, 3, |item| item.1);
        let names: Vec<&str> = top.iter().map(|item| item.0).collect();
        assert_eq!(names, vec!["first", "third", "second"]);
    }

    proptest::proptest! {
        #[test]
        fn selection_matches_full_sort(
            values in proptest::collection::vec(0u32..20, 0..60),
            n in 0usize..70,
        ) {
            let items: Vec<(usize, u32)> = values.iter().copied().enumerate().collect();
            let top = top_n_by(&items, n, |item| item.1);

            prop_assert!(top.len() == n.min(items.len()));
            prop_assert!(top.windows(2).all(|pair| pair[0].1 >= pair[1].1));

            let mut seen: Vec<usize> = top.iter().map(|item| item.0).collect();
            seen.sort_unstable();
            seen.dedup();
            prop_assert!(seen.len() == top.len());

            let mut expected: Vec<u32> = values.clone();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(n);
            let got: Vec<u32> = top.iter().map(|item| item.1).collect();
            prop_assert!(got == expected);

            let again = top_n_by(&items, n, |item| item.1);
            prop_assert!(again == top);
        }
    }
}
