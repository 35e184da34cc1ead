use crate::{
    clock::{Clock, SystemClock},
    error::StatsError,
    resolution::{parse_resolution, parse_timestamp},
};
use chrono::{DateTime, TimeDelta, Utc};
use model::time::{
    rollup::{Rollup, RollupTable},
    window::{TimeWindow, WindowError},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Raw stats query parameters, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsQuery {
    pub since: Option<String>,
    pub until: Option<String>,
    pub resolution: Option<String>,
}

impl StatsQuery {
    pub fn from_query(query: &[(String, String)]) -> Self {
        let lookup = |name: &str| {
            query
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };

        StatsQuery {
            since: lookup("since"),
            until: lookup("until"),
            resolution: lookup("resolution"),
        }
    }
}

/// Largest `default_span_secs` a [`TimeDelta`] can represent.
pub const MAX_DEFAULT_SPAN_SECS: i64 = i64::MAX / 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Span of the window when `since` is absent.
    pub default_span_secs: i64,
    /// Upper bound on buckets when the aggregator picks a rollup itself.
    pub max_buckets: u64,
    pub rollups: RollupTable,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        ResolverSettings {
            // one day, minus one second
            default_span_secs: 86_400 - 1,
            max_buckets: 1_000,
            rollups: RollupTable::default(),
        }
    }
}

/// Turns optional `since` / `until` / `resolution` strings into a
/// validated [`TimeWindow`].
#[derive(Debug, Clone)]
pub struct TimeWindowResolver {
    settings: ResolverSettings,
    clock: Arc<dyn Clock>,
}

impl Default for TimeWindowResolver {
    fn default() -> Self {
        TimeWindowResolver::new(ResolverSettings::default())
    }
}

impl TimeWindowResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        TimeWindowResolver {
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn rollups(&self) -> &RollupTable {
        &self.settings.rollups
    }

    pub fn resolve(&self, query: &StatsQuery) -> Result<TimeWindow, StatsError> {
        let rollup = match present(&query.resolution) {
            Some(raw) => Some(self.parse_rollup(raw)?),
            None => None,
        };

        let end = match present(&query.until) {
            Some(raw) => parse_timestamp("until", raw)?,
            None => self.clock.now(),
        };

        let start = match present(&query.since) {
            Some(raw) => parse_timestamp("since", raw)?,
            None => {
                let secs = self.settings.default_span_secs;
                TimeDelta::try_seconds(secs)
                    .and_then(|span| end.checked_sub_signed(span))
                    .ok_or(WindowError::SpanOutOfRange(secs))?
            }
        };

        if start > end {
            return Err(StatsError::InvertedWindow { start, end });
        }

        let mut window = TimeWindow::new(start, end)?;
        if let Some(seconds) = rollup {
            window = window.with_rollup(seconds, &self.settings.rollups)?;
        }
        debug!(
            start = %window.start(),
            end = %window.end(),
            rollup = ?window.rollup(),
            "Resolved stats window"
        );

        Ok(window)
    }

    /// Parses a resolution and checks it against the rollup table.
    pub fn parse_rollup(&self, raw: &str) -> Result<u64, StatsError> {
        let seconds = parse_resolution(raw)?;
        if !self.settings.rollups.contains(seconds) {
            return Err(StatsError::UnsupportedRollup { seconds });
        }
        Ok(seconds)
    }

    /// Bucket start timestamps for `window`, capped at `max_buckets`.
    pub fn buckets(
        &self,
        window: &TimeWindow,
        rollup: u64,
    ) -> Result<Vec<DateTime<Utc>>, StatsError> {
        Ok(window.buckets(rollup, self.settings.max_buckets)?)
    }

    /// The requested rollup, or the finest one that keeps the window within
    /// `max_buckets` when none was requested.
    pub fn effective_rollup(&self, window: &TimeWindow) -> Result<&Rollup, StatsError> {
        if let Some(seconds) = window.rollup() {
            return self
                .settings
                .rollups
                .get(seconds)
                .ok_or(StatsError::UnsupportedRollup { seconds });
        }

        Ok(self
            .settings
            .rollups
            .optimal_for(window, self.settings.max_buckets)?)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn resolver() -> TimeWindowResolver {
        let clock = FixedClock::at_timestamp(2_000_000_000).unwrap();
        TimeWindowResolver::default().with_clock(Arc::new(clock))
    }

    fn query(since: Option<&str>, until: Option<&str>, resolution: Option<&str>) -> StatsQuery {
        StatsQuery {
            since: since.map(str::to_string),
            until: until.map(str::to_string),
            resolution: resolution.map(str::to_string),
        }
    }

    #[test]
    fn test_until_without_since_uses_trailing_day() {
        let window = resolver()
            .resolve(&query(None, Some("1000000000"), None))
            .unwrap();

        assert_eq!(window.start().timestamp(), 999_913_601);
        assert_eq!(window.end().timestamp(), 1_000_000_000);
        assert_eq!(window.rollup(), None);
    }

    #[test]
    fn test_defaults_to_clock_now() {
        let window = resolver().resolve(&StatsQuery::default()).unwrap();

        assert_eq!(window.end().timestamp(), 2_000_000_000);
        assert_eq!(window.start().timestamp(), 2_000_000_000 - 86_399);
    }

    #[test]
    fn test_explicit_window_and_rollup() {
        let window = resolver()
            .resolve(&query(Some("100"), Some("200.25"), Some("1h")))
            .unwrap();

        assert_eq!(window.start().timestamp(), 100);
        assert_eq!(window.end().timestamp_subsec_millis(), 250);
        assert_eq!(window.rollup(), Some(3_600));
    }

    #[test]
    fn test_unsupported_rollup() {
        let err = resolver()
            .resolve(&query(None, None, Some("30m")))
            .unwrap_err();

        assert_eq!(err, StatsError::UnsupportedRollup { seconds: 1_800 });
        assert_eq!(err.field(), Some("resolution"));
    }

    #[test]
    fn test_invalid_resolution() {
        for raw in ["1x", "abc"] {
            let err = resolver().resolve(&query(None, None, Some(raw))).unwrap_err();
            assert_eq!(err, StatsError::InvalidResolution(raw.to_string()));
        }
    }

    #[test]
    fn test_invalid_timestamps() {
        let err = resolver()
            .resolve(&query(Some("last week"), None, None))
            .unwrap_err();
        assert_eq!(err.field(), Some("since"));

        let err = resolver()
            .resolve(&query(None, Some("tomorrow"), None))
            .unwrap_err();
        assert_eq!(err.field(), Some("until"));
    }

    #[test]
    fn test_inverted_window() {
        let err = resolver()
            .resolve(&query(Some("500"), Some("100"), None))
            .unwrap_err();
        assert!(matches!(err, StatsError::InvertedWindow { .. }));
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let window = resolver()
            .resolve(&query(Some(""), Some("1000000000"), Some("")))
            .unwrap();

        assert_eq!(window.start().timestamp(), 999_913_601);
        assert_eq!(window.rollup(), None);
    }

    #[test]
    fn test_configured_span() {
        let settings = ResolverSettings {
            default_span_secs: 3_600,
            ..Default::default()
        };
        let window = TimeWindowResolver::new(settings)
            .resolve(&query(None, Some("7200"), None))
            .unwrap();

        assert_eq!(window.start().timestamp(), 3_600);
    }

    #[test]
    fn test_effective_rollup() {
        let resolver = resolver();

        let explicit = resolver
            .resolve(&query(None, Some("1000000000"), Some("1d")))
            .unwrap();
        assert_eq!(resolver.effective_rollup(&explicit).unwrap().seconds, 86_400);

        // a trailing day spans over 8000 ten-second buckets, above the default cap
        let implicit = resolver
            .resolve(&query(None, Some("1000000000"), None))
            .unwrap();
        assert_eq!(resolver.effective_rollup(&implicit).unwrap().seconds, 3_600);
    }

    #[test]
    fn test_oversized_default_span_is_an_error() {
        for secs in [i64::MAX, MAX_DEFAULT_SPAN_SECS] {
            let settings = ResolverSettings {
                default_span_secs: secs,
                ..Default::default()
            };
            let err = TimeWindowResolver::new(settings)
                .resolve(&query(None, Some("1000"), None))
                .unwrap_err();

            assert_eq!(err, StatsError::Window(WindowError::SpanOutOfRange(secs)));
        }
    }

    #[test]
    fn test_buckets_respect_max_buckets() {
        let resolver = resolver();
        let wide = resolver
            .resolve(&query(Some("0"), Some("2000000000"), Some("10s")))
            .unwrap();

        assert!(matches!(
            resolver.buckets(&wide, 10),
            Err(StatsError::Window(WindowError::TooManyBuckets { max: 1_000, .. }))
        ));

        let day = resolver
            .resolve(&query(None, Some("1000000000"), Some("1h")))
            .unwrap();
        assert_eq!(resolver.buckets(&day, 3_600).unwrap().len(), 25);
    }

    #[test]
    fn test_from_query() {
        let pairs = vec![
            ("since".to_string(), "1".to_string()),
            ("resolution".to_string(), "10s".to_string()),
            ("other".to_string(), "x".to_string()),
        ];
        assert_eq!(
            StatsQuery::from_query(&pairs),
            query(Some("1"), None, Some("10s"))
        );
    }
}
