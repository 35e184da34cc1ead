use crate::time::rollup::RollupTable;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("Window start {start} is after its end {end}")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid rollup of {0} seconds")]
    InvalidRollup(u64),

    #[error("Timestamp out of range after aligning to {0} second buckets")]
    OutOfRange(u64),

    #[error("A span of {0} seconds reaches outside the supported time range")]
    SpanOutOfRange(i64),

    #[error("Window covers {count} buckets, more than the limit of {max}")]
    TooManyBuckets { count: u64, max: u64 },
}

/// Normalized time window for a stats query.
///
/// `start <= end` always holds. `rollup` is the bucket size in seconds, or
/// `None` when the caller left the choice to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rollup: Option<u64>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted { start, end });
        }

        Ok(TimeWindow {
            start,
            end,
            rollup: None,
        })
    }

    /// Creates a window ending at `end` and spanning `span` backwards.
    pub fn trailing(end: DateTime<Utc>, span: TimeDelta) -> Result<Self, WindowError> {
        let start = end
            .checked_sub_signed(span)
            .ok_or(WindowError::SpanOutOfRange(span.num_seconds()))?;
        TimeWindow::new(start, end)
    }

    /// Sets the rollup, which must be an entry of `table`.
    pub fn with_rollup(mut self, rollup: u64, table: &RollupTable) -> Result<Self, WindowError> {
        if !table.contains(rollup) {
            return Err(WindowError::InvalidRollup(rollup));
        }
        self.rollup = Some(rollup);
        Ok(self)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn rollup(&self) -> Option<u64> {
        self.rollup
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.start && *timestamp <= self.end
    }

    /// Floors both ends onto `rollup` second boundaries since the epoch.
    pub fn snap_to(&self, rollup: u64) -> Result<Self, WindowError> {
        Ok(TimeWindow {
            start: floor_to(self.start, rollup)?,
            end: floor_to(self.end, rollup)?,
            rollup: self.rollup,
        })
    }

    /// Number of `rollup` buckets touched by the window, counting the bucket
    /// that contains `end`.
    pub fn bucket_count(&self, rollup: u64) -> Result<u64, WindowError> {
        let snapped = self.snap_to(rollup)?;
        let span = (snapped.end.timestamp() - snapped.start.timestamp()) as u64;
        Ok(span / rollup + 1)
    }

    /// Start timestamps of every bucket touched by the window, ascending.
    /// Fails before allocating when there would be more than `max_buckets`.
    pub fn buckets(
        &self,
        rollup: u64,
        max_buckets: u64,
    ) -> Result<Vec<DateTime<Utc>>, WindowError> {
        let count = self.bucket_count(rollup)?;
        if count > max_buckets {
            return Err(WindowError::TooManyBuckets {
                count,
                max: max_buckets,
            });
        }

        let snapped = self.snap_to(rollup)?;
        let step = TimeDelta::try_seconds(rollup_secs(rollup)?)
            .ok_or(WindowError::InvalidRollup(rollup))?;

        let mut out = Vec::with_capacity(count as usize);
        let mut at = snapped.start;
        while at <= snapped.end {
            out.push(at);
            match at.checked_add_signed(step) {
                Some(next) => at = next,
                None => break,
            }
        }
        Ok(out)
    }
}

fn rollup_secs(rollup: u64) -> Result<i64, WindowError> {
    match i64::try_from(rollup) {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(WindowError::InvalidRollup(rollup)),
    }
}

fn floor_to(ts: DateTime<Utc>, rollup: u64) -> Result<DateTime<Utc>, WindowError> {
    let secs = rollup_secs(rollup)?;
    let epoch = ts.timestamp();
    let floored = epoch - epoch.rem_euclid(secs);
    DateTime::from_timestamp(floored, 0).ok_or(WindowError::OutOfRange(rollup))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let err = TimeWindow::new(at(10), at(5)).unwrap_err();
        assert!(matches!(err, WindowError::Inverted { .. }));
    }

    #[test]
    fn test_trailing_day_minus_one_second() {
        let window = TimeWindow::trailing(at(1_000_000_000), TimeDelta::seconds(86_399)).unwrap();
        assert_eq!(window.start(), at(999_913_601));
        assert_eq!(window.end(), at(1_000_000_000));
    }

    #[test]
    fn test_snap_to_hour() {
        let window = TimeWindow::new(at(3_601), at(7_300)).unwrap();
        let snapped = window.snap_to(3_600).unwrap();

        assert_eq!(snapped.start(), at(3_600));
        assert_eq!(snapped.end(), at(7_200));
    }

    #[test]
    fn test_buckets_include_end_bucket() {
        let window = TimeWindow::new(at(15), at(41)).unwrap();

        assert_eq!(window.bucket_count(10).unwrap(), 4);
        assert_eq!(
            window.buckets(10, 4).unwrap(),
            vec![at(10), at(20), at(30), at(40)]
        );
    }

    #[test]
    fn test_buckets_above_limit_are_rejected() {
        let window = TimeWindow::new(at(0), at(2_000_000_000)).unwrap();

        assert_eq!(
            window.buckets(10, 1_000),
            Err(WindowError::TooManyBuckets {
                count: 200_000_001,
                max: 1_000
            })
        );
        assert_eq!(window.buckets(86_400, 30_000).map(|b| b.len()), Ok(23_149));
    }

    #[test]
    fn test_rollup_must_come_from_table() {
        let table = RollupTable::default();
        let window = TimeWindow::new(at(0), at(10)).unwrap();

        assert_eq!(
            window.clone().with_rollup(3_600, &table).unwrap().rollup(),
            Some(3_600)
        );
        assert_eq!(
            window.clone().with_rollup(0, &table),
            Err(WindowError::InvalidRollup(0))
        );
        assert_eq!(
            window.with_rollup(1_800, &table),
            Err(WindowError::InvalidRollup(1_800))
        );
    }

    #[test]
    fn test_zero_rollup_is_rejected() {
        let window = TimeWindow::new(at(0), at(10)).unwrap();
        assert_eq!(window.snap_to(0), Err(WindowError::InvalidRollup(0)));
    }

    #[test]
    fn test_snap_before_epoch_floors_down() {
        let window = TimeWindow::new(at(-5), at(5)).unwrap();
        let snapped = window.snap_to(10).unwrap();
        assert_eq!(snapped.start(), at(-10));
        assert_eq!(snapped.end(), at(0));
    }
}
