use crate::time::window::{TimeWindow, WindowError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RollupTableError {
    #[error("Rollup table must contain at least one rollup")]
    Empty,

    #[error("Rollup '{0}' has a zero duration")]
    ZeroSeconds(String),

    #[error("Rollups must be strictly ascending: {previous}s is followed by {current}s")]
    NotAscending { previous: u64, current: u64 },
}

/// A supported aggregation bucket size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rollup {
    pub seconds: u64,
    pub label: String,
}

impl Rollup {
    pub fn new(seconds: u64, label: impl Into<String>) -> Self {
        Rollup {
            seconds,
            label: label.into(),
        }
    }

    /// Builds a rollup labelled with the largest whole unit, e.g. `3600` -> `1h`.
    pub fn from_seconds(seconds: u64) -> Self {
        let label = match seconds {
            0 => "0s".to_string(),
            s if s % DAY == 0 => format!("{}d", s / DAY),
            s if s % HOUR == 0 => format!("{}h", s / HOUR),
            s if s % MINUTE == 0 => format!("{}m", s / MINUTE),
            s => format!("{s}s"),
        };
        Rollup { seconds, label }
    }
}

/// Ascending table of supported rollups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rollup>", into = "Vec<Rollup>")]
pub struct RollupTable {
    rollups: Vec<Rollup>,
}

impl RollupTable {
    pub fn new(rollups: Vec<Rollup>) -> Result<Self, RollupTableError> {
        if rollups.is_empty() {
            return Err(RollupTableError::Empty);
        }

        if let Some(zero) = rollups.iter().find(|r| r.seconds == 0) {
            return Err(RollupTableError::ZeroSeconds(zero.label.clone()));
        }

        for pair in rollups.windows(2) {
            if pair[1].seconds <= pair[0].seconds {
                return Err(RollupTableError::NotAscending {
                    previous: pair[0].seconds,
                    current: pair[1].seconds,
                });
            }
        }

        Ok(RollupTable { rollups })
    }

    pub fn from_seconds(seconds: &[u64]) -> Result<Self, RollupTableError> {
        RollupTable::new(seconds.iter().copied().map(Rollup::from_seconds).collect())
    }

    pub fn contains(&self, seconds: u64) -> bool {
        self.get(seconds).is_some()
    }

    pub fn get(&self, seconds: u64) -> Option<&Rollup> {
        self.rollups
            .binary_search_by_key(&seconds, |r| r.seconds)
            .ok()
            .map(|idx| &self.rollups[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rollup> {
        self.rollups.iter()
    }

    pub fn len(&self) -> usize {
        self.rollups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rollups.is_empty()
    }

    pub fn smallest(&self) -> &Rollup {
        &self.rollups[0]
    }

    pub fn largest(&self) -> &Rollup {
        &self.rollups[self.rollups.len() - 1]
    }

    /// Picks the finest rollup that keeps the window within `max_buckets`
    /// buckets, falling back to the coarsest one.
    pub fn optimal_for(
        &self,
        window: &TimeWindow,
        max_buckets: u64,
    ) -> Result<&Rollup, WindowError> {
        for rollup in &self.rollups {
            if window.bucket_count(rollup.seconds)? <= max_buckets {
                return Ok(rollup);
            }
        }
        Ok(self.largest())
    }
}

impl Default for RollupTable {
    fn default() -> Self {
        RollupTable {
            rollups: vec![
                Rollup::new(10, "10s"),
                Rollup::new(HOUR, "1h"),
                Rollup::new(DAY, "1d"),
            ],
        }
    }
}

impl TryFrom<Vec<Rollup>> for RollupTable {
    type Error = RollupTableError;

    fn try_from(rollups: Vec<Rollup>) -> Result<Self, Self::Error> {
        RollupTable::new(rollups)
    }
}

impl From<RollupTable> for Vec<Rollup> {
    fn from(table: RollupTable) -> Self {
        table.rollups
    }
}
