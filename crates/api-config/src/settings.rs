use crate::error::ConfigError;
use model::time::rollup::{Rollup, RollupTable};
use pagination::request::PageLimits;
use serde::{Deserialize, Serialize};
use stats::{
    resolution::parse_resolution,
    resolver::{MAX_DEFAULT_SPAN_SECS, ResolverSettings},
};
use std::{collections::HashMap, path::Path, str::FromStr};
use tracing::debug;

pub const ENV_DEFAULT_PER_PAGE: &str = "PAGINATION_DEFAULT_PER_PAGE";
pub const ENV_MAX_PER_PAGE: &str = "PAGINATION_MAX_PER_PAGE";
pub const ENV_DEFAULT_SPAN_SECS: &str = "STATS_DEFAULT_SPAN_SECS";
pub const ENV_MAX_BUCKETS: &str = "STATS_MAX_BUCKETS";
pub const ENV_ROLLUPS: &str = "STATS_ROLLUPS";

/// Service settings, layered as defaults, then a JSON file, then the
/// environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pagination: PaginationSettings,
    pub stats: StatsSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    pub default_per_page: usize,
    pub max_per_page: usize,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        let limits = PageLimits::default();
        PaginationSettings {
            default_per_page: limits.default_per_page,
            max_per_page: limits.max_per_page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSettings {
    pub default_span_secs: i64,
    pub max_buckets: u64,
    /// Rollup labels in resolution syntax, e.g. `["10s", "1h", "1d"]`.
    pub rollups: Vec<String>,
}

impl Default for StatsSettings {
    fn default() -> Self {
        let resolver = ResolverSettings::default();
        StatsSettings {
            default_span_secs: resolver.default_span_secs,
            max_buckets: resolver.max_buckets,
            rollups: resolver.rollups.iter().map(|r| r.label.clone()).collect(),
        }
    }
}

impl Settings {
    /// Builds validated settings from an optional JSON file and a set of
    /// environment variables.
    pub fn load(
        file: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut settings = match file {
            Some(path) => Settings::from_json_file(path)?,
            None => Settings::default(),
        };

        settings.apply_env(env)?;
        settings.validate()?;

        debug!(settings = ?settings, "Loaded settings");
        Ok(settings)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Settings::from_json_str(&content)
    }

    /// Missing sections and fields keep their defaults.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Overrides fields with any of the known variables present in `env`.
    pub fn apply_env(&mut self, env: &HashMap<String, String>) -> Result<(), ConfigError> {
        if let Some(value) = env_value(env, ENV_DEFAULT_PER_PAGE)? {
            self.pagination.default_per_page = value;
        }
        if let Some(value) = env_value(env, ENV_MAX_PER_PAGE)? {
            self.pagination.max_per_page = value;
        }
        if let Some(value) = env_value(env, ENV_DEFAULT_SPAN_SECS)? {
            self.stats.default_span_secs = value;
        }
        if let Some(value) = env_value(env, ENV_MAX_BUCKETS)? {
            self.stats.max_buckets = value;
        }
        if let Some(raw) = env.get(ENV_ROLLUPS) {
            let labels: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if labels.is_empty() {
                return Err(ConfigError::InvalidEnv {
                    key: ENV_ROLLUPS.to_string(),
                    value: raw.clone(),
                });
            }
            self.stats.rollups = labels;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pagination = &self.pagination;
        if pagination.max_per_page == 0 {
            return Err(ConfigError::Invalid(
                "pagination.max_per_page must be at least 1".to_string(),
            ));
        }
        if pagination.default_per_page == 0 || pagination.default_per_page > pagination.max_per_page
        {
            return Err(ConfigError::Invalid(format!(
                "pagination.default_per_page must be between 1 and {}, got {}",
                pagination.max_per_page, pagination.default_per_page
            )));
        }

        if !(0..=MAX_DEFAULT_SPAN_SECS).contains(&self.stats.default_span_secs) {
            return Err(ConfigError::Invalid(format!(
                "stats.default_span_secs must be between 0 and {}, got {}",
                MAX_DEFAULT_SPAN_SECS, self.stats.default_span_secs
            )));
        }
        if self.stats.max_buckets == 0 {
            return Err(ConfigError::Invalid(
                "stats.max_buckets must be at least 1".to_string(),
            ));
        }

        self.rollup_table().map(|_| ())
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_per_page: self.pagination.default_per_page,
            max_per_page: self.pagination.max_per_page,
        }
    }

    pub fn resolver_settings(&self) -> Result<ResolverSettings, ConfigError> {
        Ok(ResolverSettings {
            default_span_secs: self.stats.default_span_secs,
            max_buckets: self.stats.max_buckets,
            rollups: self.rollup_table()?,
        })
    }

    fn rollup_table(&self) -> Result<RollupTable, ConfigError> {
        let rollups = self
            .stats
            .rollups
            .iter()
            .map(|label| {
                parse_resolution(label)
                    .map(|seconds| Rollup::new(seconds, label.clone()))
                    .map_err(|source| ConfigError::Rollup {
                        label: label.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RollupTable::new(rollups)?)
    }
}

fn env_value<T: FromStr>(env: &HashMap<String, String>, key: &str) -> Result<Option<T>, ConfigError> {
    match env.get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                key: key.to_string(),
                value: raw.clone(),
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::time::rollup::RollupTableError;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None, &HashMap::new()).unwrap();

        assert_eq!(settings.page_limits(), PageLimits::default());
        assert_eq!(
            settings.resolver_settings().unwrap(),
            ResolverSettings::default()
        );
        assert_eq!(settings.stats.rollups, vec!["10s", "1h", "1d"]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json_str(r#"{"pagination": {"max_per_page": 500}}"#).unwrap();

        assert_eq!(settings.pagination.max_per_page, 500);
        assert_eq!(settings.pagination.default_per_page, 100);
        assert_eq!(settings.stats, StatsSettings::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"pagination": {{"default_per_page": 20, "max_per_page": 50}}, "stats": {{"max_buckets": 200}}}}"#
        )
        .unwrap();

        let vars = env(&[
            (ENV_MAX_PER_PAGE, "40"),
            (ENV_ROLLUPS, "1m, 1h"),
            ("UNRELATED", "x"),
        ]);
        let settings = Settings::load(Some(file.path()), &vars).unwrap();

        assert_eq!(settings.pagination.default_per_page, 20);
        assert_eq!(settings.pagination.max_per_page, 40);
        assert_eq!(settings.stats.max_buckets, 200);

        let resolver = settings.resolver_settings().unwrap();
        let seconds: Vec<u64> = resolver.rollups.iter().map(|r| r.seconds).collect();
        assert_eq!(seconds, vec![60, 3_600]);
    }

    #[test]
    fn test_invalid_env_value() {
        let err = Settings::load(None, &env(&[(ENV_MAX_BUCKETS, "lots")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv { ref key, .. } if key == ENV_MAX_BUCKETS
        ));

        let err = Settings::load(None, &env(&[(ENV_ROLLUPS, " , ")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn test_default_above_max_is_rejected() {
        let vars = env(&[(ENV_DEFAULT_PER_PAGE, "200")]);
        let err = Settings::load(None, &vars).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let vars = env(&[(ENV_MAX_PER_PAGE, "0")]);
        assert!(Settings::load(None, &vars).is_err());
    }

    #[test]
    fn test_default_span_out_of_range_is_rejected() {
        for raw in ["-1", "9223372036854775807"] {
            let err = Settings::load(None, &env(&[(ENV_DEFAULT_SPAN_SECS, raw)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{raw}");
        }

        let max = MAX_DEFAULT_SPAN_SECS.to_string();
        let settings = Settings::load(None, &env(&[(ENV_DEFAULT_SPAN_SECS, max.as_str())])).unwrap();
        assert_eq!(settings.stats.default_span_secs, MAX_DEFAULT_SPAN_SECS);
    }

    #[test]
    fn test_bad_rollups() {
        let err = Settings::load(None, &env(&[(ENV_ROLLUPS, "1h,10s")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::RollupTable(RollupTableError::NotAscending {
                previous: 3_600,
                current: 10
            })
        ));

        let err = Settings::load(None, &env(&[(ENV_ROLLUPS, "1x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Rollup { ref label, .. } if label == "1x"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = Settings::load(Some(&path), &HashMap::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Settings::load(Some(file.path()), &HashMap::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
