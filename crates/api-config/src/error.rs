use model::time::rollup::RollupTableError;
use stats::error::StatsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file as JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value '{value}' for environment variable {key}")]
    InvalidEnv { key: String, value: String },

    #[error("Invalid rollup '{label}': {source}")]
    Rollup {
        label: String,
        #[source]
        source: StatsError,
    },

    #[error("Invalid rollup table: {0}")]
    RollupTable(#[from] RollupTableError),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}
