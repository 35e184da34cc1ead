use api_config::error::ConfigError;
use model::time::window::WindowError;
use pagination::error::{PaginationError, ProviderError};
use stats::error::StatsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read or write a file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid settings: {0}")]
    Settings(#[from] ConfigError),

    #[error("Pagination failed: {0}")]
    Pagination(#[from] PaginationError),

    #[error("Failed to load data: {0}")]
    Provider(#[from] ProviderError),

    #[error("Failed to resolve the time window: {0}")]
    Stats(#[from] StatsError),

    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
