//! Error taxonomy for the planner.

use thiserror::Error;

/// Errors surfaced by the optimizer and the orchestration layer.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    #[error("no visiting order puts every pickup before its drop-off")]
    InfeasibleRequest,

    #[error("routing provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("geometry cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Failures of an external routing provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing service returned {code}: {message}")]
    Service { code: String, message: String },

    #[error("routing service returned no geometry")]
    NoGeometry,

    #[error("at least two coordinates are required, got {0}")]
    TooFewCoordinates(usize),

    #[error("missing API key (set {0})")]
    MissingApiKey(String),
}

/// Failures of the durable geometry store.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cache lock poisoned")]
    Poisoned,
}

/// Shorthand result type for routing operations.
pub type RouteResult<T> = Result<T, RouteError>;
