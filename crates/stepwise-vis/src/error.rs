//! Error types for stepwise-vis.

use thiserror::Error;

/// Result type for stepwise-vis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by configuration, the server, or invalid commands.
///
/// Illegal operations for the current playback state are not errors; they
/// are silent no-ops.
#[derive(Debug, Error)]
pub enum Error {
    /// An environment variable held a malformed value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Grid construction or addressing failed.
    #[error("grid error: {0}")]
    Grid(#[from] stepwise_grid::GridError),

    /// A sorting algorithm name that does not exist.
    #[error(transparent)]
    UnknownSort(#[from] stepwise_sort::UnknownAlgorithm),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the caller sent something invalid, as opposed to a fault on
    /// our side.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Grid(_) | Error::UnknownSort(_))
    }
}
