//! Error types for rxb6
//!
//! The decode path itself is lossy by design and never fails: garbled
//! frames are dropped, not reported as errors. Errors only exist at the
//! session boundary, when loading external configuration.

use thiserror::Error;

/// Result type alias for rxb6 operations
pub type Result<T> = std::result::Result<T, Rxb6Error>;

/// Main error type for rxb6 operations
#[derive(Error, Debug)]
pub enum Rxb6Error {
    /// Registry file could not be read
    #[error("Failed to read registry {path}: {source}")]
    RegistryIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Registry file could not be parsed
    #[error("Failed to parse registry {path}: {source}")]
    RegistryParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
