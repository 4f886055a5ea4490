//! Error types for the maze renderer

use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading documents or painting mazes
#[derive(Error, Debug)]
pub enum Error {
    /// A maze attribute held malformed JSON or the wrong shape
    #[error("Invalid {attribute}: {source}")]
    MazeData {
        attribute: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A required maze attribute was not present on the surface
    #[error("Missing attribute {0}")]
    MissingAttribute(&'static str),

    /// The grid cannot be laid out (zero rows or columns)
    #[error("Invalid maze grid: {0}")]
    InvalidGrid(String),

    /// The surface has no 2D drawing context
    #[error("Drawing context unavailable for {0}")]
    ContextUnavailable(String),

    /// Failed to produce output from a raster
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to load a document
    #[error("Failed to load document: {0}")]
    LoadError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error stems from the surface's own attributes rather than
    /// the host environment.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Error::MazeData { .. } | Error::MissingAttribute(_) | Error::InvalidGrid(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maze_data_error_names_attribute() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = Error::MazeData { attribute: "data-config", source };
        assert!(err.to_string().starts_with("Invalid data-config"));
        assert!(err.is_data_error());
        assert!(!Error::ContextUnavailable("maze-0".into()).is_data_error());
    }
}
