/// Errors raised while fetching or parsing a data source.
///
/// One failed source fails the whole load; there is no partial result.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source does not exist (missing file, HTTP 404).
    #[error("source not found: {location}")]
    NotFound { location: String },

    /// The server answered with a non-success status.
    #[error("source {location} returned HTTP {status}")]
    Status { location: String, status: u16 },

    /// Reading the source failed.
    #[error("failed to read {location}: {message}")]
    Io { location: String, message: String },

    /// The source was read but is not the expected document.
    #[error("failed to parse {location}: {message}")]
    Parse { location: String, message: String },

    /// A fetch task panicked or was cancelled.
    #[error("load task failed: {0}")]
    Join(String),
}

impl LoadError {
    pub fn parse(location: &str, message: impl ToString) -> Self {
        LoadError::Parse {
            location: location.to_string(),
            message: message.to_string(),
        }
    }

    /// Location of the source that failed, if the error is about one.
    pub fn location(&self) -> Option<&str> {
        match self {
            LoadError::NotFound { location }
            | LoadError::Status { location, .. }
            | LoadError::Io { location, .. }
            | LoadError::Parse { location, .. } => Some(location),
            LoadError::Join(_) => None,
        }
    }
}
