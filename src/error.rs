//! Error types for the runway wind checker
//!
//! Report parsing never fails: unmatched fragments are dropped and missing
//! data is expressed through empty or sentinel values. The variants below
//! cover what can genuinely go wrong around the parsing core: configuration
//! that must be rejected before any evaluation starts, unreadable data
//! files, and the fetch/cache plumbing.

use thiserror::Error;

/// Main error type for the `runway-wind` crate
#[derive(Error, Debug)]
pub enum RunwayWindError {
    /// Application configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Aircraft limits record missing, malformed or inconsistent
    #[error("Invalid aircraft limits: {message}")]
    InvalidLimits { message: String },

    /// Airport or limits table could not be read
    #[error("Data file error in '{path}': {message}")]
    DataFile { path: String, message: String },

    /// Report retrieval errors
    #[error("Fetch error: {message}")]
    Fetch { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl RunwayWindError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid limits error
    pub fn invalid_limits<S: Into<String>>(message: S) -> Self {
        Self::InvalidLimits {
            message: message.into(),
        }
    }

    /// Create a new data file error
    pub fn data_file<P: Into<String>, S: Into<String>>(path: P, message: S) -> Self {
        Self::DataFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new fetch error
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RunwayWindError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            RunwayWindError::InvalidLimits { message } => {
                format!("Aircraft limits rejected: {message}")
            }
            RunwayWindError::DataFile { path, .. } => {
                format!("Could not read data file '{path}'. Please check its columns.")
            }
            RunwayWindError::Fetch { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            RunwayWindError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = RunwayWindError::config("bad timeout");
        assert!(matches!(config_err, RunwayWindError::Config { .. }));

        let limits_err = RunwayWindError::invalid_limits("wet above dry");
        assert!(matches!(limits_err, RunwayWindError::InvalidLimits { .. }));

        let file_err = RunwayWindError::data_file("airports.csv", "missing ICAO");
        assert!(matches!(file_err, RunwayWindError::DataFile { .. }));
        assert!(file_err.to_string().contains("airports.csv"));
    }

    #[test]
    fn test_user_messages() {
        let limits_err = RunwayWindError::invalid_limits("wet above dry");
        assert!(limits_err.user_message().contains("wet above dry"));

        let fetch_err = RunwayWindError::fetch("timeout");
        assert!(fetch_err.user_message().contains("Unable to reach"));
    }

    #[test]
    fn test_cache_error_display() {
        let err = RunwayWindError::cache("locked");
        assert_eq!(err.to_string(), "Cache error: locked");
    }
}
