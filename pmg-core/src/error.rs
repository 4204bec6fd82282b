/// Structured error types for pmg-core.
///
/// Library crates get composable `thiserror` errors; the `pmg` binary
/// wraps them in `anyhow` for context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pmg-core operations
#[derive(Error, Debug)]
pub enum PmgError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// A date string could not be parsed
    #[error("Invalid date '{value}' on line {line}: {reason}")]
    InvalidDate {
        value: String,
        line: usize,
        reason: String,
    },

    /// File or directory not found
    #[error("Path not found: {path:?}")]
    PathNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for pmg-core operations
pub type Result<T> = std::result::Result<T, PmgError>;

impl PmgError {
    /// Create an invalid date error
    pub fn invalid_date(value: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Create a path not found error
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PmgError::invalid_date("2015-13-01", 4, "month out of range");
        assert_eq!(
            err.to_string(),
            "Invalid date '2015-13-01' on line 4: month out of range"
        );

        let err = PmgError::path_not_found("/tmp/sitting-days.txt");
        assert!(err.to_string().contains("Path not found"));
        assert!(err.to_string().contains("/tmp/sitting-days.txt"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let pmg_err: PmgError = io_err.into();

        assert!(matches!(pmg_err, PmgError::Io { .. }));
    }
}
