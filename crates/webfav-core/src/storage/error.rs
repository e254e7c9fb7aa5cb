//! Substrate error handling
//!
//! Typed errors for the key-value substrate, with descriptive messages
//! and recovery suggestions.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a key-value substrate
#[derive(Error, Debug)]
pub enum SubstrateError {
    /// Failed to create the data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A value could not be encoded for storage
    #[error("Failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    /// A stored entry does not have the expected shape
    #[error("Entry '{key}' has an invalid format: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The substrate cannot currently serve requests
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A blocking storage task panicked or was cancelled
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SubstrateError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => SubstrateError::PermissionDenied {
                path,
                source: error,
            },
            _ if is_disk_full_error(&error) => SubstrateError::DiskFull {
                path,
                source: error,
            },
            _ => SubstrateError::Io(error),
        }
    }

    /// Check if retrying after user action could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SubstrateError::DiskFull { .. }
                | SubstrateError::PermissionDenied { .. }
                | SubstrateError::Unavailable(_)
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            SubstrateError::DiskFull { .. } => Some("Free up disk space and try again."),
            SubstrateError::PermissionDenied { .. } => {
                Some("Check file and directory permissions, or point data_dir somewhere writable.")
            }
            SubstrateError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            SubstrateError::Decode { .. } => {
                Some("The stored data was written in an unexpected shape. Inspect or remove the entry and try again.")
            }
            SubstrateError::Unavailable(_) => Some("Try the operation again."),
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for substrate operations
pub type SubstrateResult<T> = Result<T, SubstrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = SubstrateError::from_io(io_err, PathBuf::from("/test/path"));

        assert!(matches!(err, SubstrateError::PermissionDenied { .. }));
        assert!(err.is_recoverable());
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_disk_full_detection() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = SubstrateError::from_io(io_err, PathBuf::from("/full/disk"));

        assert!(matches!(err, SubstrateError::DiskFull { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_other_io_errors_pass_through() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = SubstrateError::from_io(io_err, PathBuf::from("/some/file"));

        assert!(matches!(err, SubstrateError::Io(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_decode_display_names_key() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = SubstrateError::Decode {
            key: "bookmarks".to_string(),
            source,
        };

        let msg = err.to_string();
        assert!(msg.contains("bookmarks"));
        assert!(msg.contains("invalid format"));
    }

    #[test]
    fn test_unavailable_is_recoverable() {
        let err = SubstrateError::Unavailable("offline".to_string());
        assert!(err.is_recoverable());
        assert_eq!(err.recovery_suggestion(), Some("Try the operation again."));
    }
}
