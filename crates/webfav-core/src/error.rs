//! Domain errors
//!
//! Store operations fail with a coarse [`StoreError`]: either the read or the
//! write half of the operation failed. The display string is a fixed message
//! per operation that callers can show to the user as-is; the substrate error
//! that caused it is kept as the source for diagnostics.

use std::fmt;

use thiserror::Error;

use crate::storage::SubstrateError;

/// The store operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SaveBookmark,
    ListBookmarks,
    UpdateBookmark,
    DeleteBookmark,
    ListTags,
    CreateTag,
    IncrementTagUsage,
    RenameTag,
    DeleteTag,
    GetSettings,
    SetSettings,
    Initialize,
}

impl Operation {
    /// Fixed user-facing message for a failure of this operation
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::SaveBookmark => "failed to save bookmark",
            Operation::ListBookmarks => "failed to get bookmarks",
            Operation::UpdateBookmark => "failed to update bookmark",
            Operation::DeleteBookmark => "failed to delete bookmark",
            Operation::ListTags => "failed to get tags",
            Operation::CreateTag => "failed to create tag",
            Operation::IncrementTagUsage => "failed to update tag usage count",
            Operation::RenameTag => "failed to rename tag",
            Operation::DeleteTag => "failed to delete tag",
            Operation::GetSettings => "failed to get settings",
            Operation::SetSettings => "failed to save settings",
            Operation::Initialize => "failed to initialize storage",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.failure_message())
    }
}

/// Failure of a store operation
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading the current collection failed
    #[error("{op}")]
    ReadFailure {
        op: Operation,
        #[source]
        source: SubstrateError,
    },

    /// Writing the new collection failed
    #[error("{op}")]
    WriteFailure {
        op: Operation,
        #[source]
        source: SubstrateError,
    },
}

impl StoreError {
    /// The underlying substrate error
    pub fn substrate_error(&self) -> &SubstrateError {
        match self {
            StoreError::ReadFailure { source, .. } | StoreError::WriteFailure { source, .. } => {
                source
            }
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A record that does not satisfy its constructor's invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trimming
    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    /// A string does not name a known variant
    #[error("unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_uses_fixed_message() {
        let err = StoreError::WriteFailure {
            op: Operation::SaveBookmark,
            source: SubstrateError::Unavailable("quota exceeded".to_string()),
        };

        assert_eq!(err.to_string(), "failed to save bookmark");
        assert!(matches!(
            err.substrate_error(),
            SubstrateError::Unavailable(_)
        ));
    }

    #[test]
    fn test_read_and_write_messages_match_operation() {
        let read = StoreError::ReadFailure {
            op: Operation::DeleteTag,
            source: SubstrateError::Unavailable("x".to_string()),
        };
        let write = StoreError::WriteFailure {
            op: Operation::DeleteTag,
            source: SubstrateError::Unavailable("x".to_string()),
        };
        assert_eq!(read.to_string(), write.to_string());
        assert_eq!(read.to_string(), "failed to delete tag");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let err = StoreError::ReadFailure {
            op: Operation::ListTags,
            source: SubstrateError::Unavailable("offline".to_string()),
        };
        let source = err.source().unwrap();
        assert!(source.to_string().contains("offline"));
    }

    #[test]
    fn test_validation_display() {
        let err = ValidationError::Blank { field: "title" };
        assert_eq!(err.to_string(), "title must not be blank");
    }
}
