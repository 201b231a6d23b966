//! Error types for the audiolink library
//!
//! This module defines all error types that can occur during audiolink
//! operations. The taxonomy mirrors the failure surfaces of the system:
//! identifier grammar violations, unreadable containers, link-mutation
//! precondition failures, and configuration mistakes caught before any
//! filesystem mutation takes place.

use crate::link::LinkStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the audiolink library
pub type Result<T> = std::result::Result<T, AudiolinkError>;

/// Main error type for all audiolink operations
#[derive(Debug, Error)]
pub enum AudiolinkError {
    /// A text value does not match the identifier grammar
    /// (`<32 lowercase hex chars>-al`)
    #[error("Invalid identifier format: {value:?}")]
    Format {
        /// The offending text value
        value: String,
    },

    /// The tag collaborator cannot open or parse the container
    #[error("Unreadable media file: {path:?}")]
    UnreadableFile {
        /// Path to the unreadable file
        path: PathBuf,
        /// Underlying tag-collaborator error
        #[source]
        source: lofty::error::LoftyError,
    },

    /// An identifier-consuming operation was attempted against a file
    /// with no valid identifier
    #[error("File has no valid identifier: {path:?}")]
    NoValue {
        /// Path to the file missing an identifier
        path: PathBuf,
    },

    /// Refused to overwrite an identifier already present on a file
    #[error("Existing identifier {id:?} on file {path:?}")]
    IdExists {
        /// The identifier already embedded in the file
        id: String,
        /// Path to the file carrying it
        path: PathBuf,
    },

    /// A link-mutation precondition failed; a `Conflict` entry is never
    /// auto-resolved
    #[error("Entry already exists at link path {path:?} (status: {status})")]
    LinkExists {
        /// The candidate link path that is occupied
        path: PathBuf,
        /// Classification of the occupying entry
        status: LinkStatus,
    },

    /// Invalid source/mirror configuration, rejected before any
    /// filesystem mutation
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The tag collaborator failed to persist tags back to the file
    #[error("Failed to persist tags to {path:?}")]
    TagPersist {
        /// Path to the file being written
        path: PathBuf,
        /// Underlying tag-collaborator error
        #[source]
        source: lofty::error::LoftyError,
    },

    /// I/O errors during filesystem operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudiolinkError {
    /// Create a format error for a value that fails the identifier grammar
    pub fn format(value: impl Into<String>) -> Self {
        AudiolinkError::Format {
            value: value.into(),
        }
    }

    /// Create a configuration error with a custom message
    pub fn configuration(msg: impl Into<String>) -> Self {
        AudiolinkError::Configuration(msg.into())
    }

    /// Check whether this error is a per-file condition that bulk
    /// operations downgrade to a logged skip
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            AudiolinkError::Format { .. }
                | AudiolinkError::UnreadableFile { .. }
                | AudiolinkError::NoValue { .. }
                | AudiolinkError::IdExists { .. }
                | AudiolinkError::LinkExists { .. }
                | AudiolinkError::TagPersist { .. }
        )
    }

    /// Check whether this error reports an occupied link path
    pub fn is_link_exists(&self) -> bool {
        matches!(self, AudiolinkError::LinkExists { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AudiolinkError::format("not-an-id");
        assert_eq!(err.to_string(), "Invalid identifier format: \"not-an-id\"");

        let err = AudiolinkError::configuration("mirror root not set");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: mirror root not set"
        );
    }

    #[test]
    fn test_link_exists_classification() {
        let err = AudiolinkError::LinkExists {
            path: PathBuf::from("/mirror/abc-al.flac"),
            status: LinkStatus::Conflict,
        };
        assert!(err.is_link_exists());
        assert!(err.is_per_file());
        assert!(!AudiolinkError::Configuration("x".into()).is_link_exists());
    }

    #[test]
    fn test_io_is_not_per_file() {
        let err = AudiolinkError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "test",
        ));
        assert!(!err.is_per_file());
    }
}
