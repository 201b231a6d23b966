//! Core data types used throughout the audiolink library
//!
//! This module contains the value types shared across components:
//!
//! - **Identifier state**: [`IdState`] — the tri-state result of reading
//!   a file's identifier field
//! - **Scan cache**: [`ScanRecord`] — one file's identifier and link
//!   state as captured by a scan
//! - **Operation reports**: [`ScanSummary`], [`AssignReport`],
//!   [`ClearReport`], [`ReconcileReport`] — aggregate results returned by
//!   bulk operations

use crate::id::AudiolinkId;
use crate::link::LinkStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// State of a file's identifier field
///
/// A stored value that fails the identifier grammar is reported as
/// [`Invalid`](IdState::Invalid) with the raw text preserved — never
/// silently coerced to [`Missing`](IdState::Missing). Reconciliation
/// treats the two states very differently: a missing identifier can be
/// assigned freshly, an invalid one is evidence of corruption or foreign
/// data and is only replaced on explicit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum IdState {
    /// No identifier field is present
    Missing,
    /// The stored value parses as a well-formed identifier
    Valid(AudiolinkId),
    /// A value is present but does not match the identifier grammar;
    /// the raw text is preserved for reporting
    Invalid(String),
}

impl IdState {
    /// Classify a raw tag value
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => IdState::Missing,
            Some(text) => match AudiolinkId::parse(text) {
                Ok(id) => IdState::Valid(id),
                Err(_) => IdState::Invalid(text.to_string()),
            },
        }
    }

    /// The identifier, when valid
    pub fn id(&self) -> Option<AudiolinkId> {
        match self {
            IdState::Valid(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether a well-formed identifier is present
    pub fn is_valid(&self) -> bool {
        matches!(self, IdState::Valid(_))
    }

    /// Whether no identifier field is present
    pub fn is_missing(&self) -> bool {
        matches!(self, IdState::Missing)
    }

    /// Whether a malformed value occupies the identifier field
    pub fn is_invalid(&self) -> bool {
        matches!(self, IdState::Invalid(_))
    }
}

/// Which records an identifier-assignment pass targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignTarget {
    /// Files with no identifier field
    Missing,
    /// Files whose identifier field holds a malformed value
    Invalid,
}

impl AssignTarget {
    /// Whether a record with this identifier state is targeted
    pub fn matches(&self, state: &IdState) -> bool {
        match self {
            AssignTarget::Missing => state.is_missing(),
            AssignTarget::Invalid => state.is_invalid(),
        }
    }
}

/// One file's state as captured by a scan
///
/// Records are held by the library's scan cache in enumeration order.
/// Bulk operations update records in place; callers observe them through
/// an immutable view and must re-scan after external filesystem changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Path of the scanned file
    pub path: PathBuf,
    /// State of the identifier field
    pub id_state: IdState,
    /// Relationship to the mirror entry; `None` when no mirror root is
    /// configured
    pub link_status: Option<LinkStatus>,
}

/// Per-status counts of mirror-link classifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCounts {
    /// No entry at the link path
    pub missing: usize,
    /// Entry is a hard link to the source
    pub active: usize,
    /// Entry shares the identifier but not the inode
    pub inactive: usize,
    /// Entry's identity could not be verified
    pub conflict: usize,
}

impl LinkCounts {
    pub(crate) fn record(&mut self, status: LinkStatus) {
        match status {
            LinkStatus::Missing => self.missing += 1,
            LinkStatus::Active => self.active += 1,
            LinkStatus::Inactive => self.inactive += 1,
            LinkStatus::Conflict => self.conflict += 1,
        }
    }

    /// Total number of classified records
    pub fn total(&self) -> usize {
        self.missing + self.active + self.inactive + self.conflict
    }
}

/// Aggregate result of a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Number of media files scanned into the cache
    pub files: usize,
    /// Files with a well-formed identifier
    pub id_valid: usize,
    /// Files whose identifier field holds a malformed value
    pub id_invalid: usize,
    /// Files with no identifier field
    pub id_missing: usize,
    /// Files skipped because the container could not be read
    pub unreadable: usize,
    /// Link classification counts, when a mirror root is configured
    pub links: Option<LinkCounts>,
    /// When the scan completed
    pub scanned_at: DateTime<Utc>,
}

impl ScanSummary {
    /// Whether every scanned file carries a well-formed identifier
    pub fn is_fully_tagged(&self) -> bool {
        self.id_valid == self.files
    }
}

/// Result of a bulk identifier-assignment pass
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AssignReport {
    /// Identifiers generated and written
    pub assigned: usize,
    /// Records that failed and were skipped (logged)
    pub failed: usize,
}

/// Result of a bulk identifier-clearing pass
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ClearReport {
    /// Identifier fields cleared
    pub cleared: usize,
    /// Records that failed and were skipped (logged)
    pub failed: usize,
}

/// Result of a link-reconciliation pass
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Hard links created
    pub created: usize,
    /// Records whose link was already active (idempotent no-op)
    pub active: usize,
    /// Records skipped for lack of a valid identifier
    pub skipped: usize,
    /// Records refused (`Inactive`/`Conflict` entries) or failed
    pub failed: usize,
}

impl ReconcileReport {
    /// Whether any record was refused or failed
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_state_from_raw() {
        assert_eq!(IdState::from_raw(None), IdState::Missing);

        let state = IdState::from_raw(Some("0123456789abcdef0123456789abcdef-al"));
        assert!(state.is_valid());
        assert!(state.id().is_some());

        let state = IdState::from_raw(Some("not an id"));
        assert_eq!(state, IdState::Invalid("not an id".to_string()));
        assert!(state.id().is_none());
    }

    #[test]
    fn test_assign_target_matches() {
        let missing = IdState::Missing;
        let invalid = IdState::Invalid("junk".to_string());
        let valid = IdState::from_raw(Some("0123456789abcdef0123456789abcdef-al"));

        assert!(AssignTarget::Missing.matches(&missing));
        assert!(!AssignTarget::Missing.matches(&invalid));
        assert!(!AssignTarget::Missing.matches(&valid));

        assert!(AssignTarget::Invalid.matches(&invalid));
        assert!(!AssignTarget::Invalid.matches(&missing));
        assert!(!AssignTarget::Invalid.matches(&valid));
    }

    #[test]
    fn test_link_counts() {
        let mut counts = LinkCounts::default();
        counts.record(LinkStatus::Active);
        counts.record(LinkStatus::Active);
        counts.record(LinkStatus::Conflict);
        assert_eq!(counts.active, 2);
        assert_eq!(counts.conflict, 1);
        assert_eq!(counts.total(), 3);
    }
}
