//! Mirror-link classification and mutation
//!
//! A [`LinkEntry`] relates one source file to its candidate entry in the
//! mirror directory: the path named by the file's identifier plus the
//! source extension. [`LinkEntry::status`] classifies that relationship
//! into the four-way [`LinkStatus`]; [`LinkEntry::create`] and
//! [`LinkEntry::delete`] mutate the mirror under the universal rule that
//! a [`Conflict`](LinkStatus::Conflict) entry is never auto-resolved.
//!
//! Status is recomputed from the live filesystem on every call and never
//! cached here; the scan cache in [`Library`](crate::Library) is the only
//! place a status outlives a single operation.
//!
//! Nothing prevents another process from mutating the link path between a
//! `status` check and the following `create`/`delete`; such a race
//! surfaces as the syscall's own error rather than being swallowed.

use crate::error::{AudiolinkError, Result};
use crate::file::AudioFile;
use crate::id::AudiolinkId;
use crate::utils;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Classification of the relationship between a source file and its
/// candidate mirror entry
///
/// Closed set — every call site matches exhaustively, so a future status
/// cannot silently fall through unhandled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// No filesystem entry at the link path
    Missing,
    /// The entry is a hard link to the source (same device and inode)
    Active,
    /// The entry is a distinct inode whose own identifier is valid and
    /// equals the source's — a stale copy sharing the logical identity
    /// but not the physical link
    Inactive,
    /// The entry's identity could not be verified: its identifier is
    /// absent, invalid, unequal, or the entry is unreadable
    Conflict,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkStatus::Missing => "missing",
            LinkStatus::Active => "active",
            LinkStatus::Inactive => "inactive",
            LinkStatus::Conflict => "conflict",
        };
        f.write_str(name)
    }
}

/// One source file's candidate entry in the mirror directory
///
/// Ephemeral: borrows the source [`AudioFile`] and is constructed on
/// demand for a single classification or mutation.
#[derive(Debug)]
pub struct LinkEntry<'a> {
    file: &'a AudioFile,
    id: AudiolinkId,
    mirror_dir: &'a Path,
}

impl<'a> LinkEntry<'a> {
    /// Derive the mirror entry for a source file
    ///
    /// # Errors
    ///
    /// Returns [`AudiolinkError::NoValue`] when the source file has no
    /// valid identifier — there is nothing to name a link after.
    pub fn new(file: &'a AudioFile, mirror_dir: &'a Path) -> Result<Self> {
        let id = file.id().ok_or_else(|| AudiolinkError::NoValue {
            path: file.path().to_path_buf(),
        })?;

        Ok(LinkEntry {
            file,
            id,
            mirror_dir,
        })
    }

    /// File name of the mirror entry: identifier plus source extension
    pub fn link_name(&self) -> String {
        match self.file.path().extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{ext}", self.id),
            None => self.id.to_string(),
        }
    }

    /// Full path of the mirror entry
    pub fn link_path(&self) -> PathBuf {
        self.mirror_dir.join(self.link_name())
    }

    /// Classify the current relationship between source and mirror entry
    ///
    /// Recomputed from the live filesystem on every call. Any I/O failure
    /// while probing — the entry disappearing mid-check, an unreadable
    /// container — is classified [`LinkStatus::Conflict`] rather than
    /// propagated: bulk reconciliation needs a conservative answer, and
    /// `Conflict` is the one classification no operation auto-resolves.
    pub fn status(&self) -> LinkStatus {
        let link_path = self.link_path();

        match fs::symlink_metadata(&link_path) {
            Err(e) if e.kind() == ErrorKind::NotFound => return LinkStatus::Missing,
            Err(_) => return LinkStatus::Conflict,
            Ok(_) => {}
        }

        match utils::same_inode(&link_path, self.file.path()) {
            Ok(true) => return LinkStatus::Active,
            Ok(false) => {}
            Err(_) => return LinkStatus::Conflict,
        }

        // Distinct inode: only a verified, matching identifier on the
        // competing entry downgrades the collision to Inactive.
        match AudioFile::open(&link_path) {
            Ok(other) if other.id() == Some(self.id) => LinkStatus::Inactive,
            Ok(_) | Err(_) => LinkStatus::Conflict,
        }
    }

    /// Create the mirror hard link
    ///
    /// - `Missing` — creates the link
    /// - `Active` — idempotent no-op
    /// - `Inactive` — refused unless `overwrite`, which removes the stale
    ///   entry first
    /// - `Conflict` — always refused; `overwrite` has no effect on an
    ///   entry whose identity is unverified
    ///
    /// # Errors
    ///
    /// [`AudiolinkError::LinkExists`] on a refused precondition;
    /// [`AudiolinkError::Io`] if a syscall fails (including a racing
    /// creation between the status check and the link call).
    pub fn create(&self, overwrite: bool) -> Result<()> {
        let link_path = self.link_path();

        match self.status() {
            LinkStatus::Active => {
                trace!(path = ?link_path, "link already active");
                return Ok(());
            }
            LinkStatus::Missing => {}
            LinkStatus::Inactive if overwrite => {
                debug!(path = ?link_path, "removing stale entry before relink");
                fs::remove_file(&link_path)?;
            }
            status @ (LinkStatus::Inactive | LinkStatus::Conflict) => {
                return Err(AudiolinkError::LinkExists {
                    path: link_path,
                    status,
                });
            }
        }

        fs::hard_link(self.file.path(), &link_path)?;
        debug!(source = ?self.file.path(), link = ?link_path, "hard link created");
        Ok(())
    }

    /// Remove the mirror entry
    ///
    /// - `Missing` — no-op
    /// - `Active` — unlinks the entry
    /// - `Inactive` — refused unless `force`, which removes the stale
    ///   entry
    /// - `Conflict` — always refused
    ///
    /// Deletion defaults permissive (`force = true` at call sites)
    /// where creation defaults conservative: clearing a mirror is usually
    /// the safe direction, but neither operation touches a `Conflict`.
    pub fn delete(&self, force: bool) -> Result<()> {
        let link_path = self.link_path();

        match self.status() {
            LinkStatus::Missing => {
                trace!(path = ?link_path, "no link to delete");
                Ok(())
            }
            LinkStatus::Active => {
                fs::remove_file(&link_path)?;
                debug!(path = ?link_path, "hard link removed");
                Ok(())
            }
            LinkStatus::Inactive if force => {
                fs::remove_file(&link_path)?;
                debug!(path = ?link_path, "stale entry removed");
                Ok(())
            }
            status @ (LinkStatus::Inactive | LinkStatus::Conflict) => {
                Err(AudiolinkError::LinkExists {
                    path: link_path,
                    status,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(LinkStatus::Missing.to_string(), "missing");
        assert_eq!(LinkStatus::Active.to_string(), "active");
        assert_eq!(LinkStatus::Inactive.to_string(), "inactive");
        assert_eq!(LinkStatus::Conflict.to_string(), "conflict");
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&LinkStatus::Conflict).unwrap();
        assert_eq!(json, "\"conflict\"");
    }
}
