//! Per-file identifier operations
//!
//! [`AudioFile`] binds one media file and exposes the identifier embedded
//! in its tags. Reads surface a tri-state ([`IdState`]): a malformed
//! stored value is a legitimate, reportable state used by reconciliation,
//! not an error. Mutations persist to disk immediately — there is no
//! separate save step to forget.

use crate::error::{AudiolinkError, Result};
use crate::id::AudiolinkId;
use crate::tag::TagHandle;
use crate::types::IdState;
use std::path::Path;
use tracing::debug;

/// One media file and its embedded identifier
///
/// Binding loads the file's tag state; independent instances bound to the
/// same path share nothing, so a re-open observes external changes.
///
/// # Examples
///
/// ```rust,no_run
/// use audiolink::{AudioFile, AudiolinkId};
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut file = AudioFile::open(Path::new("track.flac"))?;
/// if file.id_state().is_missing() {
///     file.set_id(AudiolinkId::generate())?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AudioFile {
    tag: TagHandle,
}

impl AudioFile {
    /// Bind to a media file
    ///
    /// # Errors
    ///
    /// Returns [`AudiolinkError::UnreadableFile`] when the path is not a
    /// recognized media container or cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(AudioFile {
            tag: TagHandle::open(path)?,
        })
    }

    /// Path this file is bound to
    pub fn path(&self) -> &Path {
        self.tag.path()
    }

    /// State of the identifier field: missing, valid, or present-but-invalid
    ///
    /// Never fails for a malformed stored value — the raw text is
    /// preserved in [`IdState::Invalid`].
    pub fn id_state(&self) -> IdState {
        IdState::from_raw(self.tag.get().as_deref())
    }

    /// The identifier, when a well-formed one is present
    pub fn id(&self) -> Option<AudiolinkId> {
        self.id_state().id()
    }

    /// Write an identifier to the tag field and persist
    ///
    /// Overwrites whatever value the field held before; use
    /// [`set_id_from_file_name`](AudioFile::set_id_from_file_name) for the
    /// guarded variant.
    pub fn set_id(&mut self, id: AudiolinkId) -> Result<()> {
        self.tag.set(&id.to_string())?;
        debug!(path = ?self.path(), %id, "identifier written");
        Ok(())
    }

    /// Remove the identifier field from every storage representation the
    /// container carries, then persist
    ///
    /// Idempotent: clearing a file with no identifier is a no-op that
    /// still rewrites the tag block.
    pub fn clear_id(&mut self) -> Result<()> {
        self.tag.clear()?;
        debug!(path = ?self.path(), "identifier cleared");
        Ok(())
    }

    /// Adopt the identifier encoded in the file's name
    ///
    /// Mirror entries are named `<identifier><extension>`; this parses the
    /// stem and writes it as the file's identifier, which recovers the
    /// identity of a file whose tags were stripped but whose mirror name
    /// survived.
    ///
    /// # Errors
    ///
    /// - [`AudiolinkError::Format`] when the stem is not a well-formed
    ///   identifier
    /// - [`AudiolinkError::IdExists`] when the field already holds a value
    ///   and `overwrite` is false
    pub fn set_id_from_file_name(&mut self, overwrite: bool) -> Result<AudiolinkId> {
        let stem = self
            .path()
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| AudiolinkError::format(self.path().display().to_string()))?;
        let id = AudiolinkId::parse(stem)?;

        if !overwrite {
            if let Some(existing) = self.tag.get() {
                return Err(AudiolinkError::IdExists {
                    id: existing,
                    path: self.path().to_path_buf(),
                });
            }
        }

        self.set_id(id)?;
        Ok(id)
    }
}
