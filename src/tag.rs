//! Tag I/O collaborator backed by lofty
//!
//! This module owns every interaction with container-specific metadata.
//! The rest of the crate deals in one logical field — the audiolink
//! identifier — and this module maps it onto the storage slot appropriate
//! for each container format:
//!
//! - ID3v2 user-text frame (`TXXX:AUDIOLINK_ID`) for MP3, WAV and AIFF
//! - MP4 freeform atom for M4A
//! - Vorbis comment for FLAC, OGG, Opus and Speex
//! - APE item for APE, MPC and WavPack
//!
//! Reads fall back to any tag representation present in the file, so a
//! value written by another tool into a non-primary slot is still
//! surfaced. Clearing removes the field from **every** representation
//! before saving, so absence is observable consistently afterwards.
//!
//! The supported-extension registry is lofty's own
//! ([`FileType::from_ext`]), not a hand-maintained list.

use crate::error::{AudiolinkError, Result};
use lofty::config::{ParseOptions, ParsingMode, WriteOptions};
use lofty::file::{AudioFile as _, FileType, TaggedFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagType};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Logical name of the identifier field
pub const FIELD_KEY: &str = "AUDIOLINK_ID";

/// The `ItemKey` under which the identifier is stored
fn field_key() -> ItemKey {
    ItemKey::Unknown(FIELD_KEY.to_string())
}

/// Parse options used for every probe
fn parse_options() -> ParseOptions {
    ParseOptions::new()
        .read_cover_art(false)
        .parsing_mode(ParsingMode::BestAttempt)
}

/// Storage tag type for a container format
///
/// Mirrors the per-format storage styles of the identifier field: formats
/// without a native free-form slot get an ID3v2 user-text frame.
fn storage_tag_type(file_type: FileType) -> TagType {
    match file_type {
        FileType::Mpeg | FileType::Wav | FileType::Aiff | FileType::Aac => TagType::Id3v2,
        FileType::Mp4 => TagType::Mp4Ilst,
        FileType::Flac | FileType::Vorbis | FileType::Opus | FileType::Speex => {
            TagType::VorbisComments
        }
        FileType::Ape | FileType::Mpc | FileType::WavPack => TagType::Ape,
        other => other.primary_tag_type(),
    }
}

/// Check whether an extension belongs to a supported media container
pub fn is_supported_extension(ext: &str) -> bool {
    FileType::from_ext(ext).is_some()
}

/// Check whether a path has a supported media-container extension
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(is_supported_extension)
}

/// Handle over one media file's tag storage
///
/// Opening probes and parses the container; the tag state seen by
/// [`get`](TagHandle::get) is the state loaded at open time. Mutations
/// ([`set`](TagHandle::set), [`clear`](TagHandle::clear)) persist to disk
/// immediately.
pub struct TagHandle {
    path: PathBuf,
    file: TaggedFile,
}

impl std::fmt::Debug for TagHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagHandle")
            .field("path", &self.path)
            .field("file_type", &self.file.file_type())
            .finish()
    }
}

impl TagHandle {
    /// Open a media file for tag access
    ///
    /// # Errors
    ///
    /// Returns [`AudiolinkError::UnreadableFile`] when the path is not a
    /// container format lofty recognizes or the file cannot be parsed.
    pub fn open(path: &Path) -> Result<Self> {
        let file = Probe::open(path)
            .and_then(|probe| probe.options(parse_options()).read())
            .map_err(|source| AudiolinkError::UnreadableFile {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(TagHandle {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Path this handle is bound to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the identifier field
    ///
    /// The storage slot for this container is consulted first, then any
    /// other tag representation present in the file. Returns the raw
    /// stored text; validation is the caller's concern.
    pub fn get(&self) -> Option<String> {
        let storage = storage_tag_type(self.file.file_type());

        if let Some(tag) = self.file.tag(storage) {
            if let Some(value) = tag.get_string(&field_key()) {
                return Some(value.to_string());
            }
        }

        self.file
            .tags()
            .iter()
            .filter(|tag| tag.tag_type() != storage)
            .find_map(|tag| tag.get_string(&field_key()).map(|s| s.to_string()))
    }

    /// Write the identifier field and persist
    pub fn set(&mut self, value: &str) -> Result<()> {
        let storage = storage_tag_type(self.file.file_type());

        if self.file.tag_mut(storage).is_none() {
            self.file.insert_tag(Tag::new(storage));
        }
        let tag = self
            .file
            .tag_mut(storage)
            .ok_or_else(|| AudiolinkError::configuration("tag storage slot unavailable"))?;
        tag.insert_text(field_key(), value.to_string());

        trace!(path = ?self.path, "wrote identifier field");
        self.save()
    }

    /// Remove the identifier field from every tag representation and persist
    pub fn clear(&mut self) -> Result<()> {
        let present: Vec<TagType> = self.file.tags().iter().map(|tag| tag.tag_type()).collect();
        for tag_type in present {
            if let Some(tag) = self.file.tag_mut(tag_type) {
                tag.remove_key(&field_key());
            }
        }

        trace!(path = ?self.path, "cleared identifier field");
        self.save()
    }

    fn save(&mut self) -> Result<()> {
        self.file
            .save_to_path(&self.path, WriteOptions::default())
            .map_err(|source| AudiolinkError::TagPersist {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_tag_types() {
        assert_eq!(storage_tag_type(FileType::Mpeg), TagType::Id3v2);
        assert_eq!(storage_tag_type(FileType::Wav), TagType::Id3v2);
        assert_eq!(storage_tag_type(FileType::Mp4), TagType::Mp4Ilst);
        assert_eq!(storage_tag_type(FileType::Flac), TagType::VorbisComments);
        assert_eq!(storage_tag_type(FileType::Opus), TagType::VorbisComments);
        assert_eq!(storage_tag_type(FileType::Ape), TagType::Ape);
    }

    #[test]
    fn test_supported_extensions() {
        for ext in ["flac", "mp3", "m4a", "ogg", "opus", "wav", "wv", "ape"] {
            assert!(is_supported_extension(ext), "{ext} should be supported");
        }
        assert!(!is_supported_extension("txt"));
        assert!(!is_supported_extension(""));
    }

    #[test]
    fn test_supported_paths() {
        assert!(is_supported_path(Path::new("/music/a.flac")));
        assert!(!is_supported_path(Path::new("/music/cover.jpg")));
        assert!(!is_supported_path(Path::new("/music/no_extension")));
    }
}
