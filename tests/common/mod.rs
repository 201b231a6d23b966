//! Shared fixtures for integration tests
//!
//! Media files are generated, not checked in: a minimal PCM WAV is enough
//! for lofty to parse and to carry an ID3v2 chunk with the identifier
//! field.

use audiolink::{AudioFile, AudiolinkId, Library, LibraryBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a minimal valid PCM WAV file (mono, 16-bit, 44.1kHz silence)
pub fn write_wav(path: &Path) {
    let data_len = 64u32;
    let mut buf = Vec::with_capacity(44 + data_len as usize);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_len).to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&1u16.to_le_bytes()); // mono
    buf.extend_from_slice(&44100u32.to_le_bytes());
    buf.extend_from_slice(&88200u32.to_le_bytes());
    buf.extend_from_slice(&2u16.to_le_bytes()); // block align
    buf.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_len.to_le_bytes());
    buf.resize(buf.len() + data_len as usize, 0);
    fs::write(path, buf).unwrap();
}

/// Test fixture holding a source tree and a mirror directory on the same
/// temp volume
pub struct LibraryFixture {
    pub temp: TempDir,
    pub source: PathBuf,
    pub mirror: PathBuf,
}

impl LibraryFixture {
    /// Create sibling `source/` and `mirror/` directories under one
    /// tempdir, guaranteeing both sit on the same device
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let mirror = temp.path().join("mirror");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&mirror).unwrap();
        LibraryFixture {
            temp,
            source,
            mirror,
        }
    }

    /// Build a library over the fixture's source tree with its mirror
    pub fn library(&self) -> Library {
        LibraryBuilder::new()
            .mirror_root(&self.mirror)
            .build(&self.source)
            .unwrap()
    }

    /// Build a library over the fixture's source tree without a mirror
    pub fn library_without_mirror(&self) -> Library {
        Library::open(&self.source).unwrap()
    }

    /// Write a fresh WAV under the source tree
    pub fn add_track(&self, name: &str) -> PathBuf {
        let path = self.source.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        write_wav(&path);
        path
    }

    /// Write a fresh WAV under the source tree and embed an identifier
    pub fn add_tagged_track(&self, name: &str) -> (PathBuf, AudiolinkId) {
        let path = self.add_track(name);
        let mut file = AudioFile::open(&path).unwrap();
        let id = AudiolinkId::generate();
        file.set_id(id).unwrap();
        (path, id)
    }
}
