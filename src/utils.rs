//! Filesystem helpers shared across the library
//!
//! Identity checks (device/inode) used by link classification and the
//! configuration-time validation of source and mirror roots.

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Check whether two paths refer to the same filesystem object
/// (same device and inode)
///
/// This is the test that distinguishes an `Active` mirror entry (a hard
/// link to the source) from an independent file that merely shares the
/// name.
pub fn same_inode(a: &Path, b: &Path) -> Result<bool> {
    Ok(same_file::is_same_file(a, b)?)
}

/// Device id of the filesystem holding `path`
///
/// Used to reject a mirror root on a different volume before any link
/// creation is attempted; hard links cannot cross devices.
#[cfg(unix)]
pub fn device_of(path: &Path) -> Result<u64> {
    use std::os::unix::fs::MetadataExt;
    Ok(fs::metadata(path)?.dev())
}

/// Check whether one path is equal to, an ancestor of, or a descendant of
/// the other
///
/// Both paths are canonicalized first, so symlinked spellings of the same
/// tree are caught.
pub fn paths_overlap(a: &Path, b: &Path) -> Result<bool> {
    let a = fs::canonicalize(a)?;
    let b = fs::canonicalize(b)?;
    Ok(a.starts_with(&b) || b.starts_with(&a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_same_inode() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let c = dir.path().join("c");
        File::create(&a).unwrap();
        File::create(&c).unwrap();
        fs::hard_link(&a, &b).unwrap();

        assert!(same_inode(&a, &b).unwrap());
        assert!(!same_inode(&a, &c).unwrap());
    }

    #[test]
    fn test_same_inode_missing_path() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        File::create(&a).unwrap();
        assert!(same_inode(&a, &dir.path().join("gone")).is_err());
    }

    #[test]
    fn test_paths_overlap() {
        let dir = TempDir::new().unwrap();
        let parent = dir.path().join("tree");
        let child = parent.join("sub");
        let sibling = dir.path().join("other");
        fs::create_dir_all(&child).unwrap();
        fs::create_dir_all(&sibling).unwrap();

        assert!(paths_overlap(&parent, &child).unwrap());
        assert!(paths_overlap(&child, &parent).unwrap());
        assert!(paths_overlap(&parent, &parent).unwrap());
        assert!(!paths_overlap(&parent, &sibling).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_device_of_same_volume() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();
        assert_eq!(device_of(&a).unwrap(), device_of(&b).unwrap());
    }
}
