//! Bulk operations over a source tree
//!
//! [`Library`] owns the scan cache for one source root and drives the
//! bulk operations: scanning identifier/link state, assigning missing or
//! invalid identifiers, clearing identifiers, and reconciling mirror
//! links. It composes the per-file components — [`AudioFile`] for tag
//! access, [`LinkEntry`] for mirror classification — and applies the
//! batch propagation policy: per-file failures are logged, counted in the
//! returned report, and never abort the pass.
//!
//! ## Configuration
//!
//! A `Library` is configured through [`LibraryBuilder`], which validates
//! the source and mirror roots before any filesystem mutation can happen:
//! the roots must be existing directories, must not overlap (neither may
//! be an ancestor of the other — link creation could otherwise recurse
//! into the scan or clobber the source tree), and on Unix must live on
//! the same device, since hard links cannot cross volumes.
//!
//! ## The scan cache
//!
//! Bulk operations iterate the cache in enumeration order and mutate
//! records in place; they never re-walk the filesystem on their own.
//! After an external change, the caller re-scans. The cache is owned
//! exclusively by its `Library`, and every bulk operation takes
//! `&mut self`, so concurrent mutation is ruled out by construction.
//!
//! # Examples
//!
//! ```rust,no_run
//! use audiolink::{AssignTarget, LibraryBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut library = LibraryBuilder::new()
//!     .mirror_root("/music/.links")
//!     .build("/music/tracks")?;
//!
//! let summary = library.scan()?;
//! if !summary.is_fully_tagged() {
//!     library.assign_ids(AssignTarget::Missing)?;
//! }
//! library.reconcile_links()?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AudiolinkError, Result};
use crate::file::AudioFile;
use crate::id::AudiolinkId;
use crate::link::{LinkEntry, LinkStatus};
use crate::tag;
use crate::types::{
    AssignReport, AssignTarget, ClearReport, IdState, LinkCounts, ReconcileReport, ScanRecord,
    ScanSummary,
};
use crate::utils;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// A source tree of media files and its optional hard-link mirror
///
/// Created through [`LibraryBuilder`] (or [`Library::open`] when no
/// mirror is wanted). Holds the scan cache built by
/// [`scan`](Library::scan) and consumed by the bulk operations.
#[derive(Debug)]
pub struct Library {
    /// Root of the source tree being scanned
    root: PathBuf,
    /// Mirror directory holding identifier-named hard links
    mirror_root: Option<PathBuf>,
    /// Per-file records in enumeration order; empty until a scan runs
    cache: Vec<ScanRecord>,
}

impl Library {
    /// Open a library over a source tree without a mirror directory
    ///
    /// Link-dependent operations ([`reconcile_links`](Library::reconcile_links))
    /// will fail with [`AudiolinkError::Configuration`]; use
    /// [`LibraryBuilder`] to configure a mirror.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        LibraryBuilder::new().build(root)
    }

    /// Root of the source tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configured mirror root, if any
    pub fn mirror_root(&self) -> Option<&Path> {
        self.mirror_root.as_deref()
    }

    /// Immutable view of the scan cache, in enumeration order
    ///
    /// Empty until [`scan`](Library::scan) has run. Enumeration order is
    /// filesystem order: stable enough to correlate within one run, not
    /// guaranteed across runs.
    pub fn records(&self) -> &[ScanRecord] {
        &self.cache
    }

    /// Walk the source tree and rebuild the scan cache
    ///
    /// Enumerates every file under the root whose extension is in the tag
    /// collaborator's registry, binds each one, and records its
    /// identifier state plus — when a mirror is configured — its link
    /// status. A file without a valid identifier cannot name a mirror
    /// entry, so its link status is recorded as
    /// [`LinkStatus::Missing`].
    ///
    /// Unreadable files are logged at `warn`, counted in the summary, and
    /// excluded from the cache; the walk continues. The previous cache is
    /// replaced wholesale.
    #[instrument(skip(self))]
    pub fn scan(&mut self) -> Result<ScanSummary> {
        let mut records = Vec::new();
        let mut unreadable = 0usize;

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !tag::is_supported_path(path) {
                continue;
            }

            let file = match AudioFile::open(path) {
                Ok(file) => file,
                Err(e) => {
                    warn!(path = ?path, error = %e, "skipping unreadable media file");
                    unreadable += 1;
                    continue;
                }
            };

            let id_state = file.id_state();
            let link_status = self
                .mirror_root
                .as_deref()
                .map(|mirror| Self::probe_link(&file, mirror));

            records.push(ScanRecord {
                path: path.to_path_buf(),
                id_state,
                link_status,
            });
        }

        self.cache = records;
        let summary = self.summarize(unreadable);
        info!(
            files = summary.files,
            id_valid = summary.id_valid,
            id_invalid = summary.id_invalid,
            id_missing = summary.id_missing,
            unreadable = summary.unreadable,
            "scan complete"
        );
        Ok(summary)
    }

    /// Generate and write identifiers for records matching `target`
    ///
    /// Updates each record's identifier state in place. Link status is
    /// not touched — reconcile (or re-scan) separately. Per-file failures
    /// are logged and counted; the pass continues.
    #[instrument(skip(self))]
    pub fn assign_ids(&mut self, target: AssignTarget) -> Result<AssignReport> {
        let mut report = AssignReport::default();

        for record in &mut self.cache {
            if !target.matches(&record.id_state) {
                continue;
            }
            match assign_fresh_id(&record.path) {
                Ok(id) => {
                    record.id_state = IdState::Valid(id);
                    report.assigned += 1;
                }
                Err(e) => {
                    warn!(path = ?record.path, error = %e, "failed to assign identifier");
                    report.failed += 1;
                }
            }
        }

        info!(
            assigned = report.assigned,
            failed = report.failed,
            "identifier assignment complete"
        );
        Ok(report)
    }

    /// Remove the identifier from every cached record
    ///
    /// Destructive: confirmation is the caller's concern, not enforced
    /// here. Records are updated to [`IdState::Missing`] as they are
    /// cleared; per-file failures are logged and counted.
    #[instrument(skip(self))]
    pub fn clear_ids(&mut self) -> Result<ClearReport> {
        let mut report = ClearReport::default();

        for record in &mut self.cache {
            match clear_id(&record.path) {
                Ok(()) => {
                    record.id_state = IdState::Missing;
                    report.cleared += 1;
                }
                Err(e) => {
                    warn!(path = ?record.path, error = %e, "failed to clear identifier");
                    report.failed += 1;
                }
            }
        }

        info!(
            cleared = report.cleared,
            failed = report.failed,
            "identifier clearing complete"
        );
        Ok(report)
    }

    /// Ensure a mirror hard link exists for every record with a valid
    /// identifier
    ///
    /// Calls [`LinkEntry::create`] with non-overwrite semantics for each
    /// record and writes the post-operation status back into the cache.
    /// Already-active links are left untouched; records without a valid
    /// identifier are skipped (they cannot name a link). Refused entries
    /// (`Inactive` without overwrite, any `Conflict`) are counted as
    /// failures and logged.
    ///
    /// This pass never deletes. Pruning stale or orphaned mirror entries
    /// is an explicit, separate concern.
    ///
    /// # Errors
    ///
    /// Returns [`AudiolinkError::Configuration`] when no mirror root is
    /// configured.
    #[instrument(skip(self))]
    pub fn reconcile_links(&mut self) -> Result<ReconcileReport> {
        let mirror = self
            .mirror_root
            .clone()
            .ok_or_else(|| AudiolinkError::configuration("mirror root not configured"))?;

        let mut report = ReconcileReport::default();

        for record in &mut self.cache {
            let file = match AudioFile::open(&record.path) {
                Ok(file) => file,
                Err(e) => {
                    warn!(path = ?record.path, error = %e, "skipping unreadable file");
                    report.failed += 1;
                    continue;
                }
            };

            let entry = match LinkEntry::new(&file, &mirror) {
                Ok(entry) => entry,
                Err(_) => {
                    debug!(path = ?record.path, "no valid identifier, skipping");
                    report.skipped += 1;
                    continue;
                }
            };

            let pre = entry.status();
            match entry.create(false) {
                Ok(()) => {
                    record.link_status = Some(LinkStatus::Active);
                    match pre {
                        LinkStatus::Active => report.active += 1,
                        _ => report.created += 1,
                    }
                }
                Err(e) => {
                    let status = match &e {
                        AudiolinkError::LinkExists { status, .. } => *status,
                        _ => entry.status(),
                    };
                    warn!(path = ?record.path, %status, error = %e, "link creation refused");
                    record.link_status = Some(status);
                    report.failed += 1;
                }
            }
        }

        info!(
            created = report.created,
            active = report.active,
            skipped = report.skipped,
            failed = report.failed,
            "link reconciliation complete"
        );
        Ok(report)
    }

    /// Link status for one file, treating the id-less case as `Missing`
    fn probe_link(file: &AudioFile, mirror: &Path) -> LinkStatus {
        match LinkEntry::new(file, mirror) {
            Ok(entry) => entry.status(),
            Err(_) => LinkStatus::Missing,
        }
    }

    fn summarize(&self, unreadable: usize) -> ScanSummary {
        let mut id_valid = 0;
        let mut id_invalid = 0;
        let mut id_missing = 0;
        let mut links = self.mirror_root.as_ref().map(|_| LinkCounts::default());

        for record in &self.cache {
            match record.id_state {
                IdState::Valid(_) => id_valid += 1,
                IdState::Invalid(_) => id_invalid += 1,
                IdState::Missing => id_missing += 1,
            }
            if let (Some(counts), Some(status)) = (links.as_mut(), record.link_status) {
                counts.record(status);
            }
        }

        ScanSummary {
            files: self.cache.len(),
            id_valid,
            id_invalid,
            id_missing,
            unreadable,
            links,
            scanned_at: Utc::now(),
        }
    }
}

/// Open a file and write a freshly generated identifier to it
fn assign_fresh_id(path: &Path) -> Result<AudiolinkId> {
    let mut file = AudioFile::open(path)?;
    let id = AudiolinkId::generate();
    file.set_id(id)?;
    Ok(id)
}

/// Open a file and clear its identifier
fn clear_id(path: &Path) -> Result<()> {
    let mut file = AudioFile::open(path)?;
    file.clear_id()
}

/// Builder for [`Library`] instances
///
/// Validates the source and mirror roots at build time, before any
/// filesystem mutation: both must be existing directories, they must not
/// overlap in either direction, and on Unix they must share a device.
///
/// # Examples
///
/// ```rust,no_run
/// use audiolink::LibraryBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let library = LibraryBuilder::new()
///     .mirror_root("/music/.links")
///     .build("/music/tracks")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct LibraryBuilder {
    mirror_root: Option<PathBuf>,
}

impl LibraryBuilder {
    /// Create a new builder with no mirror configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mirror directory that will hold identifier-named
    /// hard links
    pub fn mirror_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.mirror_root = Some(path.into());
        self
    }

    /// Validate the configuration and build the [`Library`]
    ///
    /// # Errors
    ///
    /// Returns [`AudiolinkError::Configuration`] when:
    /// - the source root (or configured mirror root) is not an existing
    ///   directory
    /// - source and mirror roots are equal, or one contains the other
    /// - source and mirror roots are on different devices (Unix)
    pub fn build(self, root: impl Into<PathBuf>) -> Result<Library> {
        let root = root.into();

        if !root.is_dir() {
            return Err(AudiolinkError::configuration(format!(
                "source root is not a directory: {}",
                root.display()
            )));
        }

        if let Some(mirror) = &self.mirror_root {
            if !mirror.is_dir() {
                return Err(AudiolinkError::configuration(format!(
                    "mirror root is not a directory: {}",
                    mirror.display()
                )));
            }
            if utils::paths_overlap(&root, mirror)? {
                return Err(AudiolinkError::configuration(format!(
                    "source root {} and mirror root {} overlap",
                    root.display(),
                    mirror.display()
                )));
            }
            #[cfg(unix)]
            if utils::device_of(&root)? != utils::device_of(mirror)? {
                return Err(AudiolinkError::configuration(format!(
                    "mirror root {} is on a different device than source root {}; \
                     hard links cannot cross volumes",
                    mirror.display(),
                    root.display()
                )));
            }
        }

        debug!(root = ?root, mirror = ?self.mirror_root, "library configured");
        Ok(Library {
            root,
            mirror_root: self.mirror_root,
            cache: Vec::new(),
        })
    }
}
