//! # Audiolink - Permanent identifiers for media files
//!
//! Audiolink assigns a stable, content-independent identifier to media
//! files by embedding it in their tags, and maintains a mirror directory
//! of hard links named after that identifier — so other tools can address
//! a file by a permanent name regardless of where it currently lives or
//! what it is called.
//!
//! ## Overview
//!
//! The identifier is a random 128-bit value serialized as 32 lowercase
//! hex characters plus a fixed `-al` suffix. Once embedded, the file can
//! be renamed, retagged, or moved anywhere under the source tree: a
//! reconciliation pass re-creates the mirror link under the same
//! permanent name.
//!
//! The hard part is not reading or writing tag fields (delegated to
//! [lofty]) — it is the identity and link-reconciliation logic:
//! validating identifiers, classifying the relationship between a source
//! file and a candidate mirror entry, and performing idempotent bulk
//! reconciliation without ever clobbering an entry whose identity is
//! unverified.
//!
//! [lofty]: https://crates.io/crates/lofty
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use audiolink::{AssignTarget, LibraryBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut library = LibraryBuilder::new()
//!     .mirror_root("/music/.links")
//!     .build("/music/tracks")?;
//!
//! // Build the scan cache
//! let summary = library.scan()?;
//! println!(
//!     "{} files, {} missing an identifier",
//!     summary.files, summary.id_missing
//! );
//!
//! // Give every untagged file a permanent identifier
//! library.assign_ids(AssignTarget::Missing)?;
//!
//! // Ensure a mirror hard link exists for each identified file
//! let report = library.reconcile_links()?;
//! println!("{} links created", report.created);
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! ### Identifiers
//!
//! An [`AudiolinkId`] is generated once and embedded in the file's tags
//! (an ID3v2 user-text frame, MP4 freeform atom, Vorbis comment, or APE
//! item, depending on the container). Generation performs no collision
//! check: uniqueness rests on 128 bits of randomness.
//!
//! ### Link status
//!
//! Every source file relates to its candidate mirror entry in exactly one
//! of four ways ([`LinkStatus`]): the entry is absent (`Missing`), is a
//! hard link to the source (`Active`), is an independent copy carrying
//! the same identifier (`Inactive`), or cannot be verified (`Conflict`).
//! Mutations never auto-resolve a `Conflict`.
//!
//! ### The scan cache
//!
//! [`Library::scan`] snapshots identifier and link state for every media
//! file under the source root. Bulk operations iterate that cache and
//! update it in place; they never re-walk the filesystem, so after an
//! external change the caller re-scans.
//!
//! ## Concurrency
//!
//! The library is single-threaded and synchronous. Every bulk operation
//! takes `&mut Library`, which serializes cache mutation by construction.
//! Filesystem races with other processes are not papered over: a racing
//! mutation of a link path surfaces as the syscall's own error.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, AudiolinkError>`. Single-file APIs
//! propagate every failure; bulk operations downgrade per-file failures
//! to logged, counted skips and keep going.
//!
//! ## Module Organization
//!
//! - [`id`]: identifier generation, parsing and serialization
//! - [`file`]: per-file identifier operations
//! - [`link`]: mirror-link classification and mutation
//! - [`library`]: source-tree scanning and bulk operations
//! - [`tag`]: tag I/O collaborator backed by lofty
//! - [`types`]: shared records and operation reports
//! - [`error`]: error types and handling

// Public API modules
pub mod error;
pub mod file;
pub mod id;
pub mod library;
pub mod link;
pub mod tag;
pub mod types;

// Internal modules (not part of public API)
mod utils;

// Re-export main types for convenience
pub use error::{AudiolinkError, Result};
pub use file::AudioFile;
pub use id::{AudiolinkId, ID_SUFFIX};
pub use library::{Library, LibraryBuilder};
pub use link::{LinkEntry, LinkStatus};
pub use types::{
    AssignReport, AssignTarget, ClearReport, IdState, LinkCounts, ReconcileReport, ScanRecord,
    ScanSummary,
};
