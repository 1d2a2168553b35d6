//! Per-asset folder management for the Slate asset library.
//!
//! A [`FolderStore`] owns a library root directory and maps every asset id
//! to exactly one filesystem representation at a time:
//!
//! - `<root>/<id>/` — the live entry folder holding the asset's files
//! - `<root>/<id>.tar.zst` — the archived form, a zstd-compressed tar of
//!   the folder's contents
//!
//! The store creates and deletes entry folders, converts between the two
//! representations, and answers existence queries. It never inspects the
//! files inside an entry; asset content is opaque at this layer.
//!
//! # Design Rules
//!
//! 1. One representation per id: archiving removes the folder, unpacking
//!    removes the archive; collisions are errors, never overwrites.
//! 2. Compress-then-delete: the archive is fully written and renamed into
//!    place before the source folder is removed, so an interrupted archive
//!    operation leaves the folder behind, not a hole.
//! 3. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod store;

mod archive;

pub use error::{FolderError, FolderResult};
pub use store::{FolderStore, ARCHIVE_EXT};
