//! Whole-state snapshot persistence for the Slate asset library.
//!
//! A [`SnapshotFile`] binds one serializable aggregate value to one JSON
//! file. Saving replaces the entire file with the current state; loading
//! parses the entire file back. There is no append, no diff, and no
//! incremental update: the snapshot is a full-state mirror, written after
//! every committed mutation by the layer above.
//!
//! Persistence is a component *holding a reference to* the aggregate's
//! type, not behavior grafted onto the aggregate itself: any
//! `Serialize + DeserializeOwned + Default` value can be bound.

pub mod error;
pub mod file;

pub use error::{SnapshotError, SnapshotResult};
pub use file::SnapshotFile;
