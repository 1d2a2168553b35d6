//! The Slate asset graph store.
//!
//! An [`AssetLibrary`] owns a UUID-keyed graph of assets, each backed by a
//! folder (or, once archived, a compressed archive) under one library root,
//! with the whole state mirrored to a JSON snapshot after every committed
//! mutation.
//!
//! # Components
//!
//! - [`LibraryData`] — the aggregate: asset records plus the derived type
//!   index
//! - [`AssetLibrary`] — every mutating and query operation, the commit
//!   boundary, and the wiring to `slate-folders` / `slate-snapshot`
//! - [`LibraryConfig`] — explicit per-instance configuration; there is no
//!   global library
//!
//! # Invariants
//!
//! After every completed operation:
//!
//! 1. Edges are stored in both directions: a child appears in its parent's
//!    `assets_used` exactly when the parent appears in the child's
//!    `assets_used_by`.
//! 2. No asset uses itself.
//! 3. The type index is exactly the partition of assets by tag.
//! 4. Every asset has exactly one filesystem representation: a folder when
//!    live, an archive when archived.
//! 5. Archived assets are frozen: no outgoing-edge or data changes.
//! 6. An asset referenced by an archived asset's edges cannot be removed.
//!
//! # Concurrency
//!
//! None. The library is synchronous and single-threaded by design; one
//! process owns one library root for its lifetime, and every operation
//! runs to completion before returning.

pub mod config;
pub mod error;
pub mod library;
pub mod state;

pub use config::{FaultMode, LibraryConfig};
pub use error::{LibraryError, LibraryResult};
pub use library::{AssetLibrary, SNAPSHOT_FILE};
pub use state::LibraryData;
