use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use slate_types::AssetId;

use crate::archive::{pack_dir, unpack_dir};
use crate::error::{FolderError, FolderResult};

/// Extension of per-asset archive files under the library root.
pub const ARCHIVE_EXT: &str = "tar.zst";

/// Maps asset ids to filesystem locations under a library root and manages
/// the folder ⇄ archive lifecycle.
///
/// The store is a pure path-and-lifecycle layer: it knows where an id's
/// folder or archive lives and how to convert between the two, but it
/// never reads the asset files themselves and holds no in-memory state
/// beyond the root path.
#[derive(Clone, Debug)]
pub struct FolderStore {
    root: PathBuf,
}

impl FolderStore {
    /// Bind a store to a root directory. No filesystem access happens
    /// until [`Self::ensure_root`] or the first operation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The library root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if absent. Idempotent.
    pub fn ensure_root(&self) -> FolderResult<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Path of the live entry folder for an id.
    pub fn entry_path(&self, id: &AssetId) -> PathBuf {
        self.root.join(id.to_string())
    }

    /// Path of the archive file for an id.
    pub fn archive_path(&self, id: &AssetId) -> PathBuf {
        self.root.join(format!("{id}.{ARCHIVE_EXT}"))
    }

    /// Whether the live entry folder exists.
    pub fn entry_exists(&self, id: &AssetId) -> bool {
        self.entry_path(id).is_dir()
    }

    /// Whether the archive file exists.
    pub fn archive_exists(&self, id: &AssetId) -> bool {
        self.archive_path(id).is_file()
    }

    /// `true` when the entry folder exists and has no children.
    pub fn entry_is_empty(&self, id: &AssetId) -> FolderResult<bool> {
        let mut children = fs::read_dir(self.entry_path(id))?;
        Ok(children.next().is_none())
    }

    /// Create the entry folder for an id. No-op when it already exists.
    pub fn create_entry(&self, id: &AssetId) -> FolderResult<()> {
        let path = self.entry_path(id);
        if path.is_dir() {
            return Ok(());
        }
        fs::create_dir(&path)?;
        debug!(asset = %id.short(), "created entry folder");
        Ok(())
    }

    /// Recursively delete the entry folder.
    ///
    /// A missing entry is an error, not a no-op: callers delete only after
    /// confirming presence, so absence here means the library state and
    /// the filesystem have diverged.
    pub fn delete_entry(&self, id: &AssetId) -> FolderResult<()> {
        let path = self.entry_path(id);
        if !path.is_dir() {
            return Err(FolderError::EntryNotFound(*id));
        }
        fs::remove_dir_all(&path)?;
        debug!(asset = %id.short(), "deleted entry folder");
        Ok(())
    }

    /// Delete the archive file for an id.
    pub fn delete_archive(&self, id: &AssetId) -> FolderResult<()> {
        let path = self.archive_path(id);
        if !path.is_file() {
            return Err(FolderError::ArchiveNotFound(*id));
        }
        fs::remove_file(&path)?;
        debug!(asset = %id.short(), "deleted archive");
        Ok(())
    }

    /// Convert the live entry folder into an archive file.
    ///
    /// Preconditions, checked in order: the entry exists, no archive with
    /// the same id is present, and the folder has content (an empty
    /// folder has nothing worth archiving). The folder is removed only
    /// after the archive has been fully written and renamed into place.
    pub fn archive_entry(&self, id: &AssetId) -> FolderResult<()> {
        let entry = self.entry_path(id);
        if !entry.is_dir() {
            return Err(FolderError::EntryNotFound(*id));
        }
        if self.archive_exists(id) {
            return Err(FolderError::ArchiveCollision(*id));
        }
        if self.entry_is_empty(id)? {
            return Err(FolderError::EmptyFolder(*id));
        }

        pack_dir(&entry, &self.archive_path(id))?;
        fs::remove_dir_all(&entry)?;
        debug!(asset = %id.short(), "archived entry");
        Ok(())
    }

    /// Expand an archive back into a live entry folder and delete the
    /// archive.
    ///
    /// An existing folder under the id is a collision error; the store
    /// never extracts over live files.
    pub fn unpack_entry(&self, id: &AssetId) -> FolderResult<()> {
        let archive = self.archive_path(id);
        if !archive.is_file() {
            return Err(FolderError::ArchiveNotFound(*id));
        }
        if self.entry_exists(id) {
            return Err(FolderError::EntryCollision(*id));
        }

        unpack_dir(&archive, &self.entry_path(id))?;
        fs::remove_file(&archive)?;
        debug!(asset = %id.short(), "unpacked entry");
        Ok(())
    }

    /// Hook for revealing an entry in the OS file browser.
    ///
    /// The core never drives desktop UI; this only records the request.
    /// Embedders that want the behavior watch the log or wrap the store.
    pub fn reveal_entry(&self, id: &AssetId) {
        debug!(
            asset = %id.short(),
            path = %self.entry_path(id).display(),
            "reveal requested"
        );
    }
}
