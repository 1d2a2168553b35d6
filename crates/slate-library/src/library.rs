//! The asset graph store and its commit boundary.

use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use slate_folders::FolderStore;
use slate_snapshot::SnapshotFile;
use slate_types::{Asset, AssetId, TypeError, TypeTag};

use crate::config::{FaultMode, LibraryConfig};
use crate::error::{LibraryError, LibraryResult};
use crate::state::LibraryData;

/// File name of the snapshot inside the library root.
pub const SNAPSHOT_FILE: &str = "library.json";

/// The asset graph store.
///
/// Owns the in-memory [`LibraryData`], the per-asset [`FolderStore`], and
/// the snapshot file. Every mutating operation validates its preconditions
/// before touching anything, applies the in-memory and filesystem changes,
/// and then persists the whole state exactly once (see [`Self::commit`]).
///
/// One instance owns one library root for its lifetime. All operations
/// are synchronous; two processes must never point at the same root.
pub struct AssetLibrary {
    folders: FolderStore,
    snapshot: SnapshotFile<LibraryData>,
    state: LibraryData,
    config: LibraryConfig,
}

impl AssetLibrary {
    /// Open the library rooted at `root`, creating the root folder and an
    /// empty snapshot on first use.
    pub fn open(root: impl AsRef<Path>, config: LibraryConfig) -> LibraryResult<Self> {
        let folders = FolderStore::new(root.as_ref());
        folders.ensure_root()?;

        let snapshot = SnapshotFile::new(folders.root().join(SNAPSHOT_FILE));
        let state: LibraryData = snapshot.load()?;
        debug!(
            root = %folders.root().display(),
            assets = state.len(),
            "library opened"
        );

        Ok(Self {
            folders,
            snapshot,
            state,
            config,
        })
    }

    /// The folder store backing this library.
    pub fn folders(&self) -> &FolderStore {
        &self.folders
    }

    /// The current aggregate state.
    pub fn state(&self) -> &LibraryData {
        &self.state
    }

    // ---------------------------------------------------------------
    // Commit boundary
    // ---------------------------------------------------------------

    /// Run a mutating operation; iff it succeeds, persist the whole state
    /// exactly once before returning.
    ///
    /// Every precondition check inside `op` runs before any mutation, so a
    /// failed operation leaves memory, filesystem, and snapshot as they
    /// were. A crash between a folder side effect and the save can leave
    /// the snapshot behind the filesystem; that window is accepted.
    fn commit<T>(&mut self, op: impl FnOnce(&mut Self) -> LibraryResult<T>) -> LibraryResult<T> {
        let value = op(self)?;
        self.snapshot.save(&self.state)?;
        Ok(value)
    }

    /// Apply the configured fault mode to a completed mutation attempt.
    ///
    /// Under [`FaultMode::Lenient`], a precondition violation is logged
    /// and reported as success; nothing was mutated and nothing was saved.
    /// Storage failures pass through in both modes.
    fn absorb(&self, result: LibraryResult<()>) -> LibraryResult<()> {
        match result {
            Err(err) if self.config.fault_mode == FaultMode::Lenient && err.is_precondition() => {
                warn!(error = %err, "precondition violation ignored");
                Ok(())
            }
            other => other,
        }
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Create a new asset and its entry folder; returns the fresh id.
    ///
    /// The tag is normalized and decides the asset's variant fields;
    /// unrecognized tags are kept as-is with no variant fields. Creation
    /// has no preconditions and fails only on storage errors.
    pub fn create(&mut self, name: &str, type_tag: &str) -> LibraryResult<AssetId> {
        self.commit(|lib| lib.create_inner(name, type_tag))
    }

    /// Remove an asset, severing every edge touching it and deleting its
    /// filesystem representation (folder or archive).
    ///
    /// Fails with [`LibraryError::ArchivedDependency`] while any archived
    /// asset's edge sets reference the id: archived records are frozen,
    /// and their dependency history must keep resolving.
    pub fn remove(&mut self, id: AssetId) -> LibraryResult<()> {
        let result = self.commit(|lib| lib.remove_inner(id));
        self.absorb(result)
    }

    /// Convert an asset's folder into an archive and mark it archived.
    pub fn archive(&mut self, id: AssetId) -> LibraryResult<()> {
        let result = self.commit(|lib| lib.archive_inner(id));
        self.absorb(result)
    }

    /// Expand an archived asset back into a live folder.
    pub fn unpack(&mut self, id: AssetId) -> LibraryResult<()> {
        let result = self.commit(|lib| lib.unpack_inner(id));
        self.absorb(result)
    }

    /// Record that `parent` uses `child`. Idempotent on existing edges.
    pub fn connect(&mut self, parent: AssetId, child: AssetId) -> LibraryResult<()> {
        let result = self.commit(|lib| lib.connect_inner(parent, child));
        self.absorb(result)
    }

    /// Remove the `parent` uses `child` edge.
    pub fn disconnect(&mut self, parent: AssetId, child: AssetId) -> LibraryResult<()> {
        let result = self.commit(|lib| lib.disconnect_inner(parent, child));
        self.absorb(result)
    }

    /// Merge a JSON object fragment into an asset's data fields.
    ///
    /// Only the display name and the asset's variant fields are
    /// recognized; unknown keys are ignored and the edge sets, archive
    /// flag, and tag cannot be reached through this path.
    pub fn set_data(&mut self, id: AssetId, fragment: &Value) -> LibraryResult<()> {
        let result = self.commit(|lib| lib.set_data_inner(id, fragment));
        self.absorb(result)
    }

    fn create_inner(&mut self, name: &str, type_tag: &str) -> LibraryResult<AssetId> {
        let id = AssetId::generate();
        let tag = TypeTag::new(type_tag);

        self.folders.create_entry(&id)?;
        self.state.insert(id, Asset::new(name, tag.clone()));
        if self.config.reveal_on_create {
            self.folders.reveal_entry(&id);
        }

        debug!(asset = %id.short(), name, tag = %tag, "created asset");
        Ok(id)
    }

    fn remove_inner(&mut self, id: AssetId) -> LibraryResult<()> {
        let asset = self.asset(&id)?;

        // Any archived neighbor freezes the edge between us, and its edge
        // record has to keep resolving. Dependents first so the reported
        // error matches the removal guard, then dependencies.
        for neighbor in asset.assets_used_by.iter().chain(asset.assets_used.iter()) {
            if self.state.entries.get(neighbor).is_some_and(|a| a.archived) {
                return Err(LibraryError::ArchivedDependency {
                    asset: id,
                    dependent: *neighbor,
                });
            }
        }

        let archived = asset.archived;
        let children: Vec<AssetId> = asset.assets_used.iter().copied().collect();
        let parents: Vec<AssetId> = asset.assets_used_by.iter().copied().collect();

        if archived {
            self.folders.delete_archive(&id)?;
        } else {
            self.folders.delete_entry(&id)?;
        }

        for child in &children {
            self.unlink(&id, child);
        }
        for parent in &parents {
            self.unlink(parent, &id);
        }
        self.state.remove(&id);

        debug!(asset = %id.short(), "removed asset");
        Ok(())
    }

    fn archive_inner(&mut self, id: AssetId) -> LibraryResult<()> {
        if self.asset(&id)?.archived {
            return Err(LibraryError::AlreadyArchived(id));
        }

        self.folders.archive_entry(&id)?;
        self.asset_mut(&id)?.archived = true;

        debug!(asset = %id.short(), "archived asset");
        Ok(())
    }

    fn unpack_inner(&mut self, id: AssetId) -> LibraryResult<()> {
        if !self.asset(&id)?.archived {
            return Err(LibraryError::NotArchived(id));
        }

        self.folders.unpack_entry(&id)?;
        self.asset_mut(&id)?.archived = false;

        debug!(asset = %id.short(), "unpacked asset");
        Ok(())
    }

    fn connect_inner(&mut self, parent: AssetId, child: AssetId) -> LibraryResult<()> {
        if parent == child {
            return Err(LibraryError::SelfConnection(parent));
        }
        self.asset(&child)?;
        if self.asset(&parent)?.archived {
            return Err(LibraryError::ArchivedMutation(parent));
        }

        let inserted = self.asset_mut(&parent)?.assets_used.insert(child);
        self.asset_mut(&child)?.assets_used_by.insert(parent);

        if inserted {
            debug!(parent = %parent.short(), child = %child.short(), "connected assets");
        }
        Ok(())
    }

    fn disconnect_inner(&mut self, parent: AssetId, child: AssetId) -> LibraryResult<()> {
        if parent == child {
            return Err(LibraryError::SelfConnection(parent));
        }
        self.asset(&child)?;
        if self.asset(&parent)?.archived {
            return Err(LibraryError::ArchivedMutation(parent));
        }
        if !self.asset(&parent)?.assets_used.contains(&child) {
            return Err(LibraryError::EdgeNotFound { parent, child });
        }

        self.unlink(&parent, &child);
        debug!(parent = %parent.short(), child = %child.short(), "disconnected assets");
        Ok(())
    }

    fn set_data_inner(&mut self, id: AssetId, fragment: &Value) -> LibraryResult<()> {
        if self.asset(&id)?.archived {
            return Err(LibraryError::ArchivedMutation(id));
        }

        self.asset_mut(&id)?.merge_fields(fragment)?;
        debug!(asset = %id.short(), "merged asset data");
        Ok(())
    }

    /// Remove both halves of the `parent` → `child` edge.
    ///
    /// Shared by [`Self::disconnect`] (after its precondition checks) and
    /// [`Self::remove`] (tearing down every edge of a dying asset).
    fn unlink(&mut self, parent: &AssetId, child: &AssetId) {
        if let Some(asset) = self.state.entries.get_mut(parent) {
            asset.assets_used.remove(child);
        }
        if let Some(asset) = self.state.entries.get_mut(child) {
            asset.assets_used_by.remove(parent);
        }
    }

    // ---------------------------------------------------------------
    // Queries (no commit)
    // ---------------------------------------------------------------

    /// The asset record for an id.
    pub fn get(&self, id: &AssetId) -> LibraryResult<&Asset> {
        self.asset(id)
    }

    /// The asset's data as a JSON text fragment.
    pub fn get_data(&self, id: &AssetId) -> LibraryResult<String> {
        let asset = self.asset(id)?;
        serde_json::to_string(asset)
            .map_err(|e| LibraryError::Fields(TypeError::FieldCodec(e.to_string())))
    }

    /// Every id whose asset carries the given display name.
    ///
    /// Names are not unique; the result may hold any number of ids.
    pub fn get_by_name(&self, name: &str) -> BTreeSet<AssetId> {
        self.state
            .entries
            .iter()
            .filter(|(_, asset)| asset.name() == name)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Every type tag currently in use.
    pub fn get_types(&self) -> BTreeSet<TypeTag> {
        self.state.type_index.keys().cloned().collect()
    }

    /// Every asset id in the library.
    pub fn get_all(&self) -> BTreeSet<AssetId> {
        self.state.entries.keys().copied().collect()
    }

    /// Every asset id carrying the given tag.
    pub fn get_all_of_type(&self, tag: &TypeTag) -> BTreeSet<AssetId> {
        self.state.type_index.get(tag).cloned().unwrap_or_default()
    }

    fn asset(&self, id: &AssetId) -> LibraryResult<&Asset> {
        self.state
            .entries
            .get(id)
            .ok_or(LibraryError::NotFound(*id))
    }

    fn asset_mut(&mut self, id: &AssetId) -> LibraryResult<&mut Asset> {
        self.state
            .entries
            .get_mut(id)
            .ok_or(LibraryError::NotFound(*id))
    }
}
