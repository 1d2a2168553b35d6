//! The aggregate root: asset records plus the derived type index.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use slate_types::{Asset, AssetId, TypeTag};

/// Every asset record in the library plus the derived type index.
///
/// The index is a cached partition of `entries` by tag and carries no
/// information of its own: for every tag `T` it must hold exactly the ids
/// whose asset carries `T`. Emptied index sets are pruned. Ordered maps
/// and sets keep the serialized snapshot deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryData {
    /// All assets, keyed by id.
    pub entries: BTreeMap<AssetId, Asset>,
    /// Derived index: tag → ids carrying that tag.
    pub type_index: BTreeMap<TypeTag, BTreeSet<AssetId>>,
}

impl LibraryData {
    /// Number of assets in the library.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the library holds no assets.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an asset under `id` and index it by tag.
    pub(crate) fn insert(&mut self, id: AssetId, asset: Asset) {
        self.type_index
            .entry(asset.asset_type().clone())
            .or_default()
            .insert(id);
        self.entries.insert(id, asset);
    }

    /// Remove an asset and its index entry, pruning an emptied index set.
    pub(crate) fn remove(&mut self, id: &AssetId) -> Option<Asset> {
        let asset = self.entries.remove(id)?;
        let emptied = match self.type_index.get_mut(asset.asset_type()) {
            Some(ids) => {
                ids.remove(id);
                ids.is_empty()
            }
            None => false,
        };
        if emptied {
            self.type_index.remove(asset.asset_type());
        }
        Some(asset)
    }

    /// Validate the structural invariants: edge symmetry, no self-edges,
    /// resolvable edge targets, and index correctness in both directions.
    ///
    /// Intended for tests and debug assertions; the operations in
    /// [`crate::AssetLibrary`] maintain these incrementally.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (id, asset) in &self.entries {
            if asset.assets_used.contains(id) || asset.assets_used_by.contains(id) {
                return Err(format!("asset {id} has an edge to itself"));
            }
            for child in &asset.assets_used {
                let Some(child_asset) = self.entries.get(child) else {
                    return Err(format!("asset {id} uses unknown asset {child}"));
                };
                if !child_asset.assets_used_by.contains(id) {
                    return Err(format!("edge {id} -> {child} is missing its back half"));
                }
            }
            for parent in &asset.assets_used_by {
                let Some(parent_asset) = self.entries.get(parent) else {
                    return Err(format!("asset {id} is used by unknown asset {parent}"));
                };
                if !parent_asset.assets_used.contains(id) {
                    return Err(format!("edge {parent} -> {id} is missing its forward half"));
                }
            }
        }

        for (tag, ids) in &self.type_index {
            if ids.is_empty() {
                return Err(format!("type index keeps an empty set for tag {tag}"));
            }
            for id in ids {
                match self.entries.get(id) {
                    Some(asset) if asset.asset_type() == tag => {}
                    Some(_) => return Err(format!("index lists {id} under wrong tag {tag}")),
                    None => return Err(format!("index lists unknown id {id} under tag {tag}")),
                }
            }
        }
        for (id, asset) in &self.entries {
            let indexed = self
                .type_index
                .get(asset.asset_type())
                .is_some_and(|ids| ids.contains(id));
            if !indexed {
                return Err(format!("asset {id} is missing from the type index"));
            }
        }

        Ok(())
    }
}
