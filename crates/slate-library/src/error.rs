use slate_folders::FolderError;
use slate_snapshot::SnapshotError;
use slate_types::{AssetId, TypeError};

/// Errors from asset library operations.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// The id does not resolve to a known asset.
    #[error("unknown asset: {0}")]
    NotFound(AssetId),

    /// An asset cannot be connected to itself.
    #[error("asset {0} cannot use itself")]
    SelfConnection(AssetId),

    /// Edge or data change attempted against an archived asset.
    #[error("asset {0} is archived and cannot be modified")]
    ArchivedMutation(AssetId),

    /// Removal blocked because an archived asset's edges reference this one.
    #[error("asset {asset} cannot be removed: archived asset {dependent} references it")]
    ArchivedDependency { asset: AssetId, dependent: AssetId },

    /// Archiving an asset that is already archived.
    #[error("asset {0} is already archived")]
    AlreadyArchived(AssetId),

    /// Unpacking an asset that is not archived.
    #[error("asset {0} is not archived")]
    NotArchived(AssetId),

    /// Disconnecting an edge that does not exist.
    #[error("no edge from {parent} to {child}")]
    EdgeNotFound { parent: AssetId, child: AssetId },

    /// A rejected data fragment (wrong shape or ill-typed field value).
    #[error(transparent)]
    Fields(#[from] TypeError),

    /// Failure in the folder layer.
    #[error(transparent)]
    Folder(#[from] FolderError),

    /// Failure persisting or reading the snapshot.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl LibraryError {
    /// `true` for precondition violations, which are detected before any
    /// mutation and may be downgraded by [`FaultMode::Lenient`]; `false`
    /// for storage failures, which are always fatal.
    ///
    /// [`FaultMode::Lenient`]: crate::config::FaultMode::Lenient
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::NotFound(_)
            | Self::SelfConnection(_)
            | Self::ArchivedMutation(_)
            | Self::ArchivedDependency { .. }
            | Self::AlreadyArchived(_)
            | Self::NotArchived(_)
            | Self::EdgeNotFound { .. }
            | Self::Fields(_) => true,
            Self::Folder(err) => err.is_structural(),
            Self::Snapshot(_) => false,
        }
    }
}

/// Result alias for library operations.
pub type LibraryResult<T> = Result<T, LibraryError>;
