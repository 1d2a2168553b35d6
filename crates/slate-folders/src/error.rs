use slate_types::AssetId;

/// Errors from folder store operations.
#[derive(Debug, thiserror::Error)]
pub enum FolderError {
    /// The entry folder for an id does not exist.
    #[error("no entry folder for asset {0}")]
    EntryNotFound(AssetId),

    /// Archiving was attempted on an entry folder with no content.
    #[error("entry folder for asset {0} is empty and cannot be archived")]
    EmptyFolder(AssetId),

    /// An archive file for the id already exists.
    #[error("archive for asset {0} already exists")]
    ArchiveCollision(AssetId),

    /// A live entry folder blocks unpacking the archive.
    #[error("entry folder for asset {0} already exists and blocks unpacking")]
    EntryCollision(AssetId),

    /// No archive file exists for the id.
    #[error("no archive for asset {0}")]
    ArchiveNotFound(AssetId),

    /// I/O failure from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FolderError {
    /// `true` for structural refusals raised before anything is changed
    /// (missing entries, collisions, empty folders); `false` for storage
    /// failures.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Result alias for folder store operations.
pub type FolderResult<T> = Result<T, FolderError>;
