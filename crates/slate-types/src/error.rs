/// Errors from foundation type construction and field merging.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// The string is not a valid asset id.
    #[error("invalid asset id: {0}")]
    InvalidId(String),

    /// A field fragment was not a JSON object.
    #[error("field fragment must be a JSON object, got {0}")]
    FragmentNotObject(&'static str),

    /// A recognized field received a value of the wrong shape.
    #[error("field {field:?} rejected value: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    /// Encode/decode failure while rebuilding an asset's variant fields.
    #[error("field encoding error: {0}")]
    FieldCodec(String),
}

/// Result alias for foundation type operations.
pub type TypeResult<T> = Result<T, TypeError>;
