use serde::{Deserialize, Serialize};

/// How mutating operations surface precondition violations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultMode {
    /// Precondition violations are hard errors returned to the caller.
    #[default]
    Strict,
    /// Precondition violations are logged at `warn` level and swallowed;
    /// the operation reports success without mutating anything. Storage
    /// failures are fatal in both modes.
    Lenient,
}

/// Configuration for one `AssetLibrary` instance.
///
/// Constructed by the embedding process and passed explicitly to
/// `AssetLibrary::open`. There is no global library and no implicit
/// default instance.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Fault handling for precondition violations.
    pub fault_mode: FaultMode,
    /// Fire the folder store's reveal hook after each create.
    pub reveal_on_create: bool,
}
