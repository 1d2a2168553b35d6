//! Asset classification tags and their normalization rules.
//!
//! Tags arrive as free-form user input ("shot", "3d_model", "Sound!!") and
//! are normalized on construction:
//!
//! - Underscores become spaces
//! - Surrounding whitespace is trimmed
//! - The first character is upper-cased, the rest lower-cased
//! - Trailing punctuation is stripped
//! - The empty string becomes `"Undefined"`
//!
//! A normalized tag decides which typed field set an asset carries, but
//! unrecognized tags are kept verbatim: classification and field layout
//! are separate concerns, and `get_types()` reports every tag in use.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag assigned to assets created without a usable type string.
const UNDEFINED_TAG: &str = "Undefined";

/// Normalized classification tag for an asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    /// Normalize a raw tag string. See the module docs for the rules.
    pub fn new(raw: &str) -> Self {
        let spaced = raw.replace('_', " ");
        let trimmed = spaced.trim();

        let mut tag = String::with_capacity(trimmed.len());
        let mut chars = trimmed.chars();
        if let Some(first) = chars.next() {
            tag.extend(first.to_uppercase());
            tag.extend(chars.flat_map(|c| c.to_lowercase()));
        }

        while tag
            .chars()
            .last()
            .is_some_and(|c| !c.is_alphanumeric() && !c.is_whitespace())
        {
            tag.pop();
        }
        let tag = tag.trim_end().to_string();

        if tag.is_empty() {
            Self::undefined()
        } else {
            Self(tag)
        }
    }

    /// The fallback tag for assets with no recognizable type.
    pub fn undefined() -> Self {
        Self(UNDEFINED_TAG.to_string())
    }

    /// The normalized tag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
