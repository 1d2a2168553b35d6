//! Foundation types for the Slate asset library.
//!
//! This crate provides the identity, classification, and record types used
//! throughout Slate. Every other Slate crate depends on `slate-types`.
//!
//! # Key Types
//!
//! - [`AssetId`] — Random UUID identity for an asset; doubles as its folder name
//! - [`TypeTag`] — Normalized classification tag ("Shot", "Sound", ...)
//! - [`Asset`] — One asset record: name, tag, graph edges, archive flag, and
//!   the tag-selected variant fields
//! - [`TypedFields`] — The variant field sets (Shot/Sound/Model) with a
//!   Generic fallback for unrecognized tags

pub mod asset;
pub mod error;
pub mod id;
pub mod tag;

pub use asset::{Asset, ModelFields, ShotFields, SoundFields, TypedFields};
pub use error::{TypeError, TypeResult};
pub use id::AssetId;
pub use tag::TypeTag;
