//! The asset record and its tag-selected variant fields.
//!
//! An [`Asset`] carries the fields every asset shares (name, tag, graph
//! edges, archive flag) plus a variant field set chosen by its [`TypeTag`]:
//! shots have clip numbers and lengths, sounds have durations and bitrates,
//! models have mesh counts. Unrecognized tags carry no variant fields but
//! keep their tag.
//!
//! On the wire the variant fields are flattened into the asset object next
//! to the common fields, with `asset_type` as the discriminator. Decoding
//! consults the discriminator, never the JSON shape, so an asset tagged
//! `"Shot"` always decodes as a shot, and a tag nobody registered decodes
//! as Generic with the tag preserved.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TypeError;
use crate::id::AssetId;
use crate::tag::TypeTag;

/// Variant fields for a shot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotFields {
    /// Clip number within the edit; -1 until assigned.
    #[serde(default = "default_clip_number")]
    pub clip_number: i64,
    /// Running length of the shot.
    #[serde(default = "midnight")]
    pub length: NaiveTime,
    #[serde(default)]
    pub characters: BTreeSet<String>,
    #[serde(default)]
    pub environments: BTreeSet<String>,
}

impl Default for ShotFields {
    fn default() -> Self {
        Self {
            clip_number: default_clip_number(),
            length: midnight(),
            characters: BTreeSet::new(),
            environments: BTreeSet::new(),
        }
    }
}

/// Variant fields for a sound asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundFields {
    #[serde(default = "midnight")]
    pub duration: NaiveTime,
    #[serde(default)]
    pub format: String,
    #[serde(default = "default_bitrate")]
    pub bitrate: u32,
}

impl Default for SoundFields {
    fn default() -> Self {
        Self {
            duration: midnight(),
            format: String::new(),
            bitrate: default_bitrate(),
        }
    }
}

/// Variant fields for a 3D model asset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFields {
    #[serde(default)]
    pub vertices: u64,
    #[serde(default)]
    pub faces: u64,
}

fn default_clip_number() -> i64 {
    -1
}

fn default_bitrate() -> u32 {
    128
}

fn midnight() -> NaiveTime {
    NaiveTime::MIN
}

/// The typed field set selected by an asset's tag.
///
/// The library never interprets these fields; it only encodes and decodes
/// them. New variants are registered by adding an arm here and in
/// [`TypedFields::for_tag`] / [`TypedFields::from_map`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedFields {
    /// No variant fields; used for every unrecognized tag.
    Generic,
    Shot(ShotFields),
    Sound(SoundFields),
    Model(ModelFields),
}

impl TypedFields {
    /// Default field set for a tag. Unrecognized tags get [`Self::Generic`].
    pub fn for_tag(tag: &TypeTag) -> Self {
        match tag.as_str() {
            "Shot" => Self::Shot(ShotFields::default()),
            "Sound" => Self::Sound(SoundFields::default()),
            "Model" => Self::Model(ModelFields::default()),
            _ => Self::Generic,
        }
    }

    /// Decode variant fields from a JSON object by consulting the tag.
    ///
    /// Missing fields take their defaults and extra keys are ignored, but a
    /// present field with a value of the wrong shape is an error.
    fn from_map(tag: &TypeTag, map: Map<String, Value>) -> Result<Self, TypeError> {
        let value = Value::Object(map);
        let codec = |e: serde_json::Error| TypeError::FieldCodec(e.to_string());
        let fields = match tag.as_str() {
            "Shot" => Self::Shot(serde_json::from_value(value).map_err(codec)?),
            "Sound" => Self::Sound(serde_json::from_value(value).map_err(codec)?),
            "Model" => Self::Model(serde_json::from_value(value).map_err(codec)?),
            _ => Self::Generic,
        };
        Ok(fields)
    }

    /// Encode the variant fields as a JSON object (empty for Generic).
    fn to_map(&self) -> Result<Map<String, Value>, TypeError> {
        let value = match self {
            Self::Generic => Value::Object(Map::new()),
            Self::Shot(f) => serde_json::to_value(f)
                .map_err(|e| TypeError::FieldCodec(e.to_string()))?,
            Self::Sound(f) => serde_json::to_value(f)
                .map_err(|e| TypeError::FieldCodec(e.to_string()))?,
            Self::Model(f) => serde_json::to_value(f)
                .map_err(|e| TypeError::FieldCodec(e.to_string()))?,
        };
        match value {
            Value::Object(map) => Ok(map),
            other => Err(TypeError::FieldCodec(format!(
                "variant fields encoded as {} instead of an object",
                json_kind(&other)
            ))),
        }
    }
}

/// Keys `merge_fields` refuses to touch: graph edges, archive state, and
/// the immutable discriminator. `id` is listed for callers that echo back
/// a full asset object; the id never lives inside the record.
const PROTECTED_KEYS: &[&str] = &["asset_type", "assets_used", "assets_used_by", "archived", "id"];

/// A single asset record.
///
/// The asset's id is not stored in the record; it lives once, as the key of
/// the owning entries map, and as the folder name on disk. The edge sets
/// are public because the graph store maintains them as paired halves of
/// one connect/disconnect operation; nothing else should write to them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    name: String,
    asset_type: TypeTag,
    /// Ids this asset depends on (forward edges).
    pub assets_used: BTreeSet<AssetId>,
    /// Ids that depend on this asset (back edges).
    pub assets_used_by: BTreeSet<AssetId>,
    /// Whether the asset's files live in an archive instead of a folder.
    pub archived: bool,
    fields: TypedFields,
}

impl Asset {
    /// Construct a new asset with the default fields for its tag.
    pub fn new(name: impl Into<String>, asset_type: TypeTag) -> Self {
        let fields = TypedFields::for_tag(&asset_type);
        Self {
            name: name.into(),
            asset_type,
            assets_used: BTreeSet::new(),
            assets_used_by: BTreeSet::new(),
            archived: false,
            fields,
        }
    }

    /// Display name. Mutable through [`Self::merge_fields`], not unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classification tag; immutable after creation.
    pub fn asset_type(&self) -> &TypeTag {
        &self.asset_type
    }

    /// The variant fields for this asset's tag.
    pub fn fields(&self) -> &TypedFields {
        &self.fields
    }

    /// Merge a JSON object fragment into the asset's mutable data fields.
    ///
    /// Only `name` and the variant fields for this asset's tag are
    /// recognized. Unknown keys are ignored (never create new fields) and
    /// protected keys (edges, the archive flag, the tag) are skipped.
    /// A recognized field holding a value of the wrong shape is rejected
    /// and the asset is left untouched.
    pub fn merge_fields(&mut self, fragment: &Value) -> Result<(), TypeError> {
        let Value::Object(patch) = fragment else {
            return Err(TypeError::FragmentNotObject(json_kind(fragment)));
        };

        let mut staged = self.fields.to_map()?;
        let mut fields_touched = false;
        let mut new_name = None;

        for (key, value) in patch {
            if PROTECTED_KEYS.contains(&key.as_str()) {
                continue;
            }
            if key == "name" {
                match value {
                    Value::String(s) => new_name = Some(s.clone()),
                    other => {
                        return Err(TypeError::InvalidFieldValue {
                            field: "name".to_string(),
                            reason: format!("expected a string, got {}", json_kind(other)),
                        })
                    }
                }
                continue;
            }
            if staged.contains_key(key.as_str()) {
                staged.insert(key.clone(), value.clone());
                fields_touched = true;
            }
        }

        // Rebuild from the staged map before writing anything back, so a
        // fragment with an ill-typed value leaves the asset unchanged.
        if fields_touched {
            self.fields = TypedFields::from_map(&self.asset_type, staged)?;
        }
        if let Some(name) = new_name {
            self.name = name;
        }
        Ok(())
    }
}

/// Wire representation: common fields plus the variant fields flattened
/// alongside them.
#[derive(Serialize, Deserialize)]
struct AssetRepr {
    name: String,
    asset_type: TypeTag,
    #[serde(default)]
    assets_used: BTreeSet<AssetId>,
    #[serde(default)]
    assets_used_by: BTreeSet<AssetId>,
    #[serde(default)]
    archived: bool,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Serialize for Asset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let extra = self.fields.to_map().map_err(serde::ser::Error::custom)?;
        AssetRepr {
            name: self.name.clone(),
            asset_type: self.asset_type.clone(),
            assets_used: self.assets_used.clone(),
            assets_used_by: self.assets_used_by.clone(),
            archived: self.archived,
            extra,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = AssetRepr::deserialize(deserializer)?;
        let fields =
            TypedFields::from_map(&repr.asset_type, repr.extra).map_err(serde::de::Error::custom)?;
        Ok(Self {
            name: repr.name,
            asset_type: repr.asset_type,
            assets_used: repr.assets_used,
            assets_used_by: repr.assets_used_by,
            archived: repr.archived,
            fields,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
