use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::core::FrameKey;
use crate::ontology::model::{AttributeKind, SensorType};

/// Top-level VisionAI file: `{"visionai": {...}}`.
#[derive(Clone, Debug, Deserialize)]
pub struct VisionAiFile {
    /// Document body.
    pub visionai: VisionAi,
}

/// Body of a VisionAI annotation document.
#[derive(Clone, Debug, Deserialize)]
pub struct VisionAi {
    /// Declared document frame ranges.
    #[serde(default)]
    pub frame_intervals: Vec<FrameIntervalDef>,
    /// Per-frame data, keyed by 12-digit frame key.
    #[serde(default)]
    pub frames: BTreeMap<FrameKey, Frame>,
    /// Objects keyed by id.
    #[serde(default)]
    pub objects: Option<BTreeMap<String, Entity>>,
    /// Contexts keyed by id.
    #[serde(default)]
    pub contexts: Option<BTreeMap<String, Entity>>,
    /// Sensor streams keyed by name.
    #[serde(default)]
    pub streams: Option<BTreeMap<String, StreamDef>>,
    /// Coordinate systems keyed by name.
    #[serde(default)]
    pub coordinate_systems: Option<BTreeMap<String, CoordinateSystemDef>>,
    /// Sequence-level tags keyed by id.
    #[serde(default)]
    pub tags: Option<BTreeMap<String, TagDef>>,
    /// Document metadata.
    pub metadata: Metadata,
}

/// Which entity collection a lookup targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `objects`.
    Object,
    /// `contexts`.
    Context,
}

impl VisionAi {
    /// Document-level entities of `kind`.
    pub fn entities(&self, kind: EntityKind) -> Option<&BTreeMap<String, Entity>> {
        match kind {
            EntityKind::Object => self.objects.as_ref(),
            EntityKind::Context => self.contexts.as_ref(),
        }
    }

    /// Frame numbers present in `frames`.
    pub fn frame_numbers(&self) -> impl Iterator<Item = u64> + '_ {
        self.frames.keys().map(|k| k.number())
    }
}

/// Document metadata.
#[derive(Clone, Debug, Deserialize)]
pub struct Metadata {
    /// Schema version string (`"1.0.0"`).
    pub schema_version: String,
}

/// Raw `{frame_start, frame_end}` pair, bounds not yet checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameIntervalDef {
    /// First frame.
    pub frame_start: i64,
    /// Last frame (inclusive).
    pub frame_end: i64,
}

impl FrameIntervalDef {
    /// `(start, end)` tuple.
    pub fn bounds(self) -> (i64, i64) {
        (self.frame_start, self.frame_end)
    }
}

/// Key of an element-data map.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// 2D box `[x, y, w, h]`.
    Bbox,
    /// 3D box.
    Cuboid,
    /// 2D point `[x, y]`.
    Point2d,
    /// 2D polygon.
    Poly2d,
    /// Encoded image.
    Image,
    /// Matrix.
    Mat,
    /// Encoded binary payload (RLE masks).
    Binary,
    /// Boolean attribute.
    Boolean,
    /// Numeric attribute.
    #[serde(rename = "num", alias = "number")]
    Num,
    /// Categorical attribute.
    Vec,
    /// Free-text attribute.
    Text,
}

impl DataKind {
    /// Ontology type this kind carries, for attribute kinds only.
    pub fn attribute_kind(self) -> Option<AttributeKind> {
        match self {
            Self::Boolean => Some(AttributeKind::Boolean),
            Self::Num => Some(AttributeKind::Number),
            Self::Text => Some(AttributeKind::Text),
            Self::Vec => Some(AttributeKind::Option),
            _ => None,
        }
    }

    /// Whether elements of this kind describe geometry rather than an attribute.
    pub fn is_geometry(self) -> bool {
        self.attribute_kind().is_none()
    }

    /// Name as written in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bbox => "bbox",
            Self::Cuboid => "cuboid",
            Self::Point2d => "point2d",
            Self::Poly2d => "poly2d",
            Self::Image => "image",
            Self::Mat => "mat",
            Self::Binary => "binary",
            Self::Boolean => "boolean",
            Self::Num => "num",
            Self::Vec => "vec",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `kind -> elements` map used by static data, frame data and nested geometry attributes.
pub type ElementData = BTreeMap<DataKind, Vec<DataElement>>;

/// One named data element.
#[derive(Clone, Debug, Deserialize)]
pub struct DataElement {
    /// Element (attribute or geometry) name.
    pub name: String,
    /// Payload.
    #[serde(default)]
    pub val: serde_json::Value,
    /// Sensor stream the element was annotated on.
    #[serde(default)]
    pub stream: Option<String>,
    /// Coordinate system the payload is expressed in.
    #[serde(default)]
    pub coordinate_system: Option<String>,
    /// Payload encoding of `binary` elements (`rle` for masks).
    #[serde(default)]
    pub encoding: Option<String>,
    /// Nested attributes (per-geometry attributes, or a `probability` vector on `vec`).
    #[serde(default)]
    pub attributes: ElementData,
}

impl DataElement {
    /// Nested `vec` element named `probability`, if any.
    pub fn probability(&self) -> Option<&DataElement> {
        self.attributes
            .get(&DataKind::Vec)?
            .iter()
            .find(|e| e.name == "probability")
    }
}

/// Object or context declared at document level.
#[derive(Clone, Debug, Deserialize)]
pub struct Entity {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Ontology class.
    #[serde(rename = "type")]
    pub class: String,
    /// Existence window.
    #[serde(default)]
    pub frame_intervals: Vec<FrameIntervalDef>,
    /// Static attributes (`object_data` / `context_data`).
    #[serde(default, rename = "object_data", alias = "context_data")]
    pub static_data: ElementData,
    /// Data pointers keyed by attribute name (`object_data_pointers` / `context_data_pointers`).
    #[serde(
        default,
        rename = "object_data_pointers",
        alias = "context_data_pointers"
    )]
    pub data_pointers: BTreeMap<String, DataPointerDef>,
}

/// Self-declared summary of one attribute of an entity.
#[derive(Clone, Debug, Deserialize)]
pub struct DataPointerDef {
    /// Data kind of the attribute.
    #[serde(rename = "type")]
    pub kind: DataKind,
    /// Frames where the attribute has dynamic values. Empty for static-only data.
    #[serde(default)]
    pub frame_intervals: Vec<FrameIntervalDef>,
    /// Nested attribute names and kinds of a geometry pointer.
    #[serde(default)]
    pub attributes: Option<BTreeMap<String, DataKind>>,
}

/// One frame.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Frame {
    /// Objects present in this frame.
    #[serde(default)]
    pub objects: BTreeMap<String, FrameEntity>,
    /// Contexts present in this frame.
    #[serde(default)]
    pub contexts: BTreeMap<String, FrameEntity>,
    /// Per-sensor stream metadata.
    #[serde(default)]
    pub frame_properties: Option<FrameProperties>,
}

impl Frame {
    /// Frame-local entities of `kind`.
    pub fn entities(&self, kind: EntityKind) -> &BTreeMap<String, FrameEntity> {
        match kind {
            EntityKind::Object => &self.objects,
            EntityKind::Context => &self.contexts,
        }
    }
}

/// An entity's frame-local data.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FrameEntity {
    /// Dynamic data (`object_data` / `context_data`).
    #[serde(default, rename = "object_data", alias = "context_data")]
    pub dynamic_data: ElementData,
}

/// Frame-level sensor metadata.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FrameProperties {
    /// Frame timestamp, kept as written.
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
    /// Sensor name -> per-frame stream info.
    #[serde(default)]
    pub streams: BTreeMap<String, FrameStreamDef>,
}

/// Per-frame stream info.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FrameStreamDef {
    /// Location of the raw sensor data.
    #[serde(default)]
    pub uri: Option<String>,
}

/// Document-level sensor stream declaration.
#[derive(Clone, Debug, Deserialize)]
pub struct StreamDef {
    /// Sensor category.
    #[serde(rename = "type")]
    pub sensor: SensorType,
    /// Location of the raw data.
    #[serde(default)]
    pub uri: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Sensor properties.
    #[serde(default)]
    pub stream_properties: Option<StreamProperties>,
}

impl StreamDef {
    /// Image area in pixels from the pinhole intrinsics, if declared.
    pub fn image_area(&self) -> Option<u64> {
        let p = self.stream_properties.as_ref()?.intrinsics_pinhole.as_ref()?;
        p.width_px.checked_mul(p.height_px)
    }
}

/// Sensor properties of a stream.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StreamProperties {
    /// Camera pinhole intrinsics.
    #[serde(default)]
    pub intrinsics_pinhole: Option<IntrinsicsPinhole>,
}

/// Pinhole camera intrinsics (image size only).
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct IntrinsicsPinhole {
    /// Image width.
    pub width_px: u64,
    /// Image height.
    pub height_px: u64,
}

/// Coordinate system category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystemKind {
    /// Attached to a sensor.
    SensorCs,
    /// Vehicle or world frame.
    LocalCs,
}

/// Coordinate system declaration.
#[derive(Clone, Debug, Deserialize)]
pub struct CoordinateSystemDef {
    /// Category.
    #[serde(rename = "type")]
    pub kind: CoordinateSystemKind,
    /// Parent coordinate system (empty for a root).
    #[serde(default)]
    pub parent: String,
    /// Child coordinate systems.
    #[serde(default)]
    pub children: Vec<String>,
}

/// Sequence-level tag.
#[derive(Clone, Debug, Deserialize)]
pub struct TagDef {
    /// Ontology reference.
    #[serde(default)]
    pub ontology_uid: Option<String>,
    /// Tag type, e.g. `semantic_segmentation_RLE`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Payload.
    #[serde(default)]
    pub tag_data: TagData,
}

/// Tag payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TagData {
    /// Vector entries; a segmentation tag has exactly one, of subtype `values`.
    #[serde(default)]
    pub vec: Vec<TagVec>,
}

/// One tag vector.
#[derive(Clone, Debug, Deserialize)]
pub struct TagVec {
    /// Vector subtype (`values`).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Vector values.
    #[serde(default)]
    pub val: Vec<serde_json::Value>,
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
