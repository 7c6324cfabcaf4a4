//! Ontology-driven validation of VisionAI annotation documents.
//!
//! A VisionAI document describes a recorded multi-sensor sequence frame by frame: objects and
//! contexts, their static and per-frame attributes, the data pointers that summarize where each
//! attribute lives, sensor streams, and run-length encoded segmentation masks. This crate checks
//! such a document for internal consistency and against a project ontology.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: JSON -> [`Document`] (typed model plus structural shape checks) and
//!    JSON -> [`Ontology`].
//! 2. **Compile**: [`Ontology`] -> [`OntologyIndex`] (normalized class/attribute/value lookup,
//!    sensor roster, tag vocabulary).
//! 3. **Validate**: [`Validator::validate`] runs the section validators and returns a
//!    [`ValidationReport`].
//!
//! Data problems never surface as `Err`: they are collected as [`ValidationError`] values.
//! [`VaiError`] is reserved for inputs the engine cannot work with.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No IO in validators**: files are read up front by `from_path` constructors.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod document;
mod foundation;
mod interval;
mod ontology;
mod validate;

pub use document::decode::{Document, SCHEMA_VERSION};
pub use document::model::{
    CoordinateSystemDef, CoordinateSystemKind, DataElement, DataKind, DataPointerDef,
    ElementData, Entity, EntityKind, Frame, FrameEntity, FrameIntervalDef, FrameProperties,
    FrameStreamDef, IntrinsicsPinhole, Metadata, StreamDef, StreamProperties, TagData, TagDef,
    TagVec, VisionAi, VisionAiFile,
};
pub use foundation::core::{FRAME_KEY_DIGITS, FrameKey};
pub use foundation::error::{VaiError, VaiResult};
pub use foundation::label::{normalize_label, normalize_value};
pub use interval::set::{
    FrameInterval, IntervalError, IntervalSet, contains, declared_ranges, merge, uncontained,
};
pub use ontology::index::{
    AttrKey, ClassAttributes, OntologyIndex, OntologyRoot, SEGMENTATION_MATRIX_CLASS,
};
pub use ontology::model::{
    AttributeDecl, AttributeDecls, AttributeKind, ClassMap, ClassSpec, Ontology, SensorType,
    StreamSpec, TagClassList, TagsSpec,
};
pub use validate::attributes::{UsedAttributes, collect_used_attributes, reconcile};
pub use validate::mask::{MaskError, RleRun, parse_rle, validate_mask};
pub use validate::options::{MaskAreaSource, UnresolvedTagPolicy, ValidateOptions};
pub use validate::orchestrator::{Validator, validate};
pub use validate::pointers::{validate_document_frames, validate_entity_pointers};
pub use validate::report::{ErrorKind, Section, ValidationError, ValidationReport};
pub use validate::streams::{
    LOCAL_CS_MARKER, validate_coordinate_systems, validate_frame_sensor_refs, validate_streams,
};
pub use validate::tags::{
    SEGMENTATION_TAG_TYPE, TagVocabulary, VOCABULARY_VEC_TYPE, resolve_tag_vocabulary,
};
