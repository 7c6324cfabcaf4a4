use std::fmt;

use serde::Serialize;

/// Validation stage an error was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Stream and coordinate-system roster checks (hard gate).
    Streams,
    /// Document frame intervals vs frame keys.
    Frames,
    /// Non-tagging contexts.
    Contexts,
    /// Objects, including masks.
    Objects,
    /// `*tagging` contexts.
    Taggings,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Streams => "streams",
            Self::Frames => "frames",
            Self::Contexts => "contexts",
            Self::Objects => "objects",
            Self::Taggings => "taggings",
        })
    }
}

/// What went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ErrorKind {
    /// `start > end` or a negative bound.
    MalformedInterval,
    /// An interval list that must not be empty is.
    EmptyIntervalInput,
    /// Repeated or overlapping declared ranges.
    DuplicateInterval,
    /// A data pointer covers frames outside its entity's lifetime.
    PointerOutsideEntityLifetime,
    /// Dynamic values exist on frames the pointer does not declare.
    DynamicUsageOutsidePointer,
    /// An entity interval leaves the document's first..last frame span.
    FrameOutOfDocumentRange,
    /// An entity interval crosses a gap in the document frames.
    EntityFrameGap,
    /// Document frame intervals and frame keys disagree.
    DocumentFrameMismatch,
    /// Entity class not declared in the ontology.
    UnknownClass,
    /// Frame data for an entity id not declared at document level.
    UnknownEntity,
    /// Attribute not declared for the class.
    ExtraAttribute,
    /// A required attribute is absent.
    MissingAttribute,
    /// Option value outside the declared values.
    DisallowedOptionValue,
    /// `vec` values and their `probability` vector differ in length.
    ProbabilityLengthMismatch,
    /// Data pointer without matching data.
    ExtraInDataPointer,
    /// Data without a matching data pointer.
    MissingFromDataPointer,
    /// Data kind differs from the pointer's declared type.
    PointerTypeMismatch,
    /// Stream type differs from the ontology roster.
    SensorTypeMismatch,
    /// Stream not on the ontology roster.
    ExtraSensor,
    /// Coordinate system naming a sensor not on the roster.
    ExtraCoordinateSensor,
    /// `local_cs` name without the vehicle-frame marker.
    InvalidLocalCoordinateSystemName,
    /// Coordinate systems required but absent.
    MissingCoordinateSystems,
    /// Object data name outside the configured set.
    DisallowedDataName,
    /// RLE text that does not parse.
    MalformedMask,
    /// RLE class index outside the vocabulary.
    ClassIndexOutOfRange,
    /// RLE mask checked against an empty vocabulary.
    EmptyVocabulary,
    /// RLE pixel total differs from the image area.
    PixelCountMismatch,
    /// The document's tag vocabulary could not be resolved.
    TagVocabularyUnresolved,
    /// The document declares no streams; nothing else is checked.
    MissingStreams,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One collected validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Section that produced the error.
    pub section: Section,
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl ValidationError {
    /// Build an error.
    pub fn new(section: Section, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            section,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.section, self.kind, self.message)
    }
}

/// Result of validating one document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Collected errors in the order they were found.
    pub errors: Vec<ValidationError>,
    /// Sections that ran, in order.
    pub sections_run: Vec<Section>,
    /// Whether the run stopped at the streams gate.
    pub aborted: bool,
}

impl ValidationReport {
    /// `true` when no error was collected.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Rendered error strings.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Errors of one kind.
    pub fn errors_of(&self, kind: ErrorKind) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// Whether any error of `kind` was collected.
    pub fn has(&self, kind: ErrorKind) -> bool {
        self.errors_of(kind).next().is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/validate/report.rs"]
mod tests;
