use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::document::model::{DataElement, DataKind, ElementData, Entity, VisionAi, VisionAiFile};
use crate::foundation::error::{VaiError, VaiResult};

/// Schema version accepted by the structural decode.
pub const SCHEMA_VERSION: &str = "1.0.0";

// Shape problems, each prefixed with the JSON path it was found at (`$.objects["o1"].data`).
#[derive(Debug, Default)]
struct ShapeErrors {
    path: String,
    errors: Vec<String>,
}

impl ShapeErrors {
    fn report(&mut self, message: impl fmt::Display) {
        self.errors.push(format!("${}: {message}", self.path));
    }

    fn within(&mut self, segment: &str, check: impl FnOnce(&mut Self)) {
        let len = self.path.len();
        self.path.push_str(segment);
        check(self);
        self.path.truncate(len);
    }

    fn into_result(self) -> Result<(), String> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.join("\n"))
        }
    }
}

fn key(k: &str) -> String {
    format!("[\"{k}\"]")
}

/// Structurally decoded VisionAI document.
///
/// Construction parses JSON into the typed model and then checks element shapes (geometry
/// arity, attribute payload types, schema version). Anything that gets this far is safe for the
/// validators to walk without further shape checks.
#[derive(Clone, Debug)]
pub struct Document {
    file: VisionAiFile,
}

impl Document {
    /// Decode a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> VaiResult<Self> {
        let file: VisionAiFile = serde_json::from_reader(r)
            .map_err(|e| VaiError::serde(format!("parse VisionAI JSON: {e}")))?;
        Self::from_file(file)
    }

    /// Decode a document from a JSON string.
    pub fn from_json_str(s: &str) -> VaiResult<Self> {
        let file: VisionAiFile = serde_json::from_str(s)
            .map_err(|e| VaiError::serde(format!("parse VisionAI JSON: {e}")))?;
        Self::from_file(file)
    }

    /// Decode a document from an already parsed JSON value.
    pub fn from_value(v: serde_json::Value) -> VaiResult<Self> {
        let file: VisionAiFile = serde_json::from_value(v)
            .map_err(|e| VaiError::serde(format!("parse VisionAI JSON: {e}")))?;
        Self::from_file(file)
    }

    /// Decode a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VaiResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            VaiError::serde(format!("open VisionAI JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    fn from_file(file: VisionAiFile) -> VaiResult<Self> {
        validate_shape(&file.visionai)
            .map_err(|e| VaiError::schema(format!("VisionAI structural check failed: {e}")))?;
        Ok(Self { file })
    }

    /// Document body.
    pub fn visionai(&self) -> &VisionAi {
        &self.file.visionai
    }
}

pub(crate) fn validate_shape(doc: &VisionAi) -> Result<(), String> {
    let mut errs = ShapeErrors::default();

    if doc.metadata.schema_version != SCHEMA_VERSION {
        errs.within(".metadata.schema_version", |e| {
            e.report(format_args!("schema_version must be \"{SCHEMA_VERSION}\""))
        });
    }

    for (field, entities) in [(".objects", &doc.objects), (".contexts", &doc.contexts)] {
        let Some(entities) = entities else { continue };
        errs.within(field, |e| {
            for (id, entity) in entities {
                e.within(&key(id), |e| check_entity(entity, e));
            }
        });
    }

    for (frame_key, frame) in &doc.frames {
        errs.within(&format!(".frames{}", key(&frame_key.to_string())), |e| {
            let sections = [(".objects", &frame.objects), (".contexts", &frame.contexts)];
            for (field, entities) in sections {
                for (id, fe) in entities {
                    e.within(&format!("{field}{}.data", key(id)), |e| {
                        check_element_data(&fe.dynamic_data, e)
                    });
                }
            }
        });
    }

    errs.into_result()
}

fn check_entity(entity: &Entity, errs: &mut ShapeErrors) {
    if entity.class.trim().is_empty() {
        errs.report("type must be a non-empty class name");
    }
    errs.within(".data", |e| check_element_data(&entity.static_data, e));
}

fn check_element_data(data: &ElementData, errs: &mut ShapeErrors) {
    for (kind, elements) in data {
        for (i, el) in elements.iter().enumerate() {
            errs.within(&format!(".{kind}[{i}]"), |e| {
                check_element(*kind, el, e);
                if !el.attributes.is_empty() {
                    e.within(".attributes", |e| check_element_data(&el.attributes, e));
                }
            });
        }
    }
}

fn check_element(kind: DataKind, el: &DataElement, errs: &mut ShapeErrors) {
    use serde_json::Value;

    if el.name.is_empty() {
        errs.report("name must be non-empty");
    }

    let numbers = |v: &Value| -> Option<usize> {
        let items = v.as_array()?;
        items.iter().all(Value::is_number).then_some(items.len())
    };

    let problem = match kind {
        DataKind::Bbox => (numbers(&el.val) != Some(4)).then_some("bbox val must be 4 numbers"),
        DataKind::Point2d => {
            (numbers(&el.val) != Some(2)).then_some("point2d val must be 2 numbers")
        }
        DataKind::Poly2d => match numbers(&el.val) {
            Some(n) if n >= 2 && n % 2 == 0 => None,
            _ => Some("poly2d val must be an even, non-zero count of numbers"),
        },
        DataKind::Cuboid => match numbers(&el.val) {
            Some(9 | 10) => None,
            _ => Some("cuboid val must be 9 or 10 numbers"),
        },
        DataKind::Binary | DataKind::Image => {
            (!el.val.is_string()).then_some("val must be an encoded string")
        }
        DataKind::Mat => (!el.val.is_array()).then_some("mat val must be an array"),
        DataKind::Boolean => (!el.val.is_boolean()).then_some("boolean val must be true or false"),
        DataKind::Num => (!el.val.is_number()).then_some("num val must be a number"),
        DataKind::Text => (!el.val.is_string()).then_some("text val must be a string"),
        DataKind::Vec => (!el.val.is_array()).then_some("vec val must be an array"),
    };
    if let Some(msg) = problem {
        errs.within(".val", |e| e.report(msg));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/decode.rs"]
mod tests;
