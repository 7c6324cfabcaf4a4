use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{VaiError, VaiResult};

/// Project ontology: permitted classes per root, their attributes, and the sensor roster.
///
/// Both ontology layouts are accepted. A generic `classes` root is shared by the object and
/// context sections, while `objects`, `contexts` and `taggings` scope classes to one section.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Ontology {
    /// Classes allowed for `visionai.objects`.
    #[serde(default)]
    pub objects: Option<ClassMap>,
    /// Classes allowed for `visionai.contexts`.
    #[serde(default)]
    pub contexts: Option<ClassMap>,
    /// Classes whose attributes govern `*tagging` contexts.
    #[serde(default)]
    pub taggings: Option<ClassMap>,
    /// Classes usable by both objects and contexts.
    #[serde(default)]
    pub classes: Option<ClassMap>,
    /// Sensor roster.
    pub streams: BTreeMap<String, StreamSpec>,
    /// Segmentation tag vocabulary.
    #[serde(default)]
    pub tags: Option<TagsSpec>,
}

impl Ontology {
    /// Parse an ontology from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> VaiResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| VaiError::serde(format!("parse ontology JSON: {e}")))
    }

    /// Parse an ontology from a JSON string.
    pub fn from_json_str(s: &str) -> VaiResult<Self> {
        serde_json::from_str(s).map_err(|e| VaiError::serde(format!("parse ontology JSON: {e}")))
    }

    /// Parse an ontology from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VaiResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            VaiError::serde(format!("open ontology JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

/// Ordered `class name -> class spec` map.
///
/// Entries keep the order in which they appear in the source text, which matters for the tag
/// vocabulary (position = RLE class index). A `null` class body is read as an empty spec.
/// Going through `serde_json::Value` first loses that order, so parse from text or a reader.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassMap(Vec<(String, ClassSpec)>);

impl ClassMap {
    /// Build from ordered entries.
    pub fn new(entries: Vec<(String, ClassSpec)>) -> Self {
        Self(entries)
    }

    /// Iterate entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassSpec)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Class names in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no class is declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for ClassMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ClassMapVisitor;

        impl<'de> serde::de::Visitor<'de> for ClassMapVisitor {
            type Value = ClassMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of class name to class spec")
            }

            fn visit_map<A>(self, mut map: A) -> Result<ClassMap, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, spec)) = map.next_entry::<String, Option<ClassSpec>>()? {
                    entries.push((name, spec.unwrap_or_default()));
                }
                Ok(ClassMap(entries))
            }
        }

        deserializer.deserialize_map(ClassMapVisitor)
    }
}

/// Attribute declarations of one class.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ClassSpec {
    /// Declared attributes.
    #[serde(default)]
    pub attributes: AttributeDecls,
}

/// Attribute type as the ontology sees it.
///
/// Documents store categorical values as `vec`, which is why `vec` and `option` are the same
/// type here.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// `true` / `false`.
    Boolean,
    /// Numeric value (`num` or `number`).
    #[serde(alias = "num")]
    Number,
    /// Free text.
    Text,
    /// Enumerated categorical value (`option` or `vec`).
    #[serde(alias = "vec")]
    Option,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Text => "text",
            Self::Option => "option",
        })
    }
}

/// One declared attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDecl {
    /// Attribute name as written.
    pub name: String,
    /// Declared type.
    pub kind: AttributeKind,
    /// Allowed values (meaningful for [`AttributeKind::Option`]).
    pub values: Vec<serde_json::Value>,
}

/// Attribute declarations, accepted as a list or as a name-keyed map.
///
/// List form: `[{"name": "color", "type": "option", "options": [{"value": "red"}]}]`.
/// Map form: `{"color": {"type": "option", "value": ["red"]}}`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeDecls(pub Vec<AttributeDecl>);

impl<'de> Deserialize<'de> for AttributeDecls {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OptionRepr {
            Obj { value: serde_json::Value },
            Raw(serde_json::Value),
        }

        #[derive(Deserialize)]
        struct Body {
            #[serde(rename = "type")]
            kind: AttributeKind,
            #[serde(default)]
            options: Vec<OptionRepr>,
            #[serde(default)]
            value: Option<Vec<serde_json::Value>>,
        }

        #[derive(Deserialize)]
        struct Named {
            name: String,
            #[serde(flatten)]
            body: Body,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<Named>),
            Map(BTreeMap<String, Body>),
        }

        fn decl(name: String, body: Body) -> AttributeDecl {
            let mut values: Vec<serde_json::Value> = body
                .options
                .into_iter()
                .map(|o| match o {
                    OptionRepr::Obj { value } => value,
                    OptionRepr::Raw(v) => v,
                })
                .collect();
            values.extend(body.value.unwrap_or_default());
            AttributeDecl {
                name,
                kind: body.kind,
                values,
            }
        }

        let decls = match Option::<Repr>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(Repr::List(items)) => items.into_iter().map(|n| decl(n.name, n.body)).collect(),
            Some(Repr::Map(map)) => map.into_iter().map(|(k, b)| decl(k, b)).collect(),
        };
        Ok(Self(decls))
    }
}

/// Sensor category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    /// Camera.
    Camera,
    /// Lidar.
    Lidar,
    /// Radar.
    Radar,
    /// GPS / IMU unit.
    GpsImu,
    /// Anything else.
    Other,
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Camera => "camera",
            Self::Lidar => "lidar",
            Self::Radar => "radar",
            Self::GpsImu => "gps_imu",
            Self::Other => "other",
        })
    }
}

/// One sensor of the roster.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StreamSpec {
    /// Sensor category.
    #[serde(rename = "type")]
    pub sensor: SensorType,
}

/// Segmentation tag vocabulary, as a class map or a plain class list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagsSpec {
    /// `{"classes": ["road", "car"]}`.
    Classes(TagClassList),
    /// `{"road": {...}, "car": {...}}`.
    Map(ClassMap),
}

/// Plain ordered tag class list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagClassList {
    /// Class names; position is the RLE class index.
    pub classes: Vec<String>,
}

impl TagsSpec {
    /// Tag class names in vocabulary order.
    pub fn class_names(&self) -> Vec<String> {
        match self {
            Self::Classes(list) => list.classes.clone(),
            Self::Map(map) => map.names().map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ontology/model.rs"]
mod tests;
