use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::foundation::error::{VaiError, VaiResult};
use crate::foundation::label::{normalize_label, normalize_value};
use crate::ontology::model::{AttributeKind, ClassMap, Ontology, SensorType, TagsSpec};

/// Normalized attribute identity: upper-cased name plus ontology type.
///
/// Serializes as `"NAME:type"` so it can key a JSON object.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttrKey {
    /// Upper-cased attribute name.
    pub name: String,
    /// Attribute type.
    pub kind: AttributeKind,
}

impl AttrKey {
    /// Build a key, normalizing `name`.
    pub fn new(name: &str, kind: AttributeKind) -> Self {
        Self {
            name: normalize_label(name),
            kind,
        }
    }
}

impl fmt::Display for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.kind)
    }
}

impl Serialize for AttrKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Attribute key -> upper-cased allowed values.
pub type ClassAttributes = BTreeMap<AttrKey, BTreeSet<String>>;

/// Object class that carries semantic RLE masks.
///
/// Accepted in the objects root, with no attributes, whenever the ontology declares tags.
pub const SEGMENTATION_MATRIX_CLASS: &str = "*segmentation_matrix";

static NO_ATTRIBUTES: ClassAttributes = BTreeMap::new();

/// Class namespace inside an ontology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OntologyRoot {
    /// `objects` (plus the shared `classes`).
    Objects,
    /// `contexts` (plus the shared `classes`).
    Contexts,
    /// `taggings`.
    Taggings,
    /// `tags`.
    Tags,
}

impl fmt::Display for OntologyRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Objects => "objects",
            Self::Contexts => "contexts",
            Self::Taggings => "taggings",
            Self::Tags => "tags",
        })
    }
}

/// Compiled, normalized view of an [`Ontology`].
#[derive(Clone, Debug, Default, Serialize)]
pub struct OntologyIndex {
    objects: BTreeMap<String, ClassAttributes>,
    contexts: BTreeMap<String, ClassAttributes>,
    taggings: BTreeMap<String, ClassAttributes>,
    tags: BTreeMap<String, ClassAttributes>,
    tagging_attributes: ClassAttributes,
    sensor_types: BTreeMap<String, SensorType>,
    has_lidar: bool,
    has_multi_sensor: bool,
    declares_tags: bool,
    declares_taggings: bool,
    tag_vocabulary: Vec<String>,
}

impl OntologyIndex {
    /// Compile `ontology`.
    ///
    /// Fails with [`VaiError::Ontology`] when an option attribute declares no values and with
    /// [`VaiError::Prerequisite`] when the sensor roster is empty.
    #[tracing::instrument(skip(ontology))]
    pub fn build(ontology: &Ontology) -> VaiResult<Self> {
        if ontology.streams.is_empty() {
            return Err(VaiError::prerequisite(
                "ontology declares no streams; a sensor roster is required",
            ));
        }

        let mut objects = BTreeMap::new();
        let mut contexts = BTreeMap::new();
        if let Some(shared) = &ontology.classes {
            compile_classes(shared, "classes", &mut objects)?;
            compile_classes(shared, "classes", &mut contexts)?;
        }
        if let Some(map) = &ontology.objects {
            compile_classes(map, "objects", &mut objects)?;
        }
        if let Some(map) = &ontology.contexts {
            compile_classes(map, "contexts", &mut contexts)?;
        }

        let mut taggings = BTreeMap::new();
        if let Some(map) = &ontology.taggings {
            compile_classes(map, "taggings", &mut taggings)?;
        }
        let mut tagging_attributes = ClassAttributes::new();
        for attrs in taggings.values() {
            merge_attributes(&mut tagging_attributes, attrs);
        }

        let mut tags = BTreeMap::new();
        let tag_vocabulary = match &ontology.tags {
            None => Vec::new(),
            Some(TagsSpec::Map(map)) => {
                compile_classes(map, "tags", &mut tags)?;
                map.names().map(str::to_string).collect()
            }
            Some(spec @ TagsSpec::Classes(_)) => {
                let names = spec.class_names();
                for n in &names {
                    tags.entry(normalize_label(n)).or_default();
                }
                names
            }
        };

        let sensor_types: BTreeMap<String, SensorType> = ontology
            .streams
            .iter()
            .map(|(name, s)| (name.clone(), s.sensor))
            .collect();
        let has_lidar = sensor_types.values().any(|t| *t == SensorType::Lidar);
        let has_multi_sensor = sensor_types.len() > 1;

        tracing::debug!(
            objects = objects.len(),
            contexts = contexts.len(),
            taggings = taggings.len(),
            tags = tag_vocabulary.len(),
            sensors = sensor_types.len(),
            "compiled ontology"
        );

        Ok(Self {
            objects,
            contexts,
            declares_taggings: ontology.taggings.is_some(),
            taggings,
            tags,
            tagging_attributes,
            sensor_types,
            has_lidar,
            has_multi_sensor,
            declares_tags: ontology.tags.is_some(),
            tag_vocabulary,
        })
    }

    /// Attributes of `class` under `root`; the class name is compared case-insensitively.
    ///
    /// With tags declared, [`SEGMENTATION_MATRIX_CLASS`] resolves under
    /// [`OntologyRoot::Objects`] to an empty attribute set unless the ontology lists it itself.
    pub fn lookup_class(&self, root: OntologyRoot, class: &str) -> Option<&ClassAttributes> {
        let name = normalize_label(class);
        self.root(root).get(&name).or_else(|| {
            (root == OntologyRoot::Objects
                && self.declares_tags
                && name == normalize_label(SEGMENTATION_MATRIX_CLASS))
                .then_some(&NO_ATTRIBUTES)
        })
    }

    /// Every class of `root`, keyed by upper-cased name.
    pub fn root(&self, root: OntologyRoot) -> &BTreeMap<String, ClassAttributes> {
        match root {
            OntologyRoot::Objects => &self.objects,
            OntologyRoot::Contexts => &self.contexts,
            OntologyRoot::Taggings => &self.taggings,
            OntologyRoot::Tags => &self.tags,
        }
    }

    /// Union of the attributes of every `taggings` class.
    pub fn tagging_attributes(&self) -> &ClassAttributes {
        &self.tagging_attributes
    }

    /// Sensor roster.
    pub fn sensor_types(&self) -> &BTreeMap<String, SensorType> {
        &self.sensor_types
    }

    /// Type of sensor `name`, if it is on the roster.
    pub fn sensor_type(&self, name: &str) -> Option<SensorType> {
        self.sensor_types.get(name).copied()
    }

    /// Whether `name` is on the roster.
    pub fn has_sensor(&self, name: &str) -> bool {
        self.sensor_types.contains_key(name)
    }

    /// Whether at least one lidar is declared.
    pub fn has_lidar(&self) -> bool {
        self.has_lidar
    }

    /// Whether more than one sensor is declared.
    pub fn has_multi_sensor(&self) -> bool {
        self.has_multi_sensor
    }

    /// Whether the ontology has a `tags` section at all.
    pub fn declares_tags(&self) -> bool {
        self.declares_tags
    }

    /// Whether the ontology has a `taggings` section at all.
    pub fn declares_taggings(&self) -> bool {
        self.declares_taggings
    }

    /// Tag classes in vocabulary order (index = RLE class index).
    pub fn tag_vocabulary(&self) -> &[String] {
        &self.tag_vocabulary
    }

    /// Whether `class` is a tag class, compared case-insensitively.
    pub fn is_tag_class(&self, class: &str) -> bool {
        self.tags.contains_key(&normalize_label(class))
    }
}

fn compile_classes(
    map: &ClassMap,
    root_name: &str,
    out: &mut BTreeMap<String, ClassAttributes>,
) -> VaiResult<()> {
    for (class, spec) in map.iter() {
        let attrs = out.entry(normalize_label(class)).or_default();
        for decl in &spec.attributes.0 {
            let values: BTreeSet<String> = decl.values.iter().flat_map(normalize_value).collect();
            if decl.kind == AttributeKind::Option && values.is_empty() {
                return Err(VaiError::ontology(format!(
                    "{root_name}.{class}: option attribute '{}' declares no values",
                    decl.name
                )));
            }
            attrs
                .entry(AttrKey::new(&decl.name, decl.kind))
                .or_default()
                .extend(values);
        }
    }
    Ok(())
}

fn merge_attributes(into: &mut ClassAttributes, from: &ClassAttributes) {
    for (key, values) in from {
        into.entry(key.clone())
            .or_default()
            .extend(values.iter().cloned());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ontology/index.rs"]
mod tests;
