//! Attribute reconciliation.
//!
//! Every attribute an entity class actually uses (static data, frame data and the nested
//! attributes of geometry elements) is collected into the same normalized shape as the compiled
//! ontology, then compared against it.

use std::collections::{BTreeMap, BTreeSet};

use crate::document::model::{DataElement, DataKind, ElementData, Entity, EntityKind, VisionAi};
use crate::foundation::label::{normalize_label, normalize_value};
use crate::ontology::index::{AttrKey, ClassAttributes};
use crate::ontology::model::AttributeKind;
use crate::validate::report::{ErrorKind, Section, ValidationError};

/// Upper-cased class name -> attributes used by entities of that class.
pub type UsedAttributes = BTreeMap<String, ClassAttributes>;

/// Attribute elements of one element-data block.
///
/// Yields direct attribute elements (`boolean`, `num`, `text`, `vec`) and the nested attributes
/// of geometry elements.
pub(crate) fn attribute_elements(
    data: &ElementData,
) -> impl Iterator<Item = (DataKind, &DataElement)> {
    data.iter().flat_map(|(kind, elements)| {
        elements.iter().flat_map(move |el| {
            let direct = kind.attribute_kind().map(|_| (*kind, el));
            let nested = kind
                .is_geometry()
                .then_some(&el.attributes)
                .into_iter()
                .flat_map(|attrs| {
                    attrs
                        .iter()
                        .filter(|(k, _)| k.attribute_kind().is_some())
                        .flat_map(|(k, els)| els.iter().map(move |e| (*k, e)))
                });
            direct.into_iter().chain(nested)
        })
    })
}

fn record(into: &mut ClassAttributes, data: &ElementData) {
    for (kind, el) in attribute_elements(data) {
        let Some(attr_kind) = kind.attribute_kind() else {
            continue;
        };
        into.entry(AttrKey::new(&el.name, attr_kind))
            .or_default()
            .extend(normalize_value(&el.val));
    }
}

/// Collect the attributes used by `entities`, grouped by normalized class.
///
/// Static data is read from each entity; dynamic data from every frame of `doc` holding that
/// entity id. Empty or `false` values still register the attribute key.
pub fn collect_used_attributes<'a>(
    entities: impl IntoIterator<Item = (&'a str, &'a Entity)>,
    doc: &VisionAi,
    kind: EntityKind,
) -> UsedAttributes {
    let mut used = UsedAttributes::new();
    for (id, entity) in entities {
        let class = used.entry(normalize_label(&entity.class)).or_default();
        record(class, &entity.static_data);
        for frame in doc.frames.values() {
            if let Some(fe) = frame.entities(kind).get(id) {
                record(class, &fe.dynamic_data);
            }
        }
    }
    used
}

/// Compare `used` against the ontology classes reachable through `lookup`.
///
/// Reports every offending class and key in lookup order. `root` names the ontology section in
/// messages.
pub fn reconcile<'i>(
    used: &UsedAttributes,
    lookup: impl Fn(&str) -> Option<&'i ClassAttributes>,
    root: &str,
    section: Section,
    errors: &mut Vec<ValidationError>,
) {
    for (class, attrs) in used {
        let Some(allowed) = lookup(class) else {
            errors.push(ValidationError::new(
                section,
                ErrorKind::UnknownClass,
                format!("class {class} is not declared in ontology {root}"),
            ));
            continue;
        };
        for (key, values) in attrs {
            let Some(allowed_values) = allowed.get(key) else {
                errors.push(ValidationError::new(
                    section,
                    ErrorKind::ExtraAttribute,
                    format!("class {class}: attribute {key} is not declared in ontology {root}"),
                ));
                continue;
            };
            if key.kind != AttributeKind::Option {
                continue;
            }
            let extra: Vec<&str> = values
                .difference(allowed_values)
                .map(String::as_str)
                .collect();
            if !extra.is_empty() {
                errors.push(ValidationError::new(
                    section,
                    ErrorKind::DisallowedOptionValue,
                    format!(
                        "class {class}: attribute {key} has values not allowed by the ontology: {}",
                        extra.join(", ")
                    ),
                ));
            }
        }
    }
}

/// Report frame entries whose entity id is not declared at document level.
pub(crate) fn check_unknown_entities(
    doc: &VisionAi,
    kind: EntityKind,
    section: Section,
    errors: &mut Vec<ValidationError>,
) {
    let declared = doc.entities(kind);
    let mut unknown: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (key, frame) in &doc.frames {
        for id in frame.entities(kind).keys() {
            if !declared.is_some_and(|d| d.contains_key(id)) {
                unknown.entry(id).or_default().push(key.to_string());
            }
        }
    }
    for (id, frames) in unknown {
        errors.push(ValidationError::new(
            section,
            ErrorKind::UnknownEntity,
            format!(
                "frame data references undeclared id {id} in frames [{}]",
                frames.join(", ")
            ),
        ));
    }
}

/// Report `vec` attributes whose `probability` vector has a different length.
pub(crate) fn check_probabilities<'a>(
    entities: impl IntoIterator<Item = (&'a str, &'a Entity)>,
    doc: &VisionAi,
    kind: EntityKind,
    section: Section,
    errors: &mut Vec<ValidationError>,
) {
    let mut offenders: BTreeSet<(String, String)> = BTreeSet::new();
    for (id, entity) in entities {
        let frame_data = doc
            .frames
            .values()
            .filter_map(|f| f.entities(kind).get(id))
            .map(|fe| &fe.dynamic_data);
        for data in std::iter::once(&entity.static_data).chain(frame_data) {
            for (k, el) in attribute_elements(data) {
                if k != DataKind::Vec {
                    continue;
                }
                let Some(prob) = el.probability() else {
                    continue;
                };
                let values = el.val.as_array().map_or(0, Vec::len);
                let probs = prob.val.as_array().map_or(0, Vec::len);
                if values != probs {
                    offenders.insert((id.to_string(), el.name.clone()));
                }
            }
        }
    }
    for (id, name) in offenders {
        errors.push(ValidationError::new(
            section,
            ErrorKind::ProbabilityLengthMismatch,
            format!("{id}: vec attribute {name} needs one probability per value"),
        ));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/validate/attributes.rs"]
mod tests;
