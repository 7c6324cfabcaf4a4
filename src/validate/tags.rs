//! Segmentation tag vocabulary resolution.

use std::collections::BTreeSet;

use crate::document::model::VisionAi;
use crate::ontology::index::OntologyIndex;

/// Tag type that carries the RLE vocabulary.
pub const SEGMENTATION_TAG_TYPE: &str = "semantic_segmentation_RLE";

/// Vector subtype of the vocabulary entry.
pub const VOCABULARY_VEC_TYPE: &str = "values";

/// Outcome of looking up the document's mask vocabulary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagVocabulary {
    /// The ontology declares no tags; masks use an empty vocabulary.
    NotDeclared,
    /// Vocabulary found and consistent with the ontology.
    Resolved(Vec<String>),
    /// The ontology declares tags but the document's vocabulary is unusable.
    Unresolved(String),
}

impl TagVocabulary {
    /// Number of usable class indices, or `None` when unresolved.
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::NotDeclared => Some(0),
            Self::Resolved(classes) => Some(classes.iter().collect::<BTreeSet<_>>().len()),
            Self::Unresolved(_) => None,
        }
    }
}

/// Resolve the `semantic_segmentation_RLE` tag of `doc` against the ontology tags.
pub fn resolve_tag_vocabulary(doc: &VisionAi, index: &OntologyIndex) -> TagVocabulary {
    if !index.declares_tags() {
        return TagVocabulary::NotDeclared;
    }
    let Some(tag) = doc
        .tags
        .iter()
        .flatten()
        .map(|(_, t)| t)
        .find(|t| t.kind == SEGMENTATION_TAG_TYPE)
    else {
        return TagVocabulary::Unresolved(format!(
            "document has no {SEGMENTATION_TAG_TYPE} tag"
        ));
    };

    let [entry] = tag.tag_data.vec.as_slice() else {
        return TagVocabulary::Unresolved(format!(
            "{SEGMENTATION_TAG_TYPE} tag must have exactly one vec entry, found {}",
            tag.tag_data.vec.len()
        ));
    };
    if entry.kind.as_deref() != Some(VOCABULARY_VEC_TYPE) {
        return TagVocabulary::Unresolved(format!(
            "{SEGMENTATION_TAG_TYPE} vec entry must be of type \"{VOCABULARY_VEC_TYPE}\""
        ));
    }

    let mut classes = Vec::with_capacity(entry.val.len());
    for v in &entry.val {
        let Some(class) = v.as_str() else {
            return TagVocabulary::Unresolved(format!(
                "{SEGMENTATION_TAG_TYPE} vocabulary entry {v} is not a class name"
            ));
        };
        classes.push(class.to_string());
    }
    let unknown: Vec<&str> = classes
        .iter()
        .filter(|c| !index.is_tag_class(c))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return TagVocabulary::Unresolved(format!(
            "tag classes not declared in the ontology: {}",
            unknown.join(", ")
        ));
    }
    TagVocabulary::Resolved(classes)
}

#[cfg(test)]
#[path = "../../tests/unit/validate/tags.rs"]
mod tests;
