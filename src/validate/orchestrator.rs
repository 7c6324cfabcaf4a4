use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::document::decode::Document;
use crate::document::model::{Entity, EntityKind, VisionAi};
use crate::foundation::error::VaiResult;
use crate::foundation::label::normalize_label;
use crate::interval::set::IntervalSet;
use crate::ontology::index::{OntologyIndex, OntologyRoot};
use crate::ontology::model::Ontology;
use crate::validate::attributes::{
    check_probabilities, check_unknown_entities, collect_used_attributes, reconcile,
};
use crate::validate::mask::validate_object_masks;
use crate::validate::options::{UnresolvedTagPolicy, ValidateOptions};
use crate::validate::pointers::{present_frames, validate_document_frames, validate_entity_pointers};
use crate::validate::report::{ErrorKind, Section, ValidationError, ValidationReport};
use crate::validate::streams::{
    validate_coordinate_systems, validate_frame_sensor_refs, validate_streams,
};
use crate::validate::tags::{TagVocabulary, resolve_tag_vocabulary};

const TAGGING_SUFFIX: &str = "TAGGING";

fn is_tagging(entity: &Entity) -> bool {
    normalize_label(&entity.class).ends_with(TAGGING_SUFFIX)
}

fn entities_where(
    doc: &VisionAi,
    kind: EntityKind,
    keep: impl Fn(&Entity) -> bool,
) -> Vec<(&str, &Entity)> {
    doc.entities(kind)
        .into_iter()
        .flatten()
        .filter(|(_, e)| keep(*e))
        .map(|(id, e)| (id.as_str(), e))
        .collect()
}

/// Compiled ontology plus options, ready to validate any number of documents.
#[derive(Clone, Debug)]
pub struct Validator {
    index: OntologyIndex,
    options: ValidateOptions,
}

impl Validator {
    /// Compile `ontology` and keep it for later runs.
    pub fn new(ontology: &Ontology, options: ValidateOptions) -> VaiResult<Self> {
        Ok(Self::from_index(OntologyIndex::build(ontology)?, options))
    }

    /// Wrap an already compiled index.
    pub fn from_index(index: OntologyIndex, options: ValidateOptions) -> Self {
        Self { index, options }
    }

    /// Compiled ontology.
    pub fn index(&self) -> &OntologyIndex {
        &self.index
    }

    /// Run options.
    pub fn options(&self) -> &ValidateOptions {
        &self.options
    }

    /// Validate one document.
    ///
    /// Streams run first and gate the rest: a document without streams yields a single
    /// [`ErrorKind::MissingStreams`] and nothing else. Every later section runs even when an
    /// earlier one reported errors.
    #[tracing::instrument(skip(self, doc))]
    pub fn validate(&self, doc: &Document) -> ValidationReport {
        let vai = doc.visionai();
        let mut report = ValidationReport::default();

        let Some(streams) = vai.streams.as_ref().filter(|s| !s.is_empty()) else {
            tracing::warn!("document declares no streams; validation aborted");
            report.sections_run.push(Section::Streams);
            report.errors.push(ValidationError::new(
                Section::Streams,
                ErrorKind::MissingStreams,
                "document declares no streams",
            ));
            report.aborted = true;
            return report;
        };

        self.run_section(&mut report, Section::Streams, |errors| {
            validate_streams(streams, &self.index, errors);
            validate_coordinate_systems(vai.coordinate_systems.as_ref(), &self.index, errors);
            validate_frame_sensor_refs(vai, &self.index, errors);
        });

        self.run_section(&mut report, Section::Frames, |errors| {
            validate_document_frames(vai, errors);
        });

        let present = present_frames(vai);
        self.run_section(&mut report, Section::Contexts, |errors| {
            self.check_contexts(vai, &present, errors);
        });
        self.run_section(&mut report, Section::Objects, |errors| {
            self.check_objects(vai, &present, errors);
        });
        if self.index.declares_taggings() {
            self.run_section(&mut report, Section::Taggings, |errors| {
                self.check_taggings(vai, &present, errors);
            });
        }

        tracing::debug!(errors = report.errors.len(), "validation finished");
        report
    }

    /// Validate many documents in parallel, one task per document.
    ///
    /// Reports come back in input order.
    pub fn validate_batch(&self, docs: &[Document]) -> Vec<ValidationReport> {
        docs.par_iter().map(|d| self.validate(d)).collect()
    }

    fn run_section(
        &self,
        report: &mut ValidationReport,
        section: Section,
        body: impl FnOnce(&mut Vec<ValidationError>),
    ) {
        let before = report.errors.len();
        body(&mut report.errors);
        report.sections_run.push(section);
        tracing::debug!(
            %section,
            errors = report.errors.len() - before,
            "section checked"
        );
    }

    fn check_contexts(
        &self,
        vai: &VisionAi,
        present: &IntervalSet,
        errors: &mut Vec<ValidationError>,
    ) {
        let section = Section::Contexts;
        check_unknown_entities(vai, EntityKind::Context, section, errors);

        let contexts = entities_where(vai, EntityKind::Context, |e| !is_tagging(e));
        let used = collect_used_attributes(contexts.iter().copied(), vai, EntityKind::Context);
        reconcile(
            &used,
            |class| self.index.lookup_class(OntologyRoot::Contexts, class),
            "contexts",
            section,
            errors,
        );
        check_probabilities(contexts.iter().copied(), vai, EntityKind::Context, section, errors);
        for (id, entity) in &contexts {
            validate_entity_pointers(
                id,
                entity,
                vai,
                EntityKind::Context,
                present,
                section,
                errors,
            );
        }
    }

    fn check_objects(
        &self,
        vai: &VisionAi,
        present: &IntervalSet,
        errors: &mut Vec<ValidationError>,
    ) {
        let section = Section::Objects;
        check_unknown_entities(vai, EntityKind::Object, section, errors);

        let objects = entities_where(vai, EntityKind::Object, |_| true);
        let used = collect_used_attributes(objects.iter().copied(), vai, EntityKind::Object);
        reconcile(
            &used,
            |class| self.index.lookup_class(OntologyRoot::Objects, class),
            "objects",
            section,
            errors,
        );
        check_probabilities(objects.iter().copied(), vai, EntityKind::Object, section, errors);
        for (id, entity) in &objects {
            validate_entity_pointers(id, entity, vai, EntityKind::Object, present, section, errors);
        }

        if let Some(allowed) = &self.options.allowed_object_data_names {
            let mut disallowed = BTreeSet::new();
            for frame in vai.frames.values() {
                for fe in frame.objects.values() {
                    disallowed.extend(
                        fe.dynamic_data
                            .values()
                            .flatten()
                            .map(|el| el.name.as_str())
                            .filter(|name| !allowed.contains(*name)),
                    );
                }
            }
            for name in disallowed {
                errors.push(ValidationError::new(
                    section,
                    ErrorKind::DisallowedDataName,
                    format!("object frame data name {name} is not in the allowed set"),
                ));
            }
        }

        let vocabulary = resolve_tag_vocabulary(vai, &self.index);
        if let TagVocabulary::Unresolved(reason) = &vocabulary {
            errors.push(ValidationError::new(
                section,
                ErrorKind::TagVocabularyUnresolved,
                reason.clone(),
            ));
        }
        let size = match (vocabulary.size(), self.options.unresolved_tags) {
            (Some(n), _) => Some(n),
            (None, UnresolvedTagPolicy::RejectMasks) => Some(0),
            (None, UnresolvedTagPolicy::SkipMaskValidation) => None,
        };
        match size {
            Some(n) => validate_object_masks(vai, n, self.options.mask_area, section, errors),
            None => tracing::debug!("tag vocabulary unresolved; masks not checked"),
        }
    }

    fn check_taggings(
        &self,
        vai: &VisionAi,
        present: &IntervalSet,
        errors: &mut Vec<ValidationError>,
    ) {
        let section = Section::Taggings;
        let taggings = entities_where(vai, EntityKind::Context, is_tagging);
        for (id, entity) in &taggings {
            if entity.data_pointers.is_empty() {
                errors.push(ValidationError::new(
                    section,
                    ErrorKind::MissingAttribute,
                    format!("tagging context {id} declares no data pointers"),
                ));
            }
        }

        let used = collect_used_attributes(taggings.iter().copied(), vai, EntityKind::Context);
        let attrs = self.index.tagging_attributes();
        reconcile(&used, |_| Some(attrs), "taggings", section, errors);
        check_probabilities(taggings.iter().copied(), vai, EntityKind::Context, section, errors);
        for (id, entity) in &taggings {
            validate_entity_pointers(
                id,
                entity,
                vai,
                EntityKind::Context,
                present,
                section,
                errors,
            );
        }
    }
}

/// Compile `ontology` and validate `doc` with default options.
pub fn validate(ontology: &Ontology, doc: &Document) -> VaiResult<ValidationReport> {
    Ok(Validator::new(ontology, ValidateOptions::default())?.validate(doc))
}

#[cfg(test)]
#[path = "../../tests/unit/validate/orchestrator.rs"]
mod tests;
