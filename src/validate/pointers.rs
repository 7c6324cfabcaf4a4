//! Data-pointer and frame-interval consistency.

use std::collections::{BTreeMap, BTreeSet};

use crate::document::model::{DataKind, Entity, EntityKind, VisionAi};
use crate::interval::set::{
    FrameInterval, IntervalError, IntervalSet, declared_ranges, uncontained,
};
use crate::validate::report::{ErrorKind, Section, ValidationError};

pub(crate) fn interval_error_kind(e: &IntervalError) -> ErrorKind {
    match e {
        IntervalError::Empty => ErrorKind::EmptyIntervalInput,
        IntervalError::InvalidRange { .. } => ErrorKind::MalformedInterval,
        IntervalError::Duplicate(_) | IntervalError::Overlap(..) => ErrorKind::DuplicateInterval,
    }
}

fn fmt_ranges(ranges: &[FrameInterval]) -> String {
    let parts: Vec<String> = ranges.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Frames present as keys of `doc.frames`.
pub(crate) fn present_frames(doc: &VisionAi) -> IntervalSet {
    IntervalSet::from_frames(doc.frame_numbers()).unwrap_or_default()
}

/// Check the document `frame_intervals` against the frame keys.
pub fn validate_document_frames(doc: &VisionAi, errors: &mut Vec<ValidationError>) {
    let declared =
        match IntervalSet::from_declared(doc.frame_intervals.iter().map(|fi| fi.bounds())) {
            Ok(s) => s,
            Err(e) => {
                errors.push(ValidationError::new(
                    Section::Frames,
                    interval_error_kind(&e),
                    format!("document frame_intervals: {e}"),
                ));
                return;
            }
        };
    let present = present_frames(doc);

    let extra = present.difference(&declared);
    if !extra.is_empty() {
        errors.push(ValidationError::new(
            Section::Frames,
            ErrorKind::DocumentFrameMismatch,
            format!(
                "frames {} exist but are not covered by frame_intervals {declared}",
                fmt_ranges(&extra)
            ),
        ));
    }
    let missing = declared.difference(&present);
    if !missing.is_empty() {
        errors.push(ValidationError::new(
            Section::Frames,
            ErrorKind::DocumentFrameMismatch,
            format!(
                "frame_intervals declare frames {} that do not exist",
                fmt_ranges(&missing)
            ),
        ));
    }
}

/// Cross-check one entity's data pointers against its data and frame intervals.
///
/// `present` is the set of frames the document actually holds.
pub fn validate_entity_pointers(
    id: &str,
    entity: &Entity,
    doc: &VisionAi,
    kind: EntityKind,
    present: &IntervalSet,
    section: Section,
    errors: &mut Vec<ValidationError>,
) {
    // Lifetime ranges stay unmerged: a pointer range spanning two touching lifetime ranges is
    // not contained.
    let lifetime = if entity.frame_intervals.is_empty() {
        Some(Vec::new())
    } else {
        match declared_ranges(entity.frame_intervals.iter().map(|fi| fi.bounds())) {
            Ok(ranges) => Some(ranges),
            Err(e) => {
                errors.push(ValidationError::new(
                    section,
                    interval_error_kind(&e),
                    format!("{id}: frame_intervals: {e}"),
                ));
                None
            }
        }
    };

    if let Some(life) = &lifetime {
        check_lifetime_in_document(id, life, present, section, errors);
    }

    let mut observed: BTreeMap<&str, BTreeSet<DataKind>> = BTreeMap::new();
    let mut dynamic_frames: BTreeMap<&str, BTreeSet<u64>> = BTreeMap::new();
    for (k, elements) in &entity.static_data {
        for el in elements {
            observed.entry(&el.name).or_default().insert(*k);
        }
    }
    for (key, frame) in &doc.frames {
        let Some(fe) = frame.entities(kind).get(id) else {
            continue;
        };
        for (k, elements) in &fe.dynamic_data {
            for el in elements {
                observed.entry(&el.name).or_default().insert(*k);
                dynamic_frames
                    .entry(&el.name)
                    .or_default()
                    .insert(key.number());
            }
        }
    }

    for (name, kinds) in &observed {
        match entity.data_pointers.get(*name) {
            None => {
                let kinds: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
                errors.push(ValidationError::new(
                    section,
                    ErrorKind::MissingFromDataPointer,
                    format!(
                        "{id}: {name} ({}) has data but no data pointer",
                        kinds.join(", ")
                    ),
                ));
            }
            Some(pointer) => {
                for k in kinds.iter().filter(|k| **k != pointer.kind) {
                    errors.push(ValidationError::new(
                        section,
                        ErrorKind::PointerTypeMismatch,
                        format!(
                            "{id}: {name} is stored as {k} but its data pointer declares {}",
                            pointer.kind
                        ),
                    ));
                }
            }
        }
    }

    for (name, pointer) in &entity.data_pointers {
        if !observed.contains_key(name.as_str()) {
            errors.push(ValidationError::new(
                section,
                ErrorKind::ExtraInDataPointer,
                format!(
                    "{id}: data pointer {name} ({}) has no matching data",
                    pointer.kind
                ),
            ));
        }

        let declared = if pointer.frame_intervals.is_empty() {
            IntervalSet::default()
        } else {
            match IntervalSet::from_declared(pointer.frame_intervals.iter().map(|fi| fi.bounds()))
            {
                Ok(s) => s,
                Err(e) => {
                    errors.push(ValidationError::new(
                        section,
                        interval_error_kind(&e),
                        format!("{id}: data pointer {name}: {e}"),
                    ));
                    continue;
                }
            }
        };

        if let Some(life) = &lifetime {
            let outside = uncontained(declared.ranges(), life);
            if !outside.is_empty() {
                errors.push(ValidationError::new(
                    section,
                    ErrorKind::PointerOutsideEntityLifetime,
                    format!(
                        "{id}: data pointer {name} intervals {} are outside the entity frame \
                         intervals {}",
                        fmt_ranges(&outside),
                        fmt_ranges(life)
                    ),
                ));
            }
        }

        if let Some(frames) = dynamic_frames.get(name.as_str()) {
            let used = IntervalSet::from_frames(frames.iter().copied()).unwrap_or_default();
            let outside = declared.uncontained(&used);
            if !outside.is_empty() {
                errors.push(ValidationError::new(
                    section,
                    ErrorKind::DynamicUsageOutsidePointer,
                    format!(
                        "{id}: {name} has dynamic values in frames {} outside its data pointer \
                         intervals {declared}",
                        fmt_ranges(&outside)
                    ),
                ));
            }
        }
    }
}

fn check_lifetime_in_document(
    id: &str,
    life: &[FrameInterval],
    present: &IntervalSet,
    section: Section,
    errors: &mut Vec<ValidationError>,
) {
    let span = present.first_frame().zip(present.last_frame());
    for r in uncontained(life, present.ranges()) {
        match span {
            Some((first, last)) if r.start >= first && r.end <= last => {
                errors.push(ValidationError::new(
                    section,
                    ErrorKind::EntityFrameGap,
                    format!("{id}: frame interval {r} spans frames missing from the document"),
                ));
            }
            _ => {
                let bounds = span.map_or_else(
                    || "no frames".to_string(),
                    |(first, last)| format!("frames [{first}, {last}]"),
                );
                errors.push(ValidationError::new(
                    section,
                    ErrorKind::FrameOutOfDocumentRange,
                    format!("{id}: frame interval {r} is outside document {bounds}"),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/validate/pointers.rs"]
mod tests;
