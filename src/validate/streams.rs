//! Sensor roster checks: streams, coordinate systems and per-frame sensor references.

use std::collections::{BTreeMap, BTreeSet};

use crate::document::model::{
    CoordinateSystemDef, CoordinateSystemKind, ElementData, StreamDef, VisionAi,
};
use crate::ontology::index::OntologyIndex;
use crate::validate::report::{ErrorKind, Section, ValidationError};

/// Marker every vehicle-frame `local_cs` name carries.
pub const LOCAL_CS_MARKER: &str = "iso8855";

/// Every document stream must be on the roster with the same type.
pub fn validate_streams(
    streams: &BTreeMap<String, StreamDef>,
    index: &OntologyIndex,
    errors: &mut Vec<ValidationError>,
) {
    for (name, stream) in streams {
        match index.sensor_type(name) {
            None => errors.push(ValidationError::new(
                Section::Streams,
                ErrorKind::ExtraSensor,
                format!("stream {name} is not in the ontology sensor roster"),
            )),
            Some(expected) if expected != stream.sensor => errors.push(ValidationError::new(
                Section::Streams,
                ErrorKind::SensorTypeMismatch,
                format!(
                    "stream {name} is declared as {} but the ontology says {expected}",
                    stream.sensor
                ),
            )),
            Some(_) => {}
        }
    }
}

/// Coordinate-system names against the roster.
///
/// Runs only for multi-sensor ontologies with at least one lidar.
pub fn validate_coordinate_systems(
    coordinate_systems: Option<&BTreeMap<String, CoordinateSystemDef>>,
    index: &OntologyIndex,
    errors: &mut Vec<ValidationError>,
) {
    if !(index.has_multi_sensor() && index.has_lidar()) {
        return;
    }
    let Some(cs) = coordinate_systems.filter(|cs| !cs.is_empty()) else {
        errors.push(ValidationError::new(
            Section::Streams,
            ErrorKind::MissingCoordinateSystems,
            "multi-sensor lidar ontology requires coordinate_systems",
        ));
        return;
    };
    for (name, def) in cs {
        match def.kind {
            CoordinateSystemKind::LocalCs => {
                if !name.contains(LOCAL_CS_MARKER) {
                    errors.push(ValidationError::new(
                        Section::Streams,
                        ErrorKind::InvalidLocalCoordinateSystemName,
                        format!("local_cs {name} must contain \"{LOCAL_CS_MARKER}\""),
                    ));
                }
            }
            CoordinateSystemKind::SensorCs => {
                if !index.has_sensor(name) {
                    errors.push(ValidationError::new(
                        Section::Streams,
                        ErrorKind::ExtraCoordinateSensor,
                        format!("coordinate system {name} is not in the ontology sensor roster"),
                    ));
                }
            }
        }
    }
}

fn collect_refs<'a>(
    data: &'a ElementData,
    streams: &mut BTreeSet<&'a str>,
    coordinate_systems: &mut BTreeSet<&'a str>,
) {
    for el in data.values().flatten() {
        if let Some(s) = &el.stream {
            streams.insert(s);
        }
        if let Some(cs) = &el.coordinate_system {
            coordinate_systems.insert(cs);
        }
        collect_refs(&el.attributes, streams, coordinate_systems);
    }
}

/// Sensor names referenced from frames must be on the roster.
pub fn validate_frame_sensor_refs(
    doc: &VisionAi,
    index: &OntologyIndex,
    errors: &mut Vec<ValidationError>,
) {
    let mut streams = BTreeSet::new();
    let mut coordinate_systems = BTreeSet::new();
    let mut property_streams = BTreeSet::new();
    for frame in doc.frames.values() {
        for fe in frame.objects.values().chain(frame.contexts.values()) {
            collect_refs(&fe.dynamic_data, &mut streams, &mut coordinate_systems);
        }
        if let Some(props) = &frame.frame_properties {
            property_streams.extend(props.streams.keys().map(String::as_str));
        }
    }

    if index.has_multi_sensor() {
        for s in streams.iter().filter(|s| !index.has_sensor(s)) {
            errors.push(ValidationError::new(
                Section::Streams,
                ErrorKind::ExtraSensor,
                format!(
                    "frame data references stream {s}, which is not in the ontology sensor roster"
                ),
            ));
        }
    }

    if index.has_lidar() {
        let local: BTreeSet<&str> = doc
            .coordinate_systems
            .iter()
            .flatten()
            .filter(|(_, def)| def.kind == CoordinateSystemKind::LocalCs)
            .map(|(name, _)| name.as_str())
            .collect();
        for cs in coordinate_systems
            .iter()
            .filter(|cs| !index.has_sensor(cs) && !local.contains(*cs))
        {
            errors.push(ValidationError::new(
                Section::Streams,
                ErrorKind::ExtraCoordinateSensor,
                format!(
                    "frame data references coordinate system {cs}, which is not in the ontology \
                     sensor roster"
                ),
            ));
        }
    }

    for s in property_streams.iter().filter(|s| !index.has_sensor(s)) {
        errors.push(ValidationError::new(
            Section::Streams,
            ErrorKind::ExtraSensor,
            format!(
                "frame_properties lists stream {s}, which is not in the ontology sensor roster"
            ),
        ));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/validate/streams.rs"]
mod tests;
