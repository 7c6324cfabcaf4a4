use super::*;
use crate::ontology::model::Ontology;

fn index(streams: &str) -> OntologyIndex {
    let o = Ontology::from_json_str(&format!(r#"{{"streams": {streams}}}"#)).unwrap();
    OntologyIndex::build(&o).unwrap()
}

fn multi_lidar() -> OntologyIndex {
    index(r#"{"cam1": {"type": "camera"}, "lidar1": {"type": "lidar"}}"#)
}

fn vai(v: serde_json::Value) -> VisionAi {
    let mut v = v;
    v["metadata"] = serde_json::json!({"schema_version": "1.0.0"});
    serde_json::from_value(v).unwrap()
}

fn kinds(errors: &[ValidationError]) -> Vec<ErrorKind> {
    errors.iter().map(|e| e.kind).collect()
}

#[test]
fn stream_types_must_match_the_roster() {
    let doc = vai(serde_json::json!({
        "streams": {"cam1": {"type": "camera"}, "cam9": {"type": "camera"}, "lidar1": {"type": "radar"}}
    }));
    let mut errors = Vec::new();
    validate_streams(doc.streams.as_ref().unwrap(), &multi_lidar(), &mut errors);
    assert_eq!(
        kinds(&errors),
        vec![ErrorKind::ExtraSensor, ErrorKind::SensorTypeMismatch]
    );
    assert!(errors[1].message.contains("radar"));
}

#[test]
fn camera_declared_as_lidar_is_a_type_mismatch() {
    let doc = vai(serde_json::json!({"streams": {"cam1": {"type": "camera"}}}));
    let mut errors = Vec::new();
    validate_streams(
        doc.streams.as_ref().unwrap(),
        &index(r#"{"cam1": {"type": "lidar"}}"#),
        &mut errors,
    );
    assert_eq!(kinds(&errors), vec![ErrorKind::SensorTypeMismatch]);
}

#[test]
fn coordinate_systems_checked_for_multi_sensor_lidar() {
    let doc = vai(serde_json::json!({
        "coordinate_systems": {
            "vehicle": {"type": "local_cs"},
            "iso8855-1": {"type": "local_cs"},
            "cam1": {"type": "sensor_cs", "parent": "iso8855-1"},
            "cam7": {"type": "sensor_cs", "parent": "iso8855-1"}
        }
    }));
    let mut errors = Vec::new();
    validate_coordinate_systems(doc.coordinate_systems.as_ref(), &multi_lidar(), &mut errors);
    assert_eq!(
        kinds(&errors),
        vec![
            ErrorKind::ExtraCoordinateSensor,
            ErrorKind::InvalidLocalCoordinateSystemName
        ]
    );
}

#[test]
fn missing_coordinate_systems() {
    let doc = vai(serde_json::json!({}));
    let mut errors = Vec::new();
    validate_coordinate_systems(doc.coordinate_systems.as_ref(), &multi_lidar(), &mut errors);
    assert_eq!(kinds(&errors), vec![ErrorKind::MissingCoordinateSystems]);

    let mut errors = Vec::new();
    let camera_only = index(r#"{"cam1": {"type": "camera"}, "cam2": {"type": "camera"}}"#);
    validate_coordinate_systems(doc.coordinate_systems.as_ref(), &camera_only, &mut errors);
    assert!(errors.is_empty());
}

#[test]
fn frame_references_must_be_on_the_roster() {
    let doc = vai(serde_json::json!({
        "coordinate_systems": {"iso8855-1": {"type": "local_cs"}},
        "frames": {
            "000000000000": {
                "objects": {"o1": {"object_data": {"bbox": [
                    {"name": "a", "val": [0, 0, 1, 1], "stream": "cam9", "coordinate_system": "iso8855-1"},
                    {"name": "b", "val": [0, 0, 1, 1], "stream": "cam1", "coordinate_system": "lidar7"}
                ]}}},
                "frame_properties": {"streams": {"cam1": {}, "radar3": {}}}
            },
            "000000000001": {
                "objects": {"o1": {"object_data": {"bbox": [
                    {"name": "a", "val": [0, 0, 1, 1], "stream": "cam9"}
                ]}}}
            }
        }
    }));
    let mut errors = Vec::new();
    validate_frame_sensor_refs(&doc, &multi_lidar(), &mut errors);
    assert_eq!(
        kinds(&errors),
        vec![
            ErrorKind::ExtraSensor,
            ErrorKind::ExtraCoordinateSensor,
            ErrorKind::ExtraSensor
        ]
    );
    assert!(errors[0].message.contains("cam9"));
    assert!(errors[1].message.contains("lidar7"));
    assert!(errors[2].message.contains("radar3"));
}

#[test]
fn single_camera_ontology_skips_stream_refs() {
    let doc = vai(serde_json::json!({
        "frames": {"000000000000": {"objects": {"o1": {"object_data": {"bbox": [
            {"name": "a", "val": [0, 0, 1, 1], "stream": "front", "coordinate_system": "whatever"}
        ]}}}}}
    }));
    let mut errors = Vec::new();
    validate_frame_sensor_refs(&doc, &index(r#"{"cam1": {"type": "camera"}}"#), &mut errors);
    assert!(errors.is_empty());
}
