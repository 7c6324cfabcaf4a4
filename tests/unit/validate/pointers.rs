use super::*;

fn vai(v: serde_json::Value) -> VisionAi {
    serde_json::from_value(v).unwrap()
}

fn frames(numbers: &[u64], id: &str, data: serde_json::Value) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for n in numbers {
        map.insert(
            format!("{n:012}"),
            serde_json::json!({"objects": {id: {"object_data": data.clone()}}}),
        );
    }
    serde_json::Value::Object(map)
}

fn check(doc: &VisionAi) -> Vec<ValidationError> {
    let present = present_frames(doc);
    let mut errors = Vec::new();
    for (id, e) in doc.objects.iter().flatten() {
        validate_entity_pointers(
            id,
            e,
            doc,
            EntityKind::Object,
            &present,
            Section::Objects,
            &mut errors,
        );
    }
    errors
}

fn kinds(errors: &[ValidationError]) -> Vec<ErrorKind> {
    errors.iter().map(|e| e.kind).collect()
}

fn object(intervals: serde_json::Value, pointers: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "o1": {"type": "car", "frame_intervals": intervals, "object_data_pointers": pointers}
    })
}

fn iv(s: i64, e: i64) -> serde_json::Value {
    serde_json::json!({"frame_start": s, "frame_end": e})
}

const BOX: &str = r#"{"bbox": [{"name": "box", "val": [0, 0, 1, 1]}]}"#;

fn box_data() -> serde_json::Value {
    serde_json::from_str(BOX).unwrap()
}

#[test]
fn consistent_pointers_pass() {
    let doc = vai(serde_json::json!({
        "frames": frames(&[0, 1, 2], "o1", box_data()),
        "objects": object(
            serde_json::json!([iv(0, 2)]),
            serde_json::json!({"box": {"type": "bbox", "frame_intervals": [iv(0, 2)]}})
        ),
        "metadata": {"schema_version": "1.0.0"}
    }));
    assert!(check(&doc).is_empty());
}

#[test]
fn dynamic_usage_outside_pointer() {
    let doc = vai(serde_json::json!({
        "frames": frames(&[0, 1, 2], "o1", box_data()),
        "objects": object(
            serde_json::json!([iv(0, 2)]),
            serde_json::json!({"box": {"type": "bbox", "frame_intervals": [iv(0, 1)]}})
        ),
        "metadata": {"schema_version": "1.0.0"}
    }));
    let errors = check(&doc);
    assert_eq!(kinds(&errors), vec![ErrorKind::DynamicUsageOutsidePointer]);
    assert!(errors[0].message.contains("[[0, 2]]"));
}

#[test]
fn pointer_outside_entity_lifetime() {
    let doc = vai(serde_json::json!({
        "frames": frames(&[0, 1, 2], "o1", box_data()),
        "objects": object(
            serde_json::json!([iv(0, 1)]),
            serde_json::json!({"box": {"type": "bbox", "frame_intervals": [iv(0, 2)]}})
        ),
        "metadata": {"schema_version": "1.0.0"}
    }));
    assert_eq!(kinds(&check(&doc)), vec![ErrorKind::PointerOutsideEntityLifetime]);
}

#[test]
fn pointer_spanning_touching_lifetime_ranges_is_outside() {
    let doc = vai(serde_json::json!({
        "frames": frames(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], "o1", box_data()),
        "objects": object(
            serde_json::json!([iv(0, 4), iv(5, 9)]),
            serde_json::json!({"box": {"type": "bbox", "frame_intervals": [iv(0, 9)]}})
        ),
        "metadata": {"schema_version": "1.0.0"}
    }));
    let errors = check(&doc);
    assert_eq!(kinds(&errors), vec![ErrorKind::PointerOutsideEntityLifetime]);
    assert!(errors[0].message.contains("[[0, 9]]"));
    assert!(errors[0].message.contains("[[0, 4], [5, 9]]"));
}

#[test]
fn key_sets_must_match() {
    let doc = vai(serde_json::json!({
        "frames": frames(&[0], "o1", box_data()),
        "objects": object(
            serde_json::json!([iv(0, 0)]),
            serde_json::json!({"mask": {"type": "binary", "frame_intervals": [iv(0, 0)]}})
        ),
        "metadata": {"schema_version": "1.0.0"}
    }));
    assert_eq!(
        kinds(&check(&doc)),
        vec![ErrorKind::MissingFromDataPointer, ErrorKind::ExtraInDataPointer]
    );
}

#[test]
fn pointer_type_must_match_data() {
    let doc = vai(serde_json::json!({
        "frames": frames(&[0], "o1", box_data()),
        "objects": object(
            serde_json::json!([iv(0, 0)]),
            serde_json::json!({"box": {"type": "poly2d", "frame_intervals": [iv(0, 0)]}})
        ),
        "metadata": {"schema_version": "1.0.0"}
    }));
    assert_eq!(kinds(&check(&doc)), vec![ErrorKind::PointerTypeMismatch]);
}

#[test]
fn duplicate_pointer_ranges_skip_containment() {
    let doc = vai(serde_json::json!({
        "frames": frames(&[0, 1, 2, 3], "o1", box_data()),
        "objects": object(
            serde_json::json!([iv(0, 3)]),
            serde_json::json!({"box": {"type": "bbox", "frame_intervals": [iv(0, 1), iv(0, 1)]}})
        ),
        "metadata": {"schema_version": "1.0.0"}
    }));
    assert_eq!(kinds(&check(&doc)), vec![ErrorKind::DuplicateInterval]);
}

#[test]
fn entity_intervals_against_document_frames() {
    let doc = vai(serde_json::json!({
        "frames": frames(&[0, 1, 4, 5], "o1", serde_json::json!({})),
        "objects": object(serde_json::json!([iv(0, 4), iv(5, 7)]), serde_json::json!({})),
        "metadata": {"schema_version": "1.0.0"}
    }));
    // Each declared range is judged on its own.
    let errors = check(&doc);
    assert_eq!(
        kinds(&errors),
        vec![ErrorKind::EntityFrameGap, ErrorKind::FrameOutOfDocumentRange]
    );
    assert!(errors[0].message.contains("[0, 4]"));
    assert!(errors[1].message.contains("[5, 7]"));

    let doc = vai(serde_json::json!({
        "frames": frames(&[0, 1, 4, 5], "o1", serde_json::json!({})),
        "objects": object(serde_json::json!([iv(1, 4)]), serde_json::json!({})),
        "metadata": {"schema_version": "1.0.0"}
    }));
    assert_eq!(kinds(&check(&doc)), vec![ErrorKind::EntityFrameGap]);
}

#[test]
fn malformed_entity_interval_is_reported() {
    let doc = vai(serde_json::json!({
        "frames": frames(&[0], "o1", serde_json::json!({})),
        "objects": object(serde_json::json!([iv(3, 1)]), serde_json::json!({})),
        "metadata": {"schema_version": "1.0.0"}
    }));
    assert_eq!(kinds(&check(&doc)), vec![ErrorKind::MalformedInterval]);
}

#[test]
fn document_frames_must_match_keys() {
    let mut errors = Vec::new();
    let doc = vai(serde_json::json!({
        "frame_intervals": [iv(0, 3)],
        "frames": {"000000000000": {}, "000000000001": {}, "000000000005": {}},
        "metadata": {"schema_version": "1.0.0"}
    }));
    validate_document_frames(&doc, &mut errors);
    assert_eq!(
        kinds(&errors),
        vec![ErrorKind::DocumentFrameMismatch, ErrorKind::DocumentFrameMismatch]
    );
    assert!(errors[0].message.contains("[[5, 5]]"));
    assert!(errors[1].message.contains("[[2, 3]]"));

    let mut errors = Vec::new();
    let doc = vai(serde_json::json!({
        "frame_intervals": [],
        "frames": {},
        "metadata": {"schema_version": "1.0.0"}
    }));
    validate_document_frames(&doc, &mut errors);
    assert_eq!(kinds(&errors), vec![ErrorKind::EmptyIntervalInput]);
}
