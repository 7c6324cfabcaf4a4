use super::*;
use serde_json::json;

#[test]
fn labels_upper_case() {
    assert_eq!(normalize_label("Red"), "RED");
    assert_eq!(normalize_label("occluded_ratio"), "OCCLUDED_RATIO");
    assert_eq!(normalize_label(normalize_label("x").as_str()), "X");
}

#[test]
fn scalar_values() {
    assert_eq!(normalize_value(&json!("blue")), vec!["BLUE"]);
    assert_eq!(normalize_value(&json!(true)), vec!["TRUE"]);
    assert_eq!(normalize_value(&json!(3)), vec!["3"]);
    assert_eq!(normalize_value(&json!(0.5)), vec!["0.5"]);
    assert!(normalize_value(&json!(null)).is_empty());
}

#[test]
fn arrays_contribute_each_element() {
    assert_eq!(
        normalize_value(&json!(["car", "Truck", null, 1])),
        vec!["CAR", "TRUCK", "1"]
    );
}
