//! Case-insensitive label normalization.
//!
//! Ontology class names, attribute names and option values are compared case-insensitively.
//! Every comparison goes through these two functions, applied once when the ontology is compiled
//! and once when document attributes are collected.

/// Normalize a class name, attribute name or option value for comparison.
pub fn normalize_label(label: &str) -> String {
    label.to_uppercase()
}

/// Normalize an attribute value into the set of labels it contributes.
///
/// Scalars contribute one label, arrays contribute one label per element, and `null`
/// contributes nothing. Booleans render as `TRUE`/`FALSE` and numbers use their JSON text.
pub fn normalize_value(val: &serde_json::Value) -> Vec<String> {
    match val {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Array(items) => items.iter().filter_map(scalar_label).collect(),
        other => scalar_label(other).into_iter().collect(),
    }
}

fn scalar_label(val: &serde_json::Value) -> Option<String> {
    match val {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(normalize_label(s)),
        serde_json::Value::Bool(b) => Some(normalize_label(&b.to_string())),
        serde_json::Value::Number(n) => Some(n.to_string()),
        nested => Some(normalize_label(&nested.to_string())),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/label.rs"]
mod tests;
