use super::*;
use crate::ontology::model::Ontology;

fn index(tags: Option<&str>) -> OntologyIndex {
    let tags = tags.map(|t| format!(r#", "tags": {t}"#)).unwrap_or_default();
    let o = Ontology::from_json_str(&format!(
        r#"{{"streams": {{"cam1": {{"type": "camera"}}}}{tags}}}"#
    ))
    .unwrap();
    OntologyIndex::build(&o).unwrap()
}

fn vai(tags: serde_json::Value) -> VisionAi {
    serde_json::from_value(serde_json::json!({
        "tags": tags,
        "metadata": {"schema_version": "1.0.0"}
    }))
    .unwrap()
}

fn seg_tag(vec: serde_json::Value) -> serde_json::Value {
    serde_json::json!({"t1": {"type": "semantic_segmentation_RLE", "tag_data": {"vec": vec}}})
}

#[test]
fn resolves_declared_vocabulary() {
    let idx = index(Some(r#"{"road": {}, "car": {}, "sky": {}}"#));
    let r = resolve_tag_vocabulary(
        &vai(seg_tag(serde_json::json!([{"type": "values", "val": ["road", "sky"]}]))),
        &idx,
    );
    assert_eq!(r, TagVocabulary::Resolved(vec!["road".into(), "sky".into()]));
    assert_eq!(r.size(), Some(2));
}

#[test]
fn no_ontology_tags_means_empty_vocabulary() {
    let r = resolve_tag_vocabulary(&vai(serde_json::json!({})), &index(None));
    assert_eq!(r, TagVocabulary::NotDeclared);
    assert_eq!(r.size(), Some(0));
}

#[test]
fn unresolved_cases() {
    let idx = index(Some(r#"{"classes": ["road", "car"]}"#));
    let cases = [
        serde_json::json!({}),
        serde_json::json!({"t1": {"type": "bbox_tags"}}),
        seg_tag(serde_json::json!([])),
        seg_tag(serde_json::json!([
            {"type": "values", "val": ["road"]},
            {"type": "values", "val": []}
        ])),
        seg_tag(serde_json::json!([{"type": "probabilities", "val": ["road"]}])),
        seg_tag(serde_json::json!([{"type": "values", "val": ["road", "tree"]}])),
        seg_tag(serde_json::json!([{"type": "values", "val": [1]}])),
    ];
    for tags in cases {
        let r = resolve_tag_vocabulary(&vai(tags.clone()), &idx);
        assert!(matches!(r, TagVocabulary::Unresolved(_)), "{tags}");
        assert_eq!(r.size(), None);
    }
}

#[test]
fn vocabulary_size_counts_distinct_classes() {
    assert_eq!(
        TagVocabulary::Resolved(vec!["a".into(), "b".into(), "a".into()]).size(),
        Some(2)
    );
}
