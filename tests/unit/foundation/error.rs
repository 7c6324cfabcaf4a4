use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VaiError::ontology("x")
            .to_string()
            .contains("ontology error:")
    );
    assert!(
        VaiError::prerequisite("x")
            .to_string()
            .contains("prerequisite violation:")
    );
    assert!(VaiError::schema("x").to_string().contains("schema error:"));
    assert!(
        VaiError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VaiError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
