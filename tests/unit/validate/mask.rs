use super::*;

#[test]
fn parse_splits_on_last_v() {
    let runs = parse_rle("4V0#6V1#").unwrap();
    assert_eq!(
        runs,
        vec![
            RleRun {
                count: 4,
                class_index: 0
            },
            RleRun {
                count: 6,
                class_index: 1
            }
        ]
    );
    assert!(parse_rle("").unwrap().is_empty());
    assert!(parse_rle("##").unwrap().is_empty());
}

#[test]
fn well_formed_mask_passes() {
    assert!(validate_mask("4V0#6V1#", 2, Some(10)).is_empty());
    assert!(validate_mask("4V0#6V1#", 2, None).is_empty());
}

#[test]
fn index_outside_vocabulary() {
    let errs = validate_mask("4V0#6V1#", 1, Some(10));
    assert_eq!(
        errs,
        vec![MaskError::ClassIndexOutOfRange {
            index: 1,
            vocabulary_size: 1
        }]
    );
    assert_eq!(errs[0].kind(), ErrorKind::ClassIndexOutOfRange);

    let errs = validate_mask("4V-1#", 3, None);
    assert_eq!(errs[0].kind(), ErrorKind::ClassIndexOutOfRange);
}

#[test]
fn pixel_total_must_match_area() {
    let errs = validate_mask("4V0#6V1#", 2, Some(11));
    assert_eq!(
        errs,
        vec![MaskError::PixelCountMismatch {
            expected: 11,
            actual: 10
        }]
    );
}

#[test]
fn empty_vocabulary_rejects_non_empty_masks() {
    let errs = validate_mask("4V0#", 0, None);
    assert_eq!(
        errs,
        vec![
            MaskError::EmptyVocabulary,
            MaskError::ClassIndexOutOfRange {
                index: 0,
                vocabulary_size: 0
            }
        ]
    );
    assert!(validate_mask("", 0, None).is_empty());

    let kinds: Vec<ErrorKind> = validate_mask("4V0#6V1#", 0, Some(10))
        .iter()
        .map(MaskError::kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ErrorKind::EmptyVocabulary,
            ErrorKind::ClassIndexOutOfRange,
            ErrorKind::ClassIndexOutOfRange
        ]
    );
}

#[test]
fn all_problems_are_collected() {
    let errs = validate_mask("4V0#xV1#3V7#2V9#", 2, Some(100));
    let kinds: Vec<ErrorKind> = errs.iter().map(MaskError::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ErrorKind::MalformedMask,
            ErrorKind::ClassIndexOutOfRange,
            ErrorKind::ClassIndexOutOfRange
        ]
    );
}

#[test]
fn malformed_tokens() {
    for rle in ["40#", "aV1#", "4V#", "-4V0#"] {
        let errs = validate_mask(rle, 2, None);
        assert_eq!(errs.len(), 1, "{rle}");
        assert_eq!(errs[0].kind(), ErrorKind::MalformedMask, "{rle}");
    }
    assert!(parse_rle("4V0#oops#").is_err());
}
