use super::*;

fn iv(start: u64, end: u64) -> FrameInterval {
    FrameInterval { start, end }
}

#[test]
fn merge_produces_minimal_ranges() {
    let out = merge([0, 1, 2, 3, 5, 8, 9, 12]).unwrap();
    assert_eq!(out, vec![iv(0, 3), iv(5, 5), iv(8, 9), iv(12, 12)]);
}

#[test]
fn merge_is_order_independent_and_idempotent() {
    let base = [0, 1, 2, 3, 5, 8, 9, 12];
    let expected = IntervalSet::merge(base).unwrap();

    let permutations: [[i64; 8]; 3] = [
        [12, 9, 8, 5, 3, 2, 1, 0],
        [5, 0, 12, 2, 9, 1, 8, 3],
        [3, 12, 1, 8, 0, 9, 2, 5],
    ];
    for p in permutations {
        assert_eq!(IntervalSet::merge(p).unwrap(), expected);
    }

    let again = IntervalSet::from_frames(expected.frames()).unwrap();
    assert_eq!(again, expected);
}

#[test]
fn merge_tolerates_repeated_points() {
    let out = merge([4, 4, 5, 5, 5]).unwrap();
    assert_eq!(out, vec![iv(4, 5)]);
}

#[test]
fn merge_rejects_empty_and_negative() {
    assert_eq!(merge(Vec::<i64>::new()), Err(IntervalError::Empty));
    assert_eq!(
        merge([1, -2]),
        Err(IntervalError::InvalidRange { start: -2, end: -2 })
    );
}

#[test]
fn contains_requires_a_single_enclosing_range() {
    assert!(contains(&[iv(2, 3)], &[iv(0, 5)]));
    assert!(!contains(&[iv(2, 6)], &[iv(0, 5), iv(7, 9)]));
    // Touching outer ranges are still two ranges when not normalized.
    assert!(!contains(&[iv(2, 6)], &[iv(0, 5), iv(6, 9)]));
    assert!(contains(&[], &[iv(0, 1)]));
}

#[test]
fn set_contains_and_uncontained() {
    let outer = IntervalSet::from_declared([(0, 5), (7, 9)]).unwrap();
    let inner = IntervalSet::from_declared([(1, 2), (4, 8)]).unwrap();
    assert!(!outer.contains(&inner));
    assert_eq!(outer.uncontained(&inner), vec![iv(4, 8)]);

    let inner_ok = IntervalSet::merge([0, 1, 7, 8, 9]).unwrap();
    assert!(outer.contains(&inner_ok));
}

#[test]
fn declared_ranges_coalesce_when_adjacent() {
    let s = IntervalSet::from_declared([(6, 9), (0, 5)]).unwrap();
    assert_eq!(s.ranges(), &[iv(0, 9)]);
    assert_eq!(s.len_frames(), 10);
}

#[test]
fn declared_ranges_reject_duplicates_and_overlaps() {
    assert_eq!(
        IntervalSet::from_declared([(0, 3), (0, 3)]),
        Err(IntervalError::Duplicate(iv(0, 3)))
    );
    assert_eq!(
        IntervalSet::from_declared([(0, 3), (3, 6)]),
        Err(IntervalError::Overlap(iv(0, 3), iv(3, 6)))
    );
    assert_eq!(
        IntervalSet::from_declared([(0, 10), (2, 3)]),
        Err(IntervalError::Overlap(iv(0, 10), iv(2, 3)))
    );
}

#[test]
fn declared_ranges_reject_malformed_bounds() {
    assert_eq!(
        IntervalSet::from_declared([(5, 2)]),
        Err(IntervalError::InvalidRange { start: 5, end: 2 })
    );
    assert_eq!(
        IntervalSet::from_declared([(-1, 2)]),
        Err(IntervalError::InvalidRange { start: -1, end: 2 })
    );
    assert_eq!(
        IntervalSet::from_declared(Vec::new()),
        Err(IntervalError::Empty)
    );
}

#[test]
fn declared_ranges_stay_unmerged() {
    let raw = declared_ranges([(5, 9), (0, 4)]).unwrap();
    assert_eq!(raw, vec![iv(0, 4), iv(5, 9)]);
    assert_eq!(uncontained(&[iv(0, 9), iv(1, 3)], &raw), vec![iv(0, 9)]);
    assert!(!contains(&[iv(3, 6)], &raw));
    assert_eq!(
        declared_ranges([(0, 4), (4, 9)]),
        Err(IntervalError::Overlap(iv(0, 4), iv(4, 9)))
    );
    assert_eq!(
        declared_ranges([(1, 1), (1, 1)]),
        Err(IntervalError::Duplicate(iv(1, 1)))
    );
}

#[test]
fn frame_queries() {
    let s = IntervalSet::merge([2, 3, 4, 10]).unwrap();
    assert!(s.contains_frame(3));
    assert!(!s.contains_frame(5));
    assert!(!s.contains_frame(0));
    assert_eq!(s.first_frame(), Some(2));
    assert_eq!(s.last_frame(), Some(10));
    assert_eq!(s.frames().collect::<Vec<_>>(), vec![2, 3, 4, 10]);
    assert_eq!(s.to_string(), "[[2, 4], [10, 10]]");
}

#[test]
fn difference_lists_uncovered_frames() {
    let declared = IntervalSet::from_declared([(0, 9)]).unwrap();
    let present = IntervalSet::merge([0, 1, 2, 5, 9, 12]).unwrap();
    assert_eq!(declared.difference(&present), vec![iv(3, 4), iv(6, 8)]);
    assert_eq!(present.difference(&declared), vec![iv(12, 12)]);
    assert!(declared.difference(&declared).is_empty());
    assert_eq!(declared.difference(&IntervalSet::default()), vec![iv(0, 9)]);
}
