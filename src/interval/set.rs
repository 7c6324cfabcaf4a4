use std::collections::BTreeSet;
use std::fmt;

/// Closed frame range `[start, end]`; both bounds are inclusive.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameInterval {
    /// First frame of the range.
    #[serde(rename = "frame_start")]
    pub start: u64,
    /// Last frame of the range (inclusive).
    #[serde(rename = "frame_end")]
    pub end: u64,
}

impl FrameInterval {
    /// Build a range from raw (possibly negative) bounds.
    pub fn new(start: i64, end: i64) -> Result<Self, IntervalError> {
        if start < 0 || end < 0 || start > end {
            return Err(IntervalError::InvalidRange { start, end });
        }
        Ok(Self {
            start: start as u64,
            end: end as u64,
        })
    }

    /// Single-frame range.
    pub fn point(frame: u64) -> Self {
        Self {
            start: frame,
            end: frame,
        }
    }

    /// Number of frames covered.
    pub fn len_frames(self) -> u64 {
        self.end - self.start + 1
    }

    /// Whether `frame` lies inside this range.
    pub fn contains_frame(self, frame: u64) -> bool {
        self.start <= frame && frame <= self.end
    }

    /// Whether `other` lies entirely inside this range.
    pub fn contains_interval(self, other: FrameInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for FrameInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Failures while building an [`IntervalSet`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// No points or ranges were supplied.
    #[error("interval input is empty")]
    Empty,

    /// A range with `start > end` or a negative bound.
    #[error("invalid range, start: {start}, end: {end}")]
    InvalidRange {
        /// Declared start.
        start: i64,
        /// Declared end.
        end: i64,
    },

    /// The same explicit range was declared twice.
    #[error("duplicated interval {0}")]
    Duplicate(FrameInterval),

    /// Two explicitly declared ranges share at least one frame.
    #[error("interval {0} overlaps interval {1}")]
    Overlap(FrameInterval, FrameInterval),
}

/// Minimal sorted list of disjoint, non-adjacent closed ranges.
///
/// Construction always normalizes: ranges are sorted, and ranges that touch (`b.start - a.end ==
/// 1`) are coalesced. Two normalized sets are equal iff they cover the same frames.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct IntervalSet {
    ranges: Vec<FrameInterval>,
}

impl IntervalSet {
    /// Merge a set of frame numbers into minimal ranges.
    ///
    /// Duplicated points are harmless; order does not matter.
    pub fn merge(points: impl IntoIterator<Item = i64>) -> Result<Self, IntervalError> {
        let mut frames = BTreeSet::new();
        for p in points {
            if p < 0 {
                return Err(IntervalError::InvalidRange { start: p, end: p });
            }
            frames.insert(p as u64);
        }
        Self::from_frames(frames)
    }

    /// Merge non-negative frame numbers into minimal ranges.
    pub fn from_frames(frames: impl IntoIterator<Item = u64>) -> Result<Self, IntervalError> {
        let sorted: BTreeSet<u64> = frames.into_iter().collect();
        if sorted.is_empty() {
            return Err(IntervalError::Empty);
        }
        let mut ranges: Vec<FrameInterval> = Vec::new();
        for f in sorted {
            match ranges.last_mut() {
                Some(last) if f == last.end + 1 => last.end = f,
                _ => ranges.push(FrameInterval::point(f)),
            }
        }
        Ok(Self { ranges })
    }

    /// Normalize explicitly declared `(start, end)` ranges.
    ///
    /// Unlike [`IntervalSet::merge`], a declaration must not repeat itself: see
    /// [`declared_ranges`]. Ranges that are merely adjacent are coalesced.
    pub fn from_declared(
        ranges: impl IntoIterator<Item = (i64, i64)>,
    ) -> Result<Self, IntervalError> {
        let mut out: Vec<FrameInterval> = Vec::new();
        for r in declared_ranges(ranges)? {
            match out.last_mut() {
                Some(last) if r.start == last.end + 1 => last.end = r.end,
                _ => out.push(r),
            }
        }
        Ok(Self { ranges: out })
    }

    /// Normalized ranges in ascending order.
    pub fn ranges(&self) -> &[FrameInterval] {
        &self.ranges
    }

    /// Whether the set covers no frames.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// First covered frame.
    pub fn first_frame(&self) -> Option<u64> {
        self.ranges.first().map(|r| r.start)
    }

    /// Last covered frame.
    pub fn last_frame(&self) -> Option<u64> {
        self.ranges.last().map(|r| r.end)
    }

    /// Total number of covered frames.
    pub fn len_frames(&self) -> u64 {
        self.ranges.iter().map(|r| r.len_frames()).sum()
    }

    /// Whether `frame` is covered.
    pub fn contains_frame(&self, frame: u64) -> bool {
        self.range_index_for(frame)
            .is_some_and(|i| self.ranges[i].contains_frame(frame))
    }

    /// Iterate every covered frame in ascending order.
    pub fn frames(&self) -> impl Iterator<Item = u64> + '_ {
        self.ranges.iter().flat_map(|r| r.start..=r.end)
    }

    /// Whether every range of `inner` lies inside a single range of `self`.
    pub fn contains(&self, inner: &IntervalSet) -> bool {
        self.uncontained(inner).is_empty()
    }

    /// Ranges of `inner` that do not fit inside a single range of `self`.
    pub fn uncontained(&self, inner: &IntervalSet) -> Vec<FrameInterval> {
        inner
            .ranges
            .iter()
            .copied()
            .filter(|r| {
                !self
                    .range_index_for(r.start)
                    .is_some_and(|i| self.ranges[i].contains_interval(*r))
            })
            .collect()
    }

    /// Frames covered by `self` but not by `other`, as minimal ranges.
    pub fn difference(&self, other: &IntervalSet) -> Vec<FrameInterval> {
        let mut out = Vec::new();
        for r in &self.ranges {
            let mut cursor = r.start;
            let mut exhausted = false;
            for o in other.ranges.iter().filter(|o| o.end >= r.start && o.start <= r.end) {
                if o.start > cursor {
                    out.push(FrameInterval {
                        start: cursor,
                        end: o.start - 1,
                    });
                }
                if o.end >= r.end {
                    exhausted = true;
                    break;
                }
                cursor = cursor.max(o.end + 1);
            }
            if !exhausted && cursor <= r.end {
                out.push(FrameInterval {
                    start: cursor,
                    end: r.end,
                });
            }
        }
        out
    }

    // Index of the last range starting at or before `frame`.
    fn range_index_for(&self, frame: u64) -> Option<usize> {
        let idx = self.ranges.partition_point(|r| r.start <= frame);
        idx.checked_sub(1)
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, r) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{r}")?;
        }
        write!(f, "]")
    }
}

/// Check explicitly declared `(start, end)` ranges and return them sorted but unmerged.
///
/// Identical ranges are [`IntervalError::Duplicate`] and ranges sharing a frame are
/// [`IntervalError::Overlap`]. Touching ranges stay separate, so they can serve as the outer side
/// of a containment check.
pub fn declared_ranges(
    ranges: impl IntoIterator<Item = (i64, i64)>,
) -> Result<Vec<FrameInterval>, IntervalError> {
    let mut parsed = ranges
        .into_iter()
        .map(|(s, e)| FrameInterval::new(s, e))
        .collect::<Result<Vec<_>, _>>()?;
    if parsed.is_empty() {
        return Err(IntervalError::Empty);
    }
    parsed.sort();
    for pair in parsed.windows(2) {
        let (p, r) = (pair[0], pair[1]);
        if p == r {
            return Err(IntervalError::Duplicate(r));
        }
        if r.start <= p.end {
            return Err(IntervalError::Overlap(p, r));
        }
    }
    Ok(parsed)
}

/// Merge frame numbers into the minimal sorted list of closed ranges.
pub fn merge(points: impl IntoIterator<Item = i64>) -> Result<Vec<FrameInterval>, IntervalError> {
    IntervalSet::merge(points).map(|s| s.ranges)
}

/// Ranges of `inner` that do not lie entirely within some single range of `outer`.
pub fn uncontained(inner: &[FrameInterval], outer: &[FrameInterval]) -> Vec<FrameInterval> {
    inner
        .iter()
        .copied()
        .filter(|r| !outer.iter().any(|o| o.contains_interval(*r)))
        .collect()
}

/// Whether every range in `inner` lies entirely within some single range of `outer`.
///
/// Neither slice needs to be normalized. A range that spans two touching-but-separate outer
/// ranges is *not* contained.
pub fn contains(inner: &[FrameInterval], outer: &[FrameInterval]) -> bool {
    uncontained(inner, outer).is_empty()
}

#[cfg(test)]
#[path = "../../tests/unit/interval/set.rs"]
mod tests;
