//! Run-length encoded semantic masks: `"<count>V<class_index>#..."`.

use std::collections::BTreeSet;

use crate::document::model::{DataKind, VisionAi};
use crate::validate::options::MaskAreaSource;
use crate::validate::report::{ErrorKind, Section, ValidationError};

/// One decoded run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RleRun {
    /// Number of pixels in the run.
    pub count: u64,
    /// Index into the tag vocabulary.
    pub class_index: i64,
}

/// Problems with one mask.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// A token that is not `<count>V<index>`.
    #[error("malformed RLE token \"{token}\": {reason}")]
    Malformed {
        /// Offending token.
        token: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Class index outside `[0, vocabulary_size)`.
    #[error("class index {index} is outside the tag vocabulary of {vocabulary_size} classes")]
    ClassIndexOutOfRange {
        /// Offending index.
        index: i64,
        /// Vocabulary size.
        vocabulary_size: usize,
    },

    /// A non-empty mask against an empty vocabulary.
    #[error("mask has runs but the tag vocabulary is empty")]
    EmptyVocabulary,

    /// Pixel total differs from the image area.
    #[error("mask covers {actual} pixels, expected {expected}")]
    PixelCountMismatch {
        /// Image area.
        expected: u64,
        /// Sum of run lengths.
        actual: u64,
    },
}

impl MaskError {
    /// Report kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed { .. } => ErrorKind::MalformedMask,
            Self::ClassIndexOutOfRange { .. } => ErrorKind::ClassIndexOutOfRange,
            Self::EmptyVocabulary => ErrorKind::EmptyVocabulary,
            Self::PixelCountMismatch { .. } => ErrorKind::PixelCountMismatch,
        }
    }
}

fn parse_token(token: &str) -> Result<RleRun, MaskError> {
    let malformed = |reason| MaskError::Malformed {
        token: token.to_string(),
        reason,
    };
    let (count, index) = token
        .rsplit_once('V')
        .ok_or_else(|| malformed("missing 'V' separator"))?;
    let count: i64 = count
        .parse()
        .map_err(|_| malformed("pixel count is not an integer"))?;
    let class_index: i64 = index
        .parse()
        .map_err(|_| malformed("class index is not an integer"))?;
    let count = u64::try_from(count).map_err(|_| malformed("pixel count is negative"))?;
    Ok(RleRun { count, class_index })
}

/// Decode an RLE string, stopping at the first malformed token.
pub fn parse_rle(rle: &str) -> Result<Vec<RleRun>, MaskError> {
    rle.split('#')
        .filter(|t| !t.is_empty())
        .map(parse_token)
        .collect()
}

/// Validate one mask and collect every problem.
///
/// Index bounds are checked against `vocabulary_size`; the pixel total is checked only when
/// `expected_area` is known and every token parsed.
pub fn validate_mask(
    rle: &str,
    vocabulary_size: usize,
    expected_area: Option<u64>,
) -> Vec<MaskError> {
    let mut errors = Vec::new();
    let mut runs = Vec::new();
    for token in rle.split('#').filter(|t| !t.is_empty()) {
        match parse_token(token) {
            Ok(run) => runs.push(run),
            Err(e) => errors.push(e),
        }
    }

    if !runs.is_empty() && vocabulary_size == 0 {
        errors.push(MaskError::EmptyVocabulary);
    }
    let bad: BTreeSet<i64> = runs
        .iter()
        .map(|r| r.class_index)
        .filter(|i| usize::try_from(*i).map_or(true, |i| i >= vocabulary_size))
        .collect();
    errors.extend(bad.into_iter().map(|index| MaskError::ClassIndexOutOfRange {
        index,
        vocabulary_size,
    }));

    if let Some(expected) = expected_area
        && errors.iter().all(|e| !matches!(e, MaskError::Malformed { .. }))
    {
        let actual = runs.iter().fold(0u64, |acc, r| acc.saturating_add(r.count));
        if actual != expected {
            errors.push(MaskError::PixelCountMismatch { expected, actual });
        }
    }
    errors
}

/// Validate every RLE `binary` element of object frame data.
pub(crate) fn validate_object_masks(
    doc: &VisionAi,
    vocabulary_size: usize,
    area: MaskAreaSource,
    section: Section,
    errors: &mut Vec<ValidationError>,
) {
    let mut checked = 0usize;
    for (key, frame) in &doc.frames {
        for (id, fe) in &frame.objects {
            let Some(binaries) = fe.dynamic_data.get(&DataKind::Binary) else {
                continue;
            };
            for el in binaries {
                if el.encoding.as_deref().is_some_and(|enc| enc != "rle") {
                    continue;
                }
                let Some(rle) = el.val.as_str() else {
                    continue;
                };
                let expected = match area {
                    MaskAreaSource::FromStreamIntrinsics => el
                        .stream
                        .as_deref()
                        .and_then(|s| doc.streams.as_ref()?.get(s))
                        .and_then(|s| s.image_area()),
                    MaskAreaSource::Fixed(n) => Some(n),
                    MaskAreaSource::Ignore => None,
                };
                checked += 1;
                for e in validate_mask(rle, vocabulary_size, expected) {
                    errors.push(ValidationError::new(
                        section,
                        e.kind(),
                        format!("frame {key}, {id}: mask {}: {e}", el.name),
                    ));
                }
            }
        }
    }
    tracing::debug!(masks = checked, vocabulary_size, "checked masks");
}

#[cfg(test)]
#[path = "../../tests/unit/validate/mask.rs"]
mod tests;
