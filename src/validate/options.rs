use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{VaiError, VaiResult};

/// What to do with masks when the document's tag vocabulary cannot be resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedTagPolicy {
    /// Report the vocabulary problem once and leave masks unchecked.
    #[default]
    SkipMaskValidation,
    /// Check masks against an empty vocabulary, so every non-empty mask fails.
    RejectMasks,
}

/// Where the expected pixel total of a mask comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskAreaSource {
    /// `width_px * height_px` of the element's stream, when declared.
    #[default]
    FromStreamIntrinsics,
    /// The same area for every mask.
    Fixed(u64),
    /// Never check pixel totals.
    Ignore,
}

/// Knobs of a validation run.
///
/// ```json
/// {"unresolved_tags": "reject_masks", "mask_area": {"fixed": 2073600}}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidateOptions {
    /// Mask handling for an unresolved tag vocabulary.
    pub unresolved_tags: UnresolvedTagPolicy,
    /// Expected mask area.
    pub mask_area: MaskAreaSource,
    /// When set, object frame data names must come from this set.
    pub allowed_object_data_names: Option<BTreeSet<String>>,
}

impl ValidateOptions {
    /// Parse options from a JSON string.
    pub fn from_json_str(s: &str) -> VaiResult<Self> {
        serde_json::from_str(s).map_err(|e| VaiError::serde(format!("parse options JSON: {e}")))
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VaiResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            VaiError::serde(format!("open options JSON '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| VaiError::serde(format!("parse options JSON: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/validate/options.rs"]
mod tests;
