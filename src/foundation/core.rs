use std::fmt;

/// Number of ASCII digits in a VisionAI frame key.
pub const FRAME_KEY_DIGITS: usize = 12;

/// Frame number parsed from a zero-padded 12-digit frame key (`"000000000042"`).
///
/// Keys order numerically. Deserialization fails closed on anything that is not exactly
/// [`FRAME_KEY_DIGITS`] ASCII digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameKey(pub u64);

impl FrameKey {
    /// Parse a frame key string.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != FRAME_KEY_DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse::<u64>().ok().map(Self)
    }

    /// Frame number.
    pub fn number(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = FRAME_KEY_DIGITS)
    }
}

impl serde::Serialize for FrameKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for FrameKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "frame key \"{s}\" must be exactly {FRAME_KEY_DIGITS} ASCII digits"
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
