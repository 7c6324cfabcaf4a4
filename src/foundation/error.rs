/// Convenience result type used across the crate.
pub type VaiResult<T> = Result<T, VaiError>;

/// Contract-level failures.
///
/// A document that fails validation is *not* an error in this sense: data problems are collected
/// into a [`crate::ValidationReport`]. `VaiError` is reserved for inputs the engine cannot work
/// with at all (a broken ontology, undecodable JSON, a caller passing inconsistent state).
#[derive(thiserror::Error, Debug)]
pub enum VaiError {
    /// The ontology cannot be compiled into an index.
    #[error("ontology error: {0}")]
    Ontology(String),

    /// A caller-side contract was broken before validation could start.
    #[error("prerequisite violation: {0}")]
    Prerequisite(String),

    /// Structural decode of a document failed (shape, not semantics).
    #[error("schema error: {0}")]
    Schema(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VaiError {
    /// Build a [`VaiError::Ontology`] value.
    pub fn ontology(msg: impl Into<String>) -> Self {
        Self::Ontology(msg.into())
    }

    /// Build a [`VaiError::Prerequisite`] value.
    pub fn prerequisite(msg: impl Into<String>) -> Self {
        Self::Prerequisite(msg.into())
    }

    /// Build a [`VaiError::Schema`] value.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Build a [`VaiError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
