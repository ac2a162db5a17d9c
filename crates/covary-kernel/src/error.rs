//! Error types for covary kernel operations.

use crate::kind::{ArrayKind, ElementKind};

/// Errors outside the store decision itself: malformed tables,
/// configuration, and fixture input.
#[derive(Debug, thiserror::Error)]
pub enum CovaryError {
    /// A compatibility table entry breaks a structural invariant.
    #[error("table invariant violated: {description}")]
    TableInvariant { description: String },

    /// Configuration is well-formed TOML but semantically invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed.
    #[error("failed to parse configuration {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A fixture document is missing a field or has the wrong shape.
    #[error("invalid fixture: {0}")]
    InvalidFixture(String),

    /// Storage or I/O failure.
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A store that was attempted and refused.
///
/// Variants are listed by decreasing precedence: a bounds failure is
/// always reported ahead of a nullability or type failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: i64, length: usize },

    #[error("null cannot be stored into {array_kind} array")]
    NullNotPermitted { array_kind: ArrayKind },

    #[error("{value_kind} value cannot be stored into {array_kind} array")]
    StoreIncompatible {
        array_kind: ArrayKind,
        value_kind: ElementKind,
    },
}

impl StoreError {
    /// Stable failure class name, shared with witnesses and fixtures.
    pub fn class(&self) -> &'static str {
        match self {
            Self::IndexOutOfBounds { .. } => failure_class::INDEX_OUT_OF_BOUNDS,
            Self::NullNotPermitted { .. } => failure_class::NULL_NOT_PERMITTED,
            Self::StoreIncompatible { .. } => failure_class::STORE_INCOMPATIBLE,
        }
    }
}

/// Failure class constants.
pub mod failure_class {
    pub const INDEX_OUT_OF_BOUNDS: &str = "index_out_of_bounds";
    pub const NULL_NOT_PERMITTED: &str = "null_not_permitted";
    pub const STORE_INCOMPATIBLE: &str = "store_incompatible";
    /// Conformance-only: the observed outcome differs from the table.
    pub const OUTCOME_MISMATCH: &str = "outcome_mismatch";
    /// Conformance-only: the slot contents disagree with the outcome.
    pub const SLOT_MISMATCH: &str = "slot_mismatch";
}
