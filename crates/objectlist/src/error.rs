//! Error types for the list engine.
//!
//! None of these escape a rebuild, sort or edit transition. The engine logs
//! them and degrades locally: a diagnostic string in the cell, a dropped
//! write, or a `false` from a restore.

/// Failures while resolving or writing an aspect path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AspectError {
    /// A segment named a member the target type does not have.
    #[error("Cannot invoke '{segment}' on a {type_name}")]
    MissingMember { segment: String, type_name: String },

    /// The member exists but cannot be assigned.
    #[error("'{segment}' on a {type_name} is read-only")]
    ReadOnly { segment: String, type_name: String },

    /// The member rejected the value's type.
    #[error("cannot assign a {found} to '{segment}' (expected {expected})")]
    TypeMismatch {
        segment: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An intermediate segment resolved to null, so there is no target.
    #[error("'{segment}' is null")]
    NullIntermediate { segment: String },

    /// The aspect path has no segments.
    #[error("aspect path is empty")]
    EmptyPath,
}

impl AspectError {
    /// Create a missing-member error.
    pub fn missing_member(segment: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::MissingMember {
            segment: segment.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a read-only error.
    pub fn read_only(segment: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::ReadOnly {
            segment: segment.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a type-mismatch error.
    pub fn type_mismatch(
        segment: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            segment: segment.into(),
            expected,
            found,
        }
    }
}

/// Misconfiguration of a single column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    /// Bucketing needs exactly one more label than thresholds.
    #[error("labels must have one more element than thresholds ({thresholds} thresholds, {labels} labels)")]
    GroupieLengths { thresholds: usize, labels: usize },
}

/// Reasons a state snapshot cannot be applied.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The snapshot was taken against a catalog of a different size.
    #[error("snapshot has {found} columns but the list has {expected}")]
    ColumnCountMismatch { expected: usize, found: usize },

    /// The snapshot names a sort column past the end of the catalog.
    #[error("sort column {index} is out of range for {count} columns")]
    SortColumnOutOfRange { index: i32, count: usize },

    /// The payload could not be decoded.
    #[error("corrupt state payload: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failures loading or storing [`ListOptions`](crate::ListOptions).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON could not be parsed or produced.
    #[error("invalid JSON options: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML could not be parsed.
    #[error("invalid TOML options: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML could not be produced.
    #[error("cannot write TOML options: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
