//! Error types for the family tree
//!
//! Three kinds of failure reach callers:
//! - validation failures (blank name, bad references) that leave the tree unchanged
//! - lookups of ids that are not in the tree
//! - snapshot payloads that cannot be decoded or are internally inconsistent

use crate::types::IndividualId;

/// Top-level error for tree operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// Draft rejected before any state changed
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Operation target is not in the tree
    #[error("individual not found: {0}")]
    NotFound(IndividualId),

    /// Snapshot could not be imported
    #[error("invalid file format: {0}")]
    Format(#[from] FormatError),
}

impl TreeError {
    /// Whether the presentation layer should surface this to the user.
    ///
    /// Not-found results usually come from stale references and are
    /// tolerated quietly.
    #[inline]
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::Format(_) | Self::Validation(_))
    }

    /// Short notification text for the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Format(_) => "Invalid file format".to_string(),
            Self::Validation(e) => e.to_string(),
            Self::NotFound(id) => format!("No family member with id {id}"),
        }
    }
}

/// Draft validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Name missing or whitespace only
    #[error("name must not be blank")]
    BlankName,

    /// Draft lists the individual as its own parent or partner
    #[error("{0} cannot be related to itself")]
    SelfReference(IndividualId),

    /// Draft names a parent or partner that is not in the tree
    #[error("unknown relative: {0}")]
    UnknownRelative(IndividualId),

    /// Change would make the individual its own ancestor
    #[error("{0} would become its own ancestor")]
    LineageCycle(IndividualId),

    /// Configured canvas region has a NaN or infinite bound
    #[error("canvas region must have finite bounds")]
    NonFiniteCanvas,

    /// Position with a NaN or infinite coordinate
    #[error("position of {0} must have finite coordinates")]
    NonFinitePosition(IndividualId),
}

/// Snapshot decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Payload is not the expected JSON shape
    #[error("cannot decode snapshot: {0}")]
    Decode(String),

    /// Two records share an id
    #[error("duplicate id in snapshot: {0}")]
    DuplicateId(IndividualId),

    /// A record has no usable name
    #[error("record {0} has a blank name")]
    BlankName(IndividualId),

    /// A record's position has a NaN or infinite coordinate
    #[error("record {0} has a non-finite position")]
    NonFinitePosition(IndividualId),

    /// Records decode but their edges disagree
    #[error("snapshot is inconsistent ({count} problem(s)), first: {first}")]
    Inconsistent {
        /// Number of problems found
        count: usize,
        /// Description of the first one
        first: String,
    },

    /// Serializing the tree failed
    #[error("cannot encode snapshot: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for FormatError {
    fn from(value: serde_json::Error) -> Self {
        FormatError::Decode(value.to_string())
    }
}

/// Errors from reading or writing snapshot files
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Filesystem failure
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    /// File content rejected
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Result alias for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_show_generic_notification() {
        let err = TreeError::from(FormatError::Decode("eof".into()));
        assert!(err.is_user_visible());
        assert_eq!(err.user_message(), "Invalid file format");
    }

    #[test]
    fn not_found_is_tolerated_quietly() {
        let err = TreeError::NotFound(IndividualId::from("9"));
        assert!(!err.is_user_visible());
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn validation_converts_into_tree_error() {
        let err: TreeError = ValidationError::BlankName.into();
        assert_eq!(err, TreeError::Validation(ValidationError::BlankName));
        assert_eq!(err.user_message(), "name must not be blank");
    }
}
