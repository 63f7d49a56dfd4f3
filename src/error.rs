//! Error types for point accounting.
//!
//! All errors that can occur while editing a character or pricing its
//! pending changes are represented by the `PointError` enum.

use crate::trait_id::TraitId;
use crate::value::TraitKind;
use thiserror::Error;

/// Format a cycle path as a readable string.
fn format_cycle_path(path: &[TraitId]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors that can occur while tracking or pricing character changes.
///
/// None of these are transient: they are surfaced to the caller so the
/// edit that caused them can be rejected, and nothing is retried.
///
/// # Examples
///
/// ```rust
/// use pointbuy::PointError;
///
/// let err = PointError::Lookup("appearance12".to_string());
/// assert_eq!(err.to_string(), "No price listed for key: appearance12");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PointError {
    /// A trait or `trait + value` key is absent from the price table.
    #[error("No price listed for key: {0}")]
    Lookup(String),

    /// A mutation was applied to a trait of the wrong kind, or a delta
    /// was requested under a different kind than the one it was created with.
    #[error("Type mismatch for trait {trait_id}: expected {expected}, found {found}")]
    TypeMismatch {
        trait_id: TraitId,
        expected: TraitKind,
        found: TraitKind,
    },

    /// A cost was requested for a trait whose pricing must be supplied
    /// by the caller, or the supplied pricing does not fit the trait.
    #[error("Cost configuration error for trait {trait_id}: {reason}")]
    Configuration { trait_id: TraitId, reason: String },

    /// An array element was replaced without saying which one.
    #[error("Missing element index for array trait: {0}")]
    MissingIndex(TraitId),

    /// An argument outside the accepted domain (e.g. strength below 1).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The baseline entity has no trait with this name.
    #[error("Unknown trait: {0}")]
    UnknownTrait(TraitId),

    /// An array element index past the end of the pending list.
    #[error("Index {index} out of range for trait {trait_id} (length {len})")]
    IndexOutOfRange {
        trait_id: TraitId,
        index: usize,
        len: usize,
    },

    /// Two elements of one array trait would share a local identity.
    #[error("Duplicate element {key} in trait {trait_id}")]
    DuplicateElement { trait_id: TraitId, key: String },

    /// The secondary-attribute follow graph contains a cycle.
    #[error("Cycle detected: {}", format_cycle_path(.path))]
    Cycle { path: Vec<TraitId> },

    /// No stored character has this id.
    #[error("Character not found: {0}")]
    NotFound(u64),

    /// A JSON document could not be read or written.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PointError {
    /// Create a configuration error for a trait.
    pub fn configuration(trait_id: &TraitId, reason: impl Into<String>) -> Self {
        Self::Configuration {
            trait_id: trait_id.clone(),
            reason: reason.into(),
        }
    }

    /// Create a type mismatch error for a trait.
    pub fn type_mismatch(trait_id: &TraitId, expected: TraitKind, found: TraitKind) -> Self {
        Self::TypeMismatch {
            trait_id: trait_id.clone(),
            expected,
            found,
        }
    }
}

impl From<serde_json::Error> for PointError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
