use thiserror::Error;

use crate::types::{Label, RelType};

/// A record failed validation before any statement was built for it.
///
/// Always scoped to a single record: the loaders log it and move on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Missing required key: {0}")]
    MissingKey(String),

    #[error("Value for key {key} is not a scalar")]
    NotScalar { key: String },

    #[error("Empty property name")]
    EmptyPropertyName,

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Unknown relationship type: {0}")]
    UnknownRelType(String),

    #[error("Relationship type {rel} cannot connect {start} to {end}")]
    RelTypeMismatch {
        rel: RelType,
        start: Label,
        end: Label,
    },

    #[error("No {label} node named {name}")]
    EndpointNotFound { label: Label, name: String },

    #[error("{matches} {label} nodes named {name}, expected exactly one")]
    AmbiguousEndpoint {
        label: Label,
        name: String,
        matches: i64,
    },
}
