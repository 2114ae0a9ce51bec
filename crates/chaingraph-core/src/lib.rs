//! chaingraph-core: Shared types for the chaingraph import pipeline.
//!
//! This crate provides the foundational types used by the graph client and
//! the importer:
//! - The closed schema registry of node labels and relationship types
//! - Scalar property values as stored on nodes and edges
//! - Validated entity and relationship records
//! - Record-level validation errors

pub mod error;
pub mod record;
pub mod types;

pub use error::RecordError;
pub use record::{EntityRecord, RawRecord, RelationshipRecord};
pub use types::{Label, PropertyValue, RelType};
