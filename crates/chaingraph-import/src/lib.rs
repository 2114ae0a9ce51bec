//! chaingraph-import: Loads JSON entity and relationship files into the graph.
//!
//! Reads company, industry and product records plus the relationships among
//! them, writes one node or edge per record through a `GraphStore`, isolates
//! failures to the record that caused them, and verifies the result with
//! aggregate counts.

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod source;
pub mod stats;
