//! chaingraph-graph — the graph store boundary.
//!
//! The importer never talks to Neo4j directly. It builds [`Statement`]s and
//! hands them to a [`GraphStore`], which is either the Neo4j-backed
//! [`GraphClient`] or the [`InMemoryStore`] used by tests and dry runs.

pub mod client;
pub mod escape;
pub mod memory;
pub mod statement;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::InMemoryStore;
pub use statement::{CypherQuery, QueryMode, Statement};
pub use store::GraphStore;
