//! The graph store seam used by the importer.

use async_trait::async_trait;

use crate::client::{to_query, GraphClient, GraphError};
use crate::statement::{QueryMode, Statement};

/// Something that can execute [`Statement`]s.
///
/// Each call is independent: no transaction spans more than one statement.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Execute one statement and return its count column.
    async fn execute(&self, statement: &Statement, mode: QueryMode) -> Result<i64, GraphError>;
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn execute(&self, statement: &Statement, mode: QueryMode) -> Result<i64, GraphError> {
        let rendered = statement.render(mode);
        tracing::trace!(cypher = %rendered.text, params = rendered.params.len(), "Executing statement");
        self.query_count(to_query(&rendered)).await
    }
}
