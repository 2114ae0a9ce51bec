//! Post-load verification via aggregate counts.

use std::collections::BTreeMap;

use serde::Serialize;

use chaingraph_core::{Label, RelType};
use chaingraph_graph::{GraphStore, QueryMode, Statement};

/// Aggregate counts read back from the store.
///
/// A metric whose query failed is `None` (`null` in JSON).
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GraphStats {
    pub total_nodes: Option<i64>,
    pub total_edges: Option<i64>,
    pub per_label: BTreeMap<Label, Option<i64>>,
    pub per_relationship: BTreeMap<RelType, Option<i64>>,
}

/// Count nodes and edges, one query per metric. Read-only.
pub async fn summarize(store: &dyn GraphStore, mode: QueryMode) -> GraphStats {
    let mut stats = GraphStats {
        total_nodes: count(store, mode, "total_nodes", Statement::CountNodes { label: None }).await,
        total_edges: count(store, mode, "total_edges", Statement::CountEdges { rel: None }).await,
        ..Default::default()
    };

    for label in Label::ALL {
        let statement = Statement::CountNodes { label: Some(label) };
        let n = count(store, mode, label.as_str(), statement).await;
        stats.per_label.insert(label, n);
    }

    for rel in RelType::ALL {
        let statement = Statement::CountEdges { rel: Some(rel) };
        let n = count(store, mode, rel.as_str(), statement).await;
        stats.per_relationship.insert(rel, n);
    }

    tracing::info!(
        total_nodes = ?stats.total_nodes,
        total_edges = ?stats.total_edges,
        "Graph summary"
    );
    stats
}

async fn count(
    store: &dyn GraphStore,
    mode: QueryMode,
    metric: &str,
    statement: Statement,
) -> Option<i64> {
    match store.execute(&statement, mode).await {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(metric, error = %e, "Count query failed");
            None
        }
    }
}
