//! In-memory graph store.
//!
//! Interprets [`Statement`]s directly instead of parsing Cypher, with the same
//! matching semantics as the Neo4j queries they render to: value match on
//! `name`, fan-out over duplicates, and a zero-row no-op when an endpoint is
//! absent. Backs `--dry-run` and the importer's tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use chaingraph_core::{Label, PropertyValue, RelType};

use crate::client::GraphError;
use crate::statement::{QueryMode, Statement};
use crate::store::GraphStore;

/// A node held by the in-memory store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredNode {
    pub label: Label,
    pub properties: Vec<(String, PropertyValue)>,
}

impl StoredNode {
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    fn is(&self, label: Label, name: &PropertyValue) -> bool {
        self.label == label && self.property("name") == Some(name)
    }
}

/// An edge held by the in-memory store. Endpoints index into the node list.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEdge {
    pub start: usize,
    pub end: usize,
    pub rel: RelType,
    pub properties: Vec<(String, PropertyValue)>,
}

impl StoredEdge {
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

type RejectFn = Box<dyn Fn(&Statement) -> bool + Send + Sync>;

#[derive(Default)]
struct State {
    nodes: Vec<StoredNode>,
    edges: Vec<StoredEdge>,
    last_query: Option<String>,
    disconnected: bool,
}

/// A [`GraphStore`] that keeps the whole graph in memory.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    reject: Option<RejectFn>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every statement for which `predicate` returns true, the way a
    /// server rejects a malformed statement.
    pub fn with_rejection(
        mut self,
        predicate: impl Fn(&Statement) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.reject = Some(Box::new(predicate));
        self
    }

    /// Fail every subsequent statement with a connection error.
    pub fn disconnect(&self) {
        self.lock().disconnected = true;
    }

    pub fn nodes(&self) -> Vec<StoredNode> {
        self.lock().nodes.clone()
    }

    pub fn edges(&self) -> Vec<StoredEdge> {
        self.lock().edges.clone()
    }

    /// Text of the most recently executed statement.
    pub fn last_query(&self) -> Option<String> {
        self.lock().last_query.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl GraphStore for InMemoryStore {
    async fn execute(&self, statement: &Statement, mode: QueryMode) -> Result<i64, GraphError> {
        let mut state = self.lock();

        if state.disconnected {
            return Err(GraphError::Connection("in-memory store disconnected".into()));
        }
        state.last_query = Some(statement.render(mode).text);
        if self.reject.as_ref().is_some_and(|reject| reject(statement)) {
            return Err(GraphError::Rejected(format!("{statement:?}")));
        }

        let count = match statement {
            Statement::CreateNode { label, properties } => {
                state.nodes.push(StoredNode {
                    label: *label,
                    properties: properties.clone(),
                });
                1
            }
            Statement::CountMatches { label, name } => {
                state.nodes.iter().filter(|n| n.is(*label, name)).count()
            }
            Statement::CreateEdge {
                start,
                from,
                end,
                to,
                rel,
                properties,
            } => {
                let starts = matching(&state.nodes, *start, from);
                let ends = matching(&state.nodes, *end, to);
                let mut created = 0;
                for &s in &starts {
                    for &e in &ends {
                        state.edges.push(StoredEdge {
                            start: s,
                            end: e,
                            rel: *rel,
                            properties: properties.clone(),
                        });
                        created += 1;
                    }
                }
                created
            }
            Statement::CountNodes { label } => state
                .nodes
                .iter()
                .filter(|n| label.map_or(true, |l| n.label == l))
                .count(),
            Statement::CountEdges { rel } => state
                .edges
                .iter()
                .filter(|e| rel.map_or(true, |r| e.rel == r))
                .count(),
            Statement::DeleteAll => {
                let deleted = state.nodes.len();
                state.nodes.clear();
                state.edges.clear();
                deleted
            }
        };

        Ok(count as i64)
    }
}

fn matching(nodes: &[StoredNode], label: Label, name: &PropertyValue) -> Vec<usize> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is(label, name))
        .map(|(i, _)| i)
        .collect()
}
