//! Node and relationship loaders.
//!
//! Each loader makes one pass over its records and issues one store call per
//! record (two more per record when endpoints must be unique). A record that
//! fails validation or is rejected by the store is logged, recorded in the
//! summary and skipped. Only a lost connection stops the pass.

use serde::{Deserialize, Serialize};

use chaingraph_core::{EntityRecord, Label, PropertyValue, RawRecord, RecordError, RelationshipRecord};
use chaingraph_graph::{GraphError, GraphStore, QueryMode, Statement};

use crate::config::{default_progress_interval, default_weight_property};
use crate::error::ImportError;

/// What to do when a relationship endpoint matches zero or several nodes.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Each endpoint must match exactly one node, otherwise the record fails.
    #[default]
    Unique,
    /// Create an edge for every matching pair; no match writes nothing.
    FanOut,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub mode: QueryMode,
    pub match_policy: MatchPolicy,
    pub weight_property: String,
    pub progress_interval: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            mode: QueryMode::default(),
            match_policy: MatchPolicy::default(),
            weight_property: default_weight_property(),
            progress_interval: default_progress_interval(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The record was rejected before reaching the store.
    Validation,
    /// The store failed to execute the record's statement.
    Execution,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordFailure {
    /// 1-based position of the record in its batch.
    pub position: usize,
    pub kind: FailureKind,
    pub reason: String,
}

/// Outcome of one loader pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadSummary {
    /// Records handed to the loader.
    pub total: usize,
    /// Records whose store call completed.
    pub created: usize,
    /// Nodes or edges the store reported as written.
    pub written: i64,
    pub failures: Vec<RecordFailure>,
}

impl LoadSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Which relationship records to load and how to match their endpoints.
#[derive(Debug, Clone, Copy)]
pub struct EdgeSpec<'k> {
    pub start: Label,
    pub end: Label,
    pub from_key: &'k str,
    pub to_key: &'k str,
    pub weighted: bool,
}

/// Loads records into a graph store.
pub struct Loader<'a> {
    store: &'a dyn GraphStore,
    options: LoadOptions,
}

impl<'a> Loader<'a> {
    pub fn new(store: &'a dyn GraphStore, options: LoadOptions) -> Self {
        Self { store, options }
    }

    /// Create one `label` node per record.
    pub async fn create_nodes(
        &self,
        label: Label,
        records: &[RawRecord],
    ) -> Result<LoadSummary, GraphError> {
        let mut summary = LoadSummary {
            total: records.len(),
            ..Default::default()
        };

        for (index, raw) in records.iter().enumerate() {
            let outcome = self.create_node(label, raw).await;
            self.settle(&mut summary, index + 1, outcome)?;
        }

        tracing::info!(
            label = %label,
            total = summary.total,
            created = summary.created,
            failed = summary.failed(),
            "Node load complete"
        );
        Ok(summary)
    }

    /// Create a `start` → `end` edge per record, matching endpoints by name.
    pub async fn create_relationships(
        &self,
        start: Label,
        end: Label,
        records: &[RawRecord],
        from_key: &str,
        to_key: &str,
    ) -> Result<LoadSummary, GraphError> {
        let spec = EdgeSpec {
            start,
            end,
            from_key,
            to_key,
            weighted: false,
        };
        self.load_edges(spec, records).await
    }

    /// Like [`create_relationships`](Self::create_relationships), also
    /// storing `rel_weight` on each edge as a string.
    pub async fn create_weighted_relationships(
        &self,
        start: Label,
        end: Label,
        records: &[RawRecord],
        from_key: &str,
        to_key: &str,
    ) -> Result<LoadSummary, GraphError> {
        let spec = EdgeSpec {
            start,
            end,
            from_key,
            to_key,
            weighted: true,
        };
        self.load_edges(spec, records).await
    }

    pub async fn load_edges(
        &self,
        spec: EdgeSpec<'_>,
        records: &[RawRecord],
    ) -> Result<LoadSummary, GraphError> {
        let mut summary = LoadSummary {
            total: records.len(),
            ..Default::default()
        };

        for (index, raw) in records.iter().enumerate() {
            let outcome = self.create_edge(&spec, raw).await;
            self.settle(&mut summary, index + 1, outcome)?;
        }

        tracing::info!(
            start = %spec.start,
            end = %spec.end,
            weighted = spec.weighted,
            total = summary.total,
            created = summary.created,
            written = summary.written,
            failed = summary.failed(),
            "Relationship load complete"
        );
        Ok(summary)
    }

    async fn create_node(&self, label: Label, raw: &RawRecord) -> Result<i64, ImportError> {
        let entity = EntityRecord::from_raw(label, raw)?;
        let statement = Statement::CreateNode {
            label,
            properties: entity.properties,
        };
        Ok(self.store.execute(&statement, self.options.mode).await?)
    }

    async fn create_edge(&self, spec: &EdgeSpec<'_>, raw: &RawRecord) -> Result<i64, ImportError> {
        let record = RelationshipRecord::from_raw(raw, spec.from_key, spec.to_key, spec.weighted)?;
        record.rel.check_endpoints(spec.start, spec.end)?;

        if self.options.match_policy == MatchPolicy::Unique {
            self.require_unique(spec.start, &record.from).await?;
            self.require_unique(spec.end, &record.to).await?;
        }

        let properties = match record.weight {
            Some(weight) => vec![(
                self.options.weight_property.clone(),
                PropertyValue::String(weight),
            )],
            None => Vec::new(),
        };
        let statement = Statement::CreateEdge {
            start: spec.start,
            from: record.from,
            end: spec.end,
            to: record.to,
            rel: record.rel,
            properties,
        };
        Ok(self.store.execute(&statement, self.options.mode).await?)
    }

    async fn require_unique(&self, label: Label, name: &PropertyValue) -> Result<(), ImportError> {
        let statement = Statement::CountMatches {
            label,
            name: name.clone(),
        };
        let matches = self.store.execute(&statement, self.options.mode).await?;
        match matches {
            1 => Ok(()),
            0 => Err(RecordError::EndpointNotFound {
                label,
                name: name.to_string(),
            }
            .into()),
            _ => Err(RecordError::AmbiguousEndpoint {
                label,
                name: name.to_string(),
                matches,
            }
            .into()),
        }
    }

    /// Fold one record's outcome into the summary. Connection errors escape.
    fn settle(
        &self,
        summary: &mut LoadSummary,
        position: usize,
        outcome: Result<i64, ImportError>,
    ) -> Result<(), GraphError> {
        let total = summary.total;
        match outcome {
            Ok(written) => {
                summary.created += 1;
                summary.written += written;
                tracing::debug!(position, total, written, "Record loaded");
            }
            Err(ImportError::Graph(e)) if e.is_connection() => {
                tracing::error!(position, total, error = %e, "Lost connection to graph store");
                return Err(e);
            }
            Err(e) => {
                let kind = match e {
                    ImportError::Record(_) => FailureKind::Validation,
                    _ => FailureKind::Execution,
                };
                tracing::warn!(position, total, kind = ?kind, error = %e, "Record skipped");
                summary.failures.push(RecordFailure {
                    position,
                    kind,
                    reason: e.to_string(),
                });
            }
        }

        let interval = self.options.progress_interval;
        if interval > 0 && position % interval == 0 {
            tracing::info!(position, total, created = summary.created, "Load progress");
        }
        Ok(())
    }
}
