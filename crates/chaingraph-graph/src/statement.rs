//! Typed graph statements and their Cypher rendering.
//!
//! Every statement renders to a query returning a single integer column,
//! `n`: the number of nodes or edges created, matched, counted or deleted.

use std::fmt::Write as _;

use serde::Deserialize;

use chaingraph_core::{Label, PropertyValue, RelType};

use crate::escape::{literal, quote_identifier};

/// Name of the count column every rendered statement returns.
pub const COUNT_COLUMN: &str = "n";

/// How values are placed into the rendered query text.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Values are bound as `$p0, $p1, ...` parameters.
    #[default]
    Parameterized,
    /// Values are written into the text as escaped literals.
    Inline,
}

/// A single unit of work for the graph store.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Create one node with the given properties.
    CreateNode {
        label: Label,
        properties: Vec<(String, PropertyValue)>,
    },
    /// Count nodes of `label` whose `name` equals `name`.
    CountMatches { label: Label, name: PropertyValue },
    /// Create a `rel` edge from every `start` node named `from` to every
    /// `end` node named `to`.
    CreateEdge {
        start: Label,
        from: PropertyValue,
        end: Label,
        to: PropertyValue,
        rel: RelType,
        properties: Vec<(String, PropertyValue)>,
    },
    /// Count nodes, optionally restricted to one label.
    CountNodes { label: Option<Label> },
    /// Count edges, optionally restricted to one type.
    CountEdges { rel: Option<RelType> },
    /// Detach and delete every node.
    DeleteAll,
}

/// A rendered query: text plus the parameters it references.
#[derive(Debug, Clone, PartialEq)]
pub struct CypherQuery {
    pub text: String,
    pub params: Vec<(String, PropertyValue)>,
}

impl Statement {
    /// Render to Cypher.
    pub fn render(&self, mode: QueryMode) -> CypherQuery {
        let mut binder = Binder::new(mode);

        let text = match self {
            Self::CreateNode { label, properties } => {
                let props = binder.property_map(properties);
                format!(
                    "CREATE (x:{}{props}) RETURN count(x) AS {COUNT_COLUMN}",
                    quote_identifier(label.as_str())
                )
            }
            Self::CountMatches { label, name } => {
                let name = binder.bind("name", name);
                format!(
                    "MATCH (x:{} {{`name`: {name}}}) RETURN count(x) AS {COUNT_COLUMN}",
                    quote_identifier(label.as_str())
                )
            }
            Self::CreateEdge {
                start,
                from,
                end,
                to,
                rel,
                properties,
            } => {
                let from = binder.bind("start_name", from);
                let to = binder.bind("end_name", to);
                let props = binder.property_map(properties);
                format!(
                    "MATCH (a:{} {{`name`: {from}}}), (b:{} {{`name`: {to}}}) \
                     CREATE (a)-[r:{}{props}]->(b) \
                     RETURN count(r) AS {COUNT_COLUMN}",
                    quote_identifier(start.as_str()),
                    quote_identifier(end.as_str()),
                    quote_identifier(rel.as_str()),
                )
            }
            Self::CountNodes { label } => {
                let label = label
                    .map(|l| format!(":{}", quote_identifier(l.as_str())))
                    .unwrap_or_default();
                format!("MATCH (x{label}) RETURN count(x) AS {COUNT_COLUMN}")
            }
            Self::CountEdges { rel } => {
                let rel = rel
                    .map(|r| format!(":{}", quote_identifier(r.as_str())))
                    .unwrap_or_default();
                format!("MATCH ()-[r{rel}]->() RETURN count(r) AS {COUNT_COLUMN}")
            }
            Self::DeleteAll => {
                format!("MATCH (x) DETACH DELETE x RETURN count(x) AS {COUNT_COLUMN}")
            }
        };

        CypherQuery {
            text,
            params: binder.params,
        }
    }
}

/// Places values into query text, either as parameters or as literals.
struct Binder {
    mode: QueryMode,
    params: Vec<(String, PropertyValue)>,
}

impl Binder {
    fn new(mode: QueryMode) -> Self {
        Self {
            mode,
            params: Vec::new(),
        }
    }

    fn bind(&mut self, key: &str, value: &PropertyValue) -> String {
        match self.mode {
            QueryMode::Parameterized => {
                self.params.push((key.to_string(), value.clone()));
                format!("${key}")
            }
            QueryMode::Inline => literal(value),
        }
    }

    /// ` {`k0`: v0, `k1`: v1}`, or nothing for an empty property list.
    fn property_map(&mut self, properties: &[(String, PropertyValue)]) -> String {
        if properties.is_empty() {
            return String::new();
        }

        let mut out = String::from(" {");
        for (i, (key, value)) in properties.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let placeholder = self.bind(&format!("p{i}"), value);
            let _ = write!(out, "{}: {placeholder}", quote_identifier(key));
        }
        out.push('}');
        out
    }
}
