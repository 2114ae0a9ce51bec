//! Core domain types for the industry knowledge graph.
//!
//! Labels and relationship types form a closed registry: records naming
//! anything outside of it are rejected before a statement is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

// ── Labels ────────────────────────────────────────────────────────

/// The entity category of a node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Company,
    Industry,
    Product,
}

impl Label {
    /// Every label, in load order.
    pub const ALL: [Label; 3] = [Label::Company, Label::Industry, Label::Product];

    /// The label as written into the graph.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Industry => "industry",
            Self::Product => "product",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "company" => Ok(Self::Company),
            "industry" => Ok(Self::Industry),
            "product" => Ok(Self::Product),
            _ => Err(RecordError::UnknownLabel(s.to_string())),
        }
    }
}

// ── Relationship Types ────────────────────────────────────────────

/// A permitted relationship type, keyed by the `rel` tag found in records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelType {
    /// company → industry
    #[serde(rename = "所属行业")]
    BelongsToIndustry,
    /// industry → parent industry
    #[serde(rename = "上级行业")]
    ParentIndustry,
    /// company → product
    #[serde(rename = "主营产品")]
    MainProduct,
    /// product → upstream product
    #[serde(rename = "上游材料")]
    UpstreamMaterial,
}

impl RelType {
    pub const ALL: [RelType; 4] = [
        RelType::BelongsToIndustry,
        RelType::ParentIndustry,
        RelType::MainProduct,
        RelType::UpstreamMaterial,
    ];

    /// The tag used both in input records and as the Cypher relationship type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BelongsToIndustry => "所属行业",
            Self::ParentIndustry => "上级行业",
            Self::MainProduct => "主营产品",
            Self::UpstreamMaterial => "上游材料",
        }
    }

    /// The (start, end) labels this relationship type connects.
    pub fn endpoints(&self) -> (Label, Label) {
        match self {
            Self::BelongsToIndustry => (Label::Company, Label::Industry),
            Self::ParentIndustry => (Label::Industry, Label::Industry),
            Self::MainProduct => (Label::Company, Label::Product),
            Self::UpstreamMaterial => (Label::Product, Label::Product),
        }
    }

    /// Check that this type may connect `start` to `end`.
    pub fn check_endpoints(&self, start: Label, end: Label) -> Result<(), RecordError> {
        if self.endpoints() == (start, end) {
            Ok(())
        } else {
            Err(RecordError::RelTypeMismatch {
                rel: *self,
                start,
                end,
            })
        }
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelType::ALL
            .into_iter()
            .find(|rel| rel.as_str() == s.trim())
            .ok_or_else(|| RecordError::UnknownRelType(s.to_string()))
    }
}

// ── Property Values ───────────────────────────────────────────────

/// A scalar value stored as a node or edge property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl PropertyValue {
    /// Convert a JSON value into a property value.
    ///
    /// Returns `Ok(None)` for `null`, and an error for arrays and objects,
    /// which cannot be stored as a single property.
    pub fn from_json(key: &str, value: &serde_json::Value) -> Result<Option<Self>, RecordError> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(Self::Boolean(*b))),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Some(Self::Integer(i))),
                None => n
                    .as_f64()
                    .map(|f| Some(Self::Float(f)))
                    .ok_or_else(|| RecordError::NotScalar {
                        key: key.to_string(),
                    }),
            },
            Value::String(s) => Ok(Some(Self::String(s.clone()))),
            Value::Array(_) | Value::Object(_) => Err(RecordError::NotScalar {
                key: key.to_string(),
            }),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}
