//! Configuration for the chaingraph importer.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use chaingraph_graph::{GraphConfig, QueryMode};

use crate::error::Result;
use crate::loader::{LoadOptions, MatchPolicy};

/// Top-level importer configuration.
///
/// Loaded from `<prefix>.toml` (default `chaingraph.toml`) and
/// `CHAINGRAPH__` environment variables, e.g. `CHAINGRAPH__DATA_PATHS__COMPANY`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Bolt URI of the Neo4j server.
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Input file per source.
    #[serde(default)]
    pub data_paths: DataPaths,

    /// Optional record cap per source.
    #[serde(default)]
    pub limits: SourceLimits,

    /// Delete every node before loading.
    #[serde(default)]
    pub reset: bool,

    #[serde(default)]
    pub query_mode: QueryMode,

    #[serde(default)]
    pub match_policy: MatchPolicy,

    /// Edge property holding `rel_weight` on weighted relationships.
    #[serde(default = "default_weight_property")]
    pub weight_property: String,

    /// Log a progress line every N records (0 disables).
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

/// The seven input sources, in load order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Company,
    Industry,
    Product,
    CompanyIndustry,
    IndustryIndustry,
    CompanyProduct,
    ProductProduct,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Industry => "industry",
            Self::Product => "product",
            Self::CompanyIndustry => "company_industry",
            Self::IndustryIndustry => "industry_industry",
            Self::CompanyProduct => "company_product",
            Self::ProductProduct => "product_product",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input file paths. A missing entry means the source is not loaded.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataPaths {
    pub company: Option<PathBuf>,
    pub industry: Option<PathBuf>,
    pub product: Option<PathBuf>,
    pub company_industry: Option<PathBuf>,
    pub industry_industry: Option<PathBuf>,
    pub company_product: Option<PathBuf>,
    pub product_product: Option<PathBuf>,
}

impl DataPaths {
    pub fn get(&self, kind: SourceKind) -> Option<&Path> {
        let path = match kind {
            SourceKind::Company => &self.company,
            SourceKind::Industry => &self.industry,
            SourceKind::Product => &self.product,
            SourceKind::CompanyIndustry => &self.company_industry,
            SourceKind::IndustryIndustry => &self.industry_industry,
            SourceKind::CompanyProduct => &self.company_product,
            SourceKind::ProductProduct => &self.product_product,
        };
        path.as_deref()
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        let file = |name: &str| Some(PathBuf::from(format!("data/{name}.json")));
        Self {
            company: file("company"),
            industry: file("industry"),
            product: file("product"),
            company_industry: file("company_industry"),
            industry_industry: file("industry_industry"),
            company_product: file("company_product"),
            product_product: file("product_product"),
        }
    }
}

/// Per-source record caps. Unset means no cap.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceLimits {
    pub company: Option<usize>,
    pub industry: Option<usize>,
    pub product: Option<usize>,
    pub company_industry: Option<usize>,
    pub industry_industry: Option<usize>,
    pub company_product: Option<usize>,
    pub product_product: Option<usize>,
}

impl SourceLimits {
    pub fn get(&self, kind: SourceKind) -> Option<usize> {
        match kind {
            SourceKind::Company => self.company,
            SourceKind::Industry => self.industry,
            SourceKind::Product => self.product,
            SourceKind::CompanyIndustry => self.company_industry,
            SourceKind::IndustryIndustry => self.industry_industry,
            SourceKind::CompanyProduct => self.company_product,
            SourceKind::ProductProduct => self.product_product,
        }
    }
}

impl ImportConfig {
    /// Load configuration from `<file_prefix>.toml` and the environment.
    ///
    /// Both sources are optional; anything unset keeps its default.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("CHAINGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(cfg.try_deserialize::<ImportConfig>()?)
    }

    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            uri: self.uri.clone(),
            user: self.username.clone(),
            password: self.password.clone(),
            ..Default::default()
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            mode: self.query_mode,
            match_policy: self.match_policy,
            weight_property: self.weight_property.clone(),
            progress_interval: self.progress_interval,
        }
    }
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_username() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "neo4j".to_string()
}

pub(crate) fn default_weight_property() -> String {
    "权重".to_string()
}

pub(crate) fn default_progress_interval() -> usize {
    100
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            username: default_username(),
            password: default_password(),
            data_paths: DataPaths::default(),
            limits: SourceLimits::default(),
            reset: false,
            query_mode: QueryMode::default(),
            match_policy: MatchPolicy::default(),
            weight_property: default_weight_property(),
            progress_interval: default_progress_interval(),
        }
    }
}
