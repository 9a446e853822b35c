//! Settings loaded from TOML
//!
//! Every section and field has a default, so an empty file is a valid
//! configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::LodError;
use crate::namespace::NamespaceRegistry;
use crate::vocab;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreConfig,
    pub projection: ProjectionConfig,
    pub bulk: BulkConfig,
    /// Extra namespaces as IRI to prefix, taking precedence over the built-in table
    pub namespaces: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Fuseki,
    Blazegraph,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub db: String,
    pub store_type: StoreType,
    /// Use the `<db>_acceptance` dataset
    pub acceptance_mode: bool,
    pub graph_store_suffix: String,
    pub query_suffix: String,
    pub update_suffix: String,
    pub graph_param: String,
    pub read_timeout_secs: u64,
    pub update_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".to_string(),
            port: 3030,
            db: "lod".to_string(),
            store_type: StoreType::Fuseki,
            acceptance_mode: false,
            graph_store_suffix: "data".to_string(),
            query_suffix: "sparql".to_string(),
            update_suffix: "update".to_string(),
            graph_param: "graph".to_string(),
            read_timeout_secs: 10,
            update_timeout_secs: 15,
        }
    }
}

/// Resolved endpoint URLs of a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base: String,
    pub graph_store: String,
    pub query: String,
    pub update: String,
    pub graph_param: String,
}

impl StoreConfig {
    pub fn db_name(&self) -> String {
        if self.acceptance_mode {
            format!("{}_acceptance", self.db)
        } else {
            self.db.clone()
        }
    }

    /// Endpoint layout for the configured store type
    ///
    /// Blazegraph serves every protocol from one `sparql` endpoint and
    /// names graphs with `context-uri`.
    pub fn endpoints(&self) -> Endpoints {
        match self.store_type {
            StoreType::Fuseki => {
                let base = format!("{}:{}/{}", self.host, self.port, self.db_name());
                Endpoints {
                    graph_store: format!("{}/{}", base, self.graph_store_suffix),
                    query: format!("{}/{}", base, self.query_suffix),
                    update: format!("{}/{}", base, self.update_suffix),
                    graph_param: self.graph_param.clone(),
                    base,
                }
            }
            StoreType::Blazegraph => {
                let base = format!(
                    "{}:{}/bigdata/namespace/{}",
                    self.host,
                    self.port,
                    self.db_name()
                );
                let sparql = format!("{}/sparql", base);
                Endpoints {
                    graph_store: sparql.clone(),
                    query: sparql.clone(),
                    update: sparql,
                    graph_param: "context-uri".to_string(),
                    base,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Link typed blank nodes to the about resource with `ore:aggregates`
    pub aggregate_blank_nodes: bool,
    /// Blank nodes typed under these namespaces are aggregated
    pub inline_type_namespaces: Vec<String>,
    /// Tried in order; the first predicate with values supplies the label
    pub label_properties: Vec<String>,
    pub thumbnail_properties: Vec<String>,
    pub excluded_properties: Vec<String>,
    /// When non-empty, only these predicates are kept
    pub allowed_properties: Vec<String>,
    pub do_not_follow: Vec<String>,
    /// Enrichment placeholder classes
    pub placeholder_types: Vec<String>,
    pub max_inline_depth: usize,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            aggregate_blank_nodes: true,
            inline_type_namespaces: strings(&[vocab::NAVE_NS]),
            label_properties: strings(vocab::LABEL_PROPERTIES),
            thumbnail_properties: strings(vocab::THUMBNAIL_PROPERTIES),
            excluded_properties: strings(vocab::EXCLUDED_PROPERTIES),
            allowed_properties: Vec::new(),
            do_not_follow: strings(vocab::DO_NOT_FOLLOW),
            placeholder_types: strings(&[vocab::NARTHEX_PROXY_RESOURCE]),
            max_inline_depth: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkConfig {
    pub batch_size: usize,
    pub max_attempts: usize,
    pub retry_delay_ms: u64,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            batch_size: 25,
            max_attempts: 3,
            retry_delay_ms: 3000,
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, LodError> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| LodError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, LodError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), LodError> {
        if self.bulk.batch_size == 0 {
            return Err(LodError::Config("bulk.batch_size must be positive".to_string()));
        }
        if self.bulk.max_attempts == 0 {
            return Err(LodError::Config("bulk.max_attempts must be positive".to_string()));
        }
        if self.projection.max_inline_depth == 0 {
            return Err(LodError::Config(
                "projection.max_inline_depth must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Namespace registry with the configured namespaces ahead of the defaults
    pub fn registry(&self) -> NamespaceRegistry {
        let mut registry = NamespaceRegistry::new();
        for (iri, prefix) in &self.namespaces {
            registry.register(prefix, iri);
        }
        for (iri, prefix) in vocab::DEFAULT_NAMESPACES {
            registry.register(prefix, iri);
        }
        registry
    }
}
