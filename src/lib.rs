//! Linked Open Data Projection Library
//!
//! This library turns RDF graphs held in a SPARQL triple store into
//! index-ready JSON documents, and talks to the store over the SPARQL 1.1
//! Graph Store and query/update protocols.
//!
//! # Overview
//!
//! A record lives in the store as a named graph. Projection runs in four
//! steps:
//!
//! 1. Fetch the named graph, or materialize a multi-hop SPARQL SELECT
//!    around a subject back into a graph
//! 2. Index every subject of the graph around one focal "about" resource
//! 3. Normalize enrichment placeholders to the concepts they link to
//! 4. Render a nested document with referenced resources embedded inline,
//!    and a flat document with every resource's entries under search labels
//!
//! # Vocabulary
//!
//! Predicates become document keys through their search label: the qname
//! with `:` replaced by `_`, so `dc:title` is filed under `dc_title`.
//! A predicate without a usable qname is filed under its full IRI.
//! Namespaces come from a [`NamespaceRegistry`] passed explicitly to every
//! graph.
//!
//! # Usage
//!
//! ## Project a named graph
//!
//! ```ignore
//! use lod_projector::{Bindings, GraphSupplier, Settings, TripleStore};
//! use std::sync::Arc;
//!
//! let settings = Settings::default();
//! let store = TripleStore::new(&settings.store, Arc::new(settings.registry()))?;
//! let graph = store.fetch("http://example.org/graph/record-1")?;
//!
//! let bindings = Bindings::new("http://example.org/aggregation/1", &graph, settings.projection);
//! println!("{}", bindings.flat_document());
//! ```
//!
//! ## Rebuild a graph from SPARQL results
//!
//! ```ignore
//! use lod_projector::{materialize, SparqlResults, NamespaceRegistry};
//! use std::sync::Arc;
//!
//! let results = SparqlResults::from_json(&body)?;
//! let materialized = materialize(&results, None, Arc::new(NamespaceRegistry::with_defaults()));
//! assert_eq!(materialized.hop_levels, 3);
//! ```

pub mod bindings;
pub mod bulk;
pub mod config;
pub mod error;
pub mod geo;
pub mod graph;
pub mod materialize;
pub mod namespace;
pub mod ntriples;
pub mod query;
pub mod resource;
pub mod results;
pub mod store;
pub mod term;
pub mod vocab;

// Re-export main types for convenience
pub use crate::bindings::{Bindings, Enrichment, RdfObject};
pub use crate::bulk::{bulk_update, load_graphs, BulkReport, GraphUnit, LoadReport, UpdateSink};
pub use crate::config::{BulkConfig, ProjectionConfig, Settings, StoreConfig, StoreType};
pub use crate::error::LodError;
pub use crate::geo::GeoPoint;
pub use crate::graph::{Graph, GraphStatistics, Triple};
pub use crate::materialize::{hop_levels, level_triples, materialize, Materialized};
pub use crate::namespace::{NamespaceRegistry, QName};
pub use crate::resource::{Predicate, PropertyFilter, Resource};
pub use crate::results::SparqlResults;
pub use crate::store::{GraphSupplier, TripleStore};
pub use crate::term::{Literal, NativeValue, TaggedTerm, Term, TermKind};
