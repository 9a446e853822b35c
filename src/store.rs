//! Triple store client
//!
//! Speaks the SPARQL 1.1 Graph Store HTTP protocol against named graphs
//! and the SPARQL query/update protocol against the store's endpoints.
//! Reads surface failures as typed errors; graph writes report a plain
//! success flag and log the reason when they fail.

use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::{Endpoints, StoreConfig};
use crate::error::LodError;
use crate::graph::Graph;
use crate::materialize::{materialize, Materialized};
use crate::namespace::NamespaceRegistry;
use crate::ntriples;
use crate::query::{self, QueryType};
use crate::results::SparqlResults;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const N_TRIPLES: &str = "application/n-triples";
const N_TRIPLES_UTF8: &str = "application/n-triples; charset=utf-8";
const UPDATE_SUCCEEDED: &str = "Update succeeded";
const DEFAULT_GRAPH_PARAM: &str = "default-graph-uri";

/// Source of named graphs for projection
pub trait GraphSupplier {
    /// Fetch a named graph; unknown graphs are [`LodError::UnknownGraph`]
    fn fetch(&self, named_graph: &str) -> Result<Graph, LodError>;

    /// Everything the store knows about `iri`
    fn describe(&self, iri: &str, named_graph: Option<&str>) -> Result<Graph, LodError>;

    /// Replace a named graph, reporting success
    fn replace(&self, named_graph: &str, graph: &Graph) -> bool;

    /// Drop a named graph, reporting success
    fn remove(&self, named_graph: &str) -> bool;
}

fn is_success(status: StatusCode) -> bool {
    matches!(status.as_u16(), 200 | 201 | 202 | 204)
}

pub struct TripleStore {
    endpoints: Endpoints,
    read_timeout: Duration,
    update_timeout: Duration,
    client: Client,
    registry: Arc<NamespaceRegistry>,
}

impl TripleStore {
    pub fn new(config: &StoreConfig, registry: Arc<NamespaceRegistry>) -> Result<Self, LodError> {
        let client = Client::builder().build()?;
        Ok(Self {
            endpoints: config.endpoints(),
            read_timeout: Duration::from_secs(config.read_timeout_secs),
            update_timeout: Duration::from_secs(config.update_timeout_secs),
            client,
            registry,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn registry(&self) -> &Arc<NamespaceRegistry> {
        &self.registry
    }

    fn graph_url(&self, named_graph: &str) -> Result<Url, LodError> {
        Ok(Url::parse_with_params(
            &self.endpoints.graph_store,
            &[(self.endpoints.graph_param.as_str(), named_graph)],
        )?)
    }

    fn query_url(&self, query: &str, named_graph: Option<&str>) -> Result<Url, LodError> {
        let mut params = vec![("query", query)];
        if let Some(graph) = named_graph {
            params.push((DEFAULT_GRAPH_PARAM, graph));
        }
        Ok(Url::parse_with_params(&self.endpoints.query, &params)?)
    }

    fn check(response: Response) -> Result<Response, LodError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(LodError::Store {
                status: status.as_u16(),
                url: response.url().to_string(),
            })
        }
    }

    // -- SPARQL protocol --

    fn sparql(&self, query: &str, named_graph: Option<&str>) -> Result<SparqlResults, LodError> {
        debug!(query, "Sending SPARQL query");
        let response = self
            .client
            .get(self.query_url(query, named_graph)?)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .timeout(self.read_timeout)
            .send()?;
        let body = Self::check(response)?.text()?;
        SparqlResults::from_json(&body)
    }

    /// `ASK` against a graph pattern such as `where {?s ?p ?o}`
    pub fn ask(&self, pattern: &str, named_graph: Option<&str>) -> Result<bool, LodError> {
        self.sparql(&QueryType::Ask.wrap(pattern), named_graph)?.ask()
    }

    /// Whether any statement has `iri` as its subject
    pub fn ask_subject(&self, iri: &str, named_graph: Option<&str>) -> Result<bool, LodError> {
        self.ask(&query::subject_pattern(iri), named_graph)
    }

    pub fn count(&self, pattern: &str, named_graph: Option<&str>) -> Result<u64, LodError> {
        self.sparql(&QueryType::Count.wrap(pattern), named_graph)?.count()
    }

    pub fn select(&self, body: &str, named_graph: Option<&str>) -> Result<SparqlResults, LodError> {
        self.sparql(&QueryType::Select.wrap(body), named_graph)
    }

    /// Send `query` verbatim
    pub fn query(&self, query: &str) -> Result<SparqlResults, LodError> {
        self.sparql(&QueryType::FreeText.wrap(query), None)
    }

    pub fn describe(&self, iri: &str, named_graph: Option<&str>) -> Result<Graph, LodError> {
        let query = QueryType::Describe.wrap(iri);
        debug!(query = %query, "Sending SPARQL describe");
        let response = self
            .client
            .get(self.query_url(&query, named_graph)?)
            .header(ACCEPT, N_TRIPLES)
            .timeout(self.read_timeout)
            .send()?;
        let body = Self::check(response)?.text()?;
        ntriples::parse(&body, named_graph.map(str::to_string), self.registry.clone())
    }

    /// Send a SPARQL update
    ///
    /// Only a response body carrying the store's success marker counts as
    /// success; any other answer is `Ok(false)`. Transport failures are
    /// returned as errors so callers can decide to retry.
    pub fn update(&self, query: &str, named_graph: Option<&str>) -> Result<bool, LodError> {
        if query.trim().is_empty() {
            warn!("No SPARQL update query was given, not sending it to the triple store");
            return Ok(false);
        }
        let mut form = vec![("update", query)];
        if let Some(graph) = named_graph {
            form.push((DEFAULT_GRAPH_PARAM, graph));
        }
        let response = self
            .client
            .post(&self.endpoints.update)
            .form(&form)
            .timeout(self.update_timeout)
            .send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "SPARQL update rejected");
            return Ok(false);
        }
        Ok(body.contains(UPDATE_SUCCEEDED))
    }

    pub fn remove_insert(&self, named_graph: &str, remove: &str, insert: &str) -> Result<bool, LodError> {
        self.update(&query::remove_insert(named_graph, remove, insert), Some(named_graph))
    }

    /// Drop every triple in the store
    pub fn clear_all(&self) -> Result<bool, LodError> {
        self.update(query::CLEAR_ALL, None)
    }

    /// Subject that caches the remote document at `url`, if any
    pub fn cached_source_uri(&self, url: &str) -> Result<Option<String>, LodError> {
        let results = self.query(&query::cached_source_query(url))?;
        Ok(results.column("s").first().map(|s| s.to_string()))
    }

    /// Materialized three-hop context around `target`
    pub fn context_graph(
        &self,
        named_graph: Option<&str>,
        target: Option<&str>,
    ) -> Result<Materialized, LodError> {
        let results = self.query(&query::context_query(named_graph, target))?;
        Ok(materialize(&results, named_graph, self.registry.clone()))
    }

    /// Materialized single-hop statements of `target`
    pub fn describe_graph(
        &self,
        named_graph: Option<&str>,
        target: Option<&str>,
    ) -> Result<Materialized, LodError> {
        let results = self.query(&query::describe_graph_query(named_graph, target))?;
        Ok(materialize(&results, named_graph, self.registry.clone()))
    }

    // -- Graph Store protocol --

    pub fn get(&self, named_graph: &str) -> Result<Graph, LodError> {
        let response = self
            .client
            .get(self.graph_url(named_graph)?)
            .header(ACCEPT, N_TRIPLES)
            .timeout(self.read_timeout)
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(LodError::UnknownGraph(named_graph.to_string()));
        }
        let body = Self::check(response)?.text()?;
        ntriples::parse(&body, Some(named_graph.to_string()), self.registry.clone())
    }

    /// Whether a named graph exists in the store
    pub fn head(&self, named_graph: &str) -> Result<bool, LodError> {
        let response = self
            .client
            .head(self.graph_url(named_graph)?)
            .timeout(self.read_timeout)
            .send()?;
        Ok(response.status() == StatusCode::OK)
    }

    fn write(&self, method: reqwest::Method, named_graph: &str, data: &str) -> Result<Response, LodError> {
        Ok(self
            .client
            .request(method, self.graph_url(named_graph)?)
            .header(CONTENT_TYPE, N_TRIPLES_UTF8)
            .body(data.to_string())
            .timeout(self.update_timeout)
            .send()?)
    }

    fn report(action: &str, named_graph: &str, result: Result<Response, LodError>) -> bool {
        match result {
            Ok(response) if is_success(response.status()) => {
                info!(graph = named_graph, "{} succeeded", action);
                true
            }
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().unwrap_or_default();
                error!(graph = named_graph, status, body = %body, "{} failed", action);
                false
            }
            Err(e) => {
                error!(graph = named_graph, error = %e, "{} failed", action);
                false
            }
        }
    }

    /// Replace a named graph with N-Triples `data`
    pub fn put(&self, named_graph: &str, data: &str) -> bool {
        Self::report("PUT", named_graph, self.write(reqwest::Method::PUT, named_graph, data))
    }

    /// Merge N-Triples `data` into a named graph, creating it when missing
    pub fn post(&self, named_graph: &str, data: &str) -> bool {
        let result = self
            .write(reqwest::Method::POST, named_graph, data)
            .and_then(|response| {
                if response.status() == StatusCode::NOT_FOUND {
                    debug!(graph = named_graph, "Graph missing on POST, retrying as PUT");
                    self.write(reqwest::Method::PUT, named_graph, data)
                } else {
                    Ok(response)
                }
            });
        Self::report("POST", named_graph, result)
    }

    pub fn delete(&self, named_graph: &str) -> bool {
        let result = self.graph_url(named_graph).and_then(|url| {
            Ok(self
                .client
                .delete(url)
                .timeout(self.update_timeout)
                .send()?)
        });
        Self::report("DELETE", named_graph, result)
    }

    /// Upload an N-Quads file to the graph store root
    pub fn put_file(&self, path: &Path) -> bool {
        let label = path.display().to_string();
        let result = multipart::Form::new()
            .file("file", path)
            .map_err(LodError::from)
            .and_then(|form| {
                Ok(self
                    .client
                    .post(&self.endpoints.graph_store)
                    .multipart(form)
                    .timeout(self.update_timeout)
                    .send()?)
            });
        Self::report("File upload", &label, result)
    }
}

impl GraphSupplier for TripleStore {
    fn fetch(&self, named_graph: &str) -> Result<Graph, LodError> {
        self.get(named_graph)
    }

    fn describe(&self, iri: &str, named_graph: Option<&str>) -> Result<Graph, LodError> {
        TripleStore::describe(self, iri, named_graph)
    }

    fn replace(&self, named_graph: &str, graph: &Graph) -> bool {
        self.put(named_graph, &ntriples::serialize(graph))
    }

    fn remove(&self, named_graph: &str) -> bool {
        self.delete(named_graph)
    }
}
