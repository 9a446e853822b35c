//! SPARQL query templates

use crate::vocab::{NARTHEX_DATASET, NARTHEX_PROXY_RESOURCE, NAVE_CACHE_URL};

pub const DEFAULT_PATTERN: &str = "where {?s ?p ?o}";
pub const CLEAR_ALL: &str = "CLEAR ALL";

const RESULT_LIMIT: usize = 500;

/// The query forms sent to the SPARQL endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Ask,
    Describe,
    Select,
    Count,
    FreeText,
}

impl QueryType {
    /// Wrap `body` in this query form
    pub fn wrap(&self, body: &str) -> String {
        match self {
            QueryType::Ask => format!("ASK {}", body),
            QueryType::Describe => format!("DESCRIBE <{}>", body),
            QueryType::Select => format!("SELECT {}", body),
            QueryType::Count => format!("SELECT (COUNT(*) AS ?count) {}", body),
            QueryType::FreeText => body.to_string(),
        }
    }
}

/// Pattern matching every statement about `iri`
pub fn subject_pattern(iri: &str) -> String {
    format!("where {{<{}> ?p ?o}}", iri)
}

/// `WITH <g> DELETE { r } INSERT { i } WHERE { r };`
pub fn remove_insert(named_graph: &str, remove: &str, insert: &str) -> String {
    format!(
        "WITH <{g}> DELETE {{ {r} }} INSERT {{ {i} }} WHERE {{ {r} }};",
        g = named_graph,
        r = remove,
        i = insert
    )
}

fn graph_clause(named_graph: Option<&str>) -> String {
    match named_graph {
        Some(g) => format!("<{}>", g),
        None => "?g".to_string(),
    }
}

fn bind_clause(target: Option<&str>) -> String {
    target
        .map(|iri| format!("BIND(<{}> as ?s)", iri))
        .unwrap_or_default()
}

/// Three-hop context query
///
/// Hop two only follows objects typed as proxy resources, hop three
/// stops at dataset nodes.
pub fn context_query(named_graph: Option<&str>, target: Option<&str>) -> String {
    format!(
        "SELECT * WHERE {{ {bind} GRAPH {graph} {{ ?s ?p ?o }} \
         OPTIONAL {{ ?o ?p2 ?o2 ; a <{proxy}> . \
         OPTIONAL {{ ?o2 ?p3 ?o3 . NOT EXISTS {{ ?o2 a <{dataset}> . }} }} }} }} \
         LIMIT {limit}",
        bind = bind_clause(target),
        graph = graph_clause(named_graph),
        proxy = NARTHEX_PROXY_RESOURCE,
        dataset = NARTHEX_DATASET,
        limit = RESULT_LIMIT,
    )
}

/// Single-hop variant of [`context_query`]
pub fn describe_graph_query(named_graph: Option<&str>, target: Option<&str>) -> String {
    format!(
        "SELECT * WHERE {{ {bind} GRAPH {graph} {{ ?s ?p ?o }} }} LIMIT {limit}",
        bind = bind_clause(target),
        graph = graph_clause(named_graph),
        limit = RESULT_LIMIT,
    )
}

/// Subjects caching the remote document at `url`
pub fn cached_source_query(url: &str) -> String {
    format!(
        "select distinct ?s where {{?s <{}> <{}> }}",
        NAVE_CACHE_URL, url
    )
}
