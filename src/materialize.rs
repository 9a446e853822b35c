//! Table-to-graph materialization
//!
//! Rebuilds a graph from the tabular result of a multi-hop SELECT whose
//! variables follow `[g,] s p o p2 o2 p3 o3 ..`. Each hop is a window of
//! three variables sharing its endpoints with its neighbours, so hop `i`
//! reads `(vars[2i], vars[2i+1], vars[2i+2])`.

use std::sync::Arc;
use tracing::{debug, error};

use crate::error::LodError;
use crate::graph::{Graph, Triple};
use crate::namespace::NamespaceRegistry;
use crate::results::{Row, SparqlResults};
use crate::term::Term;
use crate::vocab::{ORE_AGGREGATES, ORE_IS_AGGREGATED_BY};

const GRAPH_VAR: &str = "g";

/// A graph rebuilt from query results
#[derive(Debug)]
pub struct Materialized {
    pub graph: Graph,
    /// Number of hops the query header describes
    pub hop_levels: usize,
    /// Rows dropped because one of their terms was malformed
    pub skipped_rows: usize,
}

/// Number of hops described by `n_vars` variables
pub fn hop_levels(n_vars: usize) -> usize {
    if n_vars < 3 {
        0
    } else {
        (n_vars - 3) / 2 + 1
    }
}

/// The `(subject, predicate, object)` variable windows of each hop
pub fn level_triples(vars: &[String]) -> Vec<(&str, &str, &str)> {
    (0..hop_levels(vars.len()))
        .map(|i| {
            (
                vars[2 * i].as_str(),
                vars[2 * i + 1].as_str(),
                vars[2 * i + 2].as_str(),
            )
        })
        .collect()
}

/// Materialize SPARQL results into a graph
///
/// The graph is named by `named_graph` or, failing that, by the first
/// row's `?g`. Rows with malformed terms are logged and skipped.
pub fn materialize(
    results: &SparqlResults,
    named_graph: Option<&str>,
    registry: Arc<NamespaceRegistry>,
) -> Materialized {
    let rows = results.rows();
    if rows.is_empty() {
        return Materialized {
            graph: Graph::new(named_graph.map(str::to_string), registry),
            hop_levels: 0,
            skipped_rows: 0,
        };
    }

    let mut vars: Vec<String> = results.vars().to_vec();
    let mut identifier = named_graph.map(str::to_string);
    if let Some(pos) = vars.iter().position(|v| v == GRAPH_VAR) {
        if identifier.is_none() {
            identifier = rows[0].get(GRAPH_VAR).map(|g| g.value.clone());
        }
        vars.remove(pos);
    }
    let levels = level_triples(&vars);

    let mut graph = Graph::new(identifier, registry);
    let mut skipped_rows = 0;
    for (index, row) in rows.iter().enumerate() {
        // rows are sparse: OPTIONAL hops leave their variables unbound
        let populated = hop_levels(row.len()).min(levels.len());
        match row_triples(row, &levels[..populated], graph.scope()) {
            Ok(triples) => {
                for triple in triples {
                    graph.add(triple);
                }
            }
            Err(e) => {
                error!(row = index, error = %e, "Skipping result row");
                skipped_rows += 1;
            }
        }
    }

    flip_aggregation_edges(&mut graph);
    debug!(
        triples = graph.len(),
        hop_levels = levels.len(),
        skipped_rows,
        "Materialized query results"
    );
    Materialized {
        graph,
        hop_levels: levels.len(),
        skipped_rows,
    }
}

/// Build every triple of one row; a single bad term rejects the row
fn row_triples(
    row: &Row,
    levels: &[(&str, &str, &str)],
    scope: u64,
) -> Result<Vec<Triple>, LodError> {
    let lookup = |var: &str| {
        row.get(var)
            .ok_or_else(|| LodError::MalformedTerm(format!("variable ?{} is unbound", var)))?
            .to_term(scope)
    };
    levels
        .iter()
        .map(|(s, p, o)| {
            let subject = lookup(s)?;
            let predicate = match lookup(p)? {
                Term::Iri(iri) => iri,
                other => {
                    return Err(LodError::MalformedTerm(format!(
                        "predicate {} is not an IRI",
                        other
                    )))
                }
            };
            Triple::new(subject, predicate, lookup(o)?)
        })
        .collect()
}

/// Replace `(x, ore:isAggregatedBy, y)` by `(y, ore:aggregates, x)`
fn flip_aggregation_edges(graph: &mut Graph) {
    let inverted: Vec<Triple> = graph
        .iter()
        .filter(|t| t.predicate == ORE_IS_AGGREGATED_BY && t.object.is_resource())
        .cloned()
        .collect();
    for triple in inverted {
        graph.remove(&triple);
        graph.add(Triple {
            subject: triple.object,
            predicate: ORE_AGGREGATES.to_string(),
            object: triple.subject,
        });
    }
}
