//! Batched writes to the triple store
//!
//! SPARQL update statements are sent in fixed-size chunks. A chunk that
//! fails on a transport error is retried after a pause; once its attempts
//! are exhausted it is dropped and logged, never raised.

use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::BulkConfig;
use crate::error::LodError;
use crate::namespace::NamespaceRegistry;
use crate::ntriples;
use crate::store::TripleStore;

/// Anything that accepts SPARQL update requests
pub trait UpdateSink {
    fn send_update(&self, query: &str) -> Result<bool, LodError>;
}

impl UpdateSink for TripleStore {
    fn send_update(&self, query: &str) -> Result<bool, LodError> {
        self.update(query, None)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub batches: usize,
    /// Batches the store confirmed
    pub succeeded: usize,
    /// Batches the store answered without its success marker
    pub rejected: usize,
    /// Batches abandoned after repeated transport failures
    pub dropped: usize,
}

/// Send `statements` in chunks of `config.batch_size`
pub fn bulk_update<S: UpdateSink>(sink: &S, statements: &[String], config: &BulkConfig) -> BulkReport {
    let mut report = BulkReport::default();
    let delay = Duration::from_millis(config.retry_delay_ms);
    for (index, chunk) in statements.chunks(config.batch_size.max(1)).enumerate() {
        report.batches += 1;
        let query = chunk.join("\n");
        let mut attempt = 1;
        loop {
            match sink.send_update(&query) {
                Ok(true) => {
                    report.succeeded += 1;
                    break;
                }
                Ok(false) => {
                    warn!(batch = index, statements = chunk.len(), "Update batch rejected");
                    report.rejected += 1;
                    break;
                }
                Err(e) if e.is_transient() && attempt < config.max_attempts => {
                    warn!(batch = index, attempt, error = %e, "Retrying update batch");
                    attempt += 1;
                    thread::sleep(delay);
                }
                Err(e) => {
                    error!(batch = index, attempts = attempt, error = %e, "Dropping update batch");
                    report.dropped += 1;
                    break;
                }
            }
        }
    }
    info!(
        batches = report.batches,
        succeeded = report.succeeded,
        rejected = report.rejected,
        dropped = report.dropped,
        "Bulk update finished"
    );
    report
}

/// A named graph with its N-Triples payload
#[derive(Debug, Clone)]
pub struct GraphUnit {
    pub named_graph: String,
    pub payload: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub stored: usize,
    pub failed: usize,
    /// Units rejected because their payload did not parse
    pub parse_errors: usize,
}

/// Parse and store each unit; a unit that fails to parse does not stop the others
pub fn load_graphs(store: &TripleStore, units: &[GraphUnit], registry: Arc<NamespaceRegistry>) -> LoadReport {
    let mut report = LoadReport::default();
    for unit in units {
        let graph = match ntriples::parse(&unit.payload, Some(unit.named_graph.clone()), registry.clone()) {
            Ok(graph) => graph,
            Err(e) => {
                error!(graph = %unit.named_graph, error = %e, "Rejecting unparsable graph");
                report.parse_errors += 1;
                continue;
            }
        };
        if store.post(&unit.named_graph, &ntriples::serialize(&graph)) {
            report.stored += 1;
        } else {
            report.failed += 1;
        }
    }
    report
}
