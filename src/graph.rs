//! In-memory graph
//!
//! An identified, duplicate-free set of triples with a namespace registry
//! attached. Every graph gets its own blank node scope on creation.

use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::LodError;
use crate::namespace::NamespaceRegistry;
use crate::term::{cap_value, NativeValue, Term, MAX_LITERAL_LEN};
use crate::vocab::{NAVE_ALLOW_LOD, RDF_TYPE};

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

/// A fresh blank node scope
pub fn new_scope() -> u64 {
    NEXT_SCOPE.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    /// Build a triple, rejecting literal subjects
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Result<Self, LodError> {
        if subject.is_literal() {
            return Err(LodError::MalformedTerm(format!(
                "literal {} cannot be a subject",
                subject
            )));
        }
        Ok(Self {
            subject,
            predicate: predicate.into(),
            object,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Graph {
    identifier: Option<String>,
    scope: u64,
    registry: Arc<NamespaceRegistry>,
    triples: IndexSet<Triple>,
}

/// Most common languages, classes and properties in a graph
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub language: Vec<(String, usize)>,
    #[serde(rename = "RDF class")]
    pub rdf_class: Vec<(String, usize)>,
    pub property: Vec<(String, usize)>,
}

const STATISTICS_TOP: usize = 50;

fn most_common<'a>(entries: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        let count = counts.entry(entry).or_insert(0);
        if *count == 0 {
            order.push(entry);
        }
        *count += 1;
    }
    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|entry| (entry.to_string(), counts[entry]))
        .collect();
    // stable sort keeps first-seen order among ties
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(STATISTICS_TOP);
    ranked
}

impl Graph {
    pub fn new(identifier: Option<String>, registry: Arc<NamespaceRegistry>) -> Self {
        Self {
            identifier,
            scope: new_scope(),
            registry,
            triples: IndexSet::new(),
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn scope(&self) -> u64 {
        self.scope
    }

    pub fn registry(&self) -> &Arc<NamespaceRegistry> {
        &self.registry
    }

    /// Blank node local to this graph
    pub fn blank_node(&self, id: impl Into<String>) -> Term {
        Term::BlankNode {
            id: id.into(),
            scope: self.scope,
        }
    }

    /// Returns false when the triple was already present
    pub fn add(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn remove(&mut self, triple: &Triple) -> bool {
        self.triples.shift_remove(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Distinct subjects in insertion order
    pub fn subjects(&self) -> Vec<&Term> {
        let subjects: IndexSet<&Term> = self.triples.iter().map(|t| &t.subject).collect();
        subjects.into_iter().collect()
    }

    /// Distinct predicates in insertion order
    pub fn predicates(&self) -> Vec<&str> {
        let predicates: IndexSet<&str> =
            self.triples.iter().map(|t| t.predicate.as_str()).collect();
        predicates.into_iter().collect()
    }

    /// Every object of `predicate`, across all subjects
    pub fn objects<'a>(&'a self, predicate: &'a str) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn objects_of<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn predicate_objects<'a>(
        &'a self,
        subject: &'a Term,
    ) -> impl Iterator<Item = (&'a str, &'a Term)> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject)
            .map(|t| (t.predicate.as_str(), &t.object))
    }

    /// Top languages, `rdf:type` classes and properties (as qnames)
    ///
    /// Properties listed in `excluded` and IRIs with no registered
    /// namespace are left out.
    pub fn statistics(&self, excluded: &[String]) -> GraphStatistics {
        let languages = self.triples.iter().filter_map(|t| t.object.language());
        let classes: Vec<String> = self
            .objects(RDF_TYPE)
            .filter_map(Term::as_iri)
            .filter_map(|iri| self.registry.to_qname(iri).ok())
            .map(|q| q.to_string())
            .collect();
        let properties: Vec<String> = self
            .triples
            .iter()
            .map(|t| t.predicate.as_str())
            .filter(|p| !excluded.iter().any(|e| e.as_str() == *p))
            .filter_map(|p| self.registry.to_qname(p).ok())
            .map(|q| q.to_string())
            .collect();
        GraphStatistics {
            language: most_common(languages),
            rdf_class: most_common(classes.iter().map(String::as_str)),
            property: most_common(properties.iter().map(String::as_str)),
        }
    }

    /// Whether the graph may be published as Linked Open Data
    ///
    /// A graph without `nave:allowLinkedOpenData` is allowed; otherwise
    /// every value must read `true`.
    pub fn lod_allowed(&self) -> bool {
        self.objects(NAVE_ALLOW_LOD)
            .all(|o| o.lexical().eq_ignore_ascii_case("true"))
    }

    /// Native value of the first literal object of `predicate`
    pub fn first_literal(&self, predicate: &str) -> Option<NativeValue> {
        self.objects(predicate)
            .find_map(Term::as_literal)
            .map(|lit| cap_native(lit.native()))
    }
}

pub(crate) fn cap_native(value: NativeValue) -> NativeValue {
    match value {
        NativeValue::Text(text) => NativeValue::Text(cap_value(&text, MAX_LITERAL_LEN)),
        other => other,
    }
}
