//! Resources and predicates
//!
//! A [`Resource`] gathers every statement of one subject. Its derived
//! state (types, label, filtered items, sort key) is computed once when
//! the resource is built and never changes afterwards.

use indexmap::IndexMap;
use tracing::warn;

use crate::error::LodError;
use crate::graph::{cap_native, Graph};
use crate::namespace::{NamespaceRegistry, QName};
use crate::term::{Literal, NativeValue, Term};
use crate::vocab::{
    EDM_WEB_RESOURCE, GEO_LAT, GEO_LONG, NAVE_GEO_HASH, NAVE_RESOURCE_SORT_ORDER,
    ORE_AGGREGATION, RDF_DESCRIPTION, RDF_TYPE, SKOS_EXACT_MATCH,
};

/// A predicate IRI with its qname resolved once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    iri: String,
    qname: Option<QName>,
}

impl Predicate {
    pub fn new(iri: &str, registry: &NamespaceRegistry) -> Self {
        Self {
            iri: iri.to_string(),
            qname: registry.to_qname(iri).ok(),
        }
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn qname(&self) -> Option<&QName> {
        self.qname.as_ref()
    }

    /// Field name for documents
    pub fn search_label(&self) -> Result<String, LodError> {
        match &self.qname {
            Some(qname) => qname.search_label(),
            None => Err(LodError::UnknownNamespace(self.iri.clone())),
        }
    }
}

/// Which predicates a resource exposes as items
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub excluded: Vec<String>,
    /// Empty means every predicate not excluded
    pub allowed: Vec<String>,
}

impl PropertyFilter {
    pub fn keeps(&self, predicate: &str) -> bool {
        if self.excluded.iter().any(|p| p == predicate) {
            return false;
        }
        self.allowed.is_empty() || self.allowed.iter().any(|p| p == predicate)
    }
}

#[derive(Debug, Clone)]
pub struct Resource {
    subject: Term,
    /// Every `(predicate, object)` of the subject in graph order
    statements: Vec<(String, Term)>,
    types: Vec<String>,
    /// Predicate to objects, `rdf:type` and filtered predicates left out,
    /// ordered by predicate IRI
    items: IndexMap<String, Vec<Term>>,
    label: Vec<Literal>,
    sort_key: i64,
}

impl Resource {
    pub fn from_graph(
        subject: &Term,
        graph: &Graph,
        filter: &PropertyFilter,
        label_properties: &[String],
    ) -> Self {
        let statements: Vec<(String, Term)> = graph
            .predicate_objects(subject)
            .map(|(p, o)| (p.to_string(), o.clone()))
            .collect();

        let mut types: Vec<String> = Vec::new();
        for (_, object) in statements.iter().filter(|(p, _)| p == RDF_TYPE) {
            if let Some(iri) = object.as_iri() {
                if !types.iter().any(|t| t == iri) {
                    types.push(iri.to_string());
                }
            }
        }
        if types.is_empty() {
            types.push(RDF_DESCRIPTION.to_string());
        }

        let mut items: IndexMap<String, Vec<Term>> = IndexMap::new();
        for (predicate, object) in &statements {
            if predicate == RDF_TYPE || !filter.keeps(predicate) {
                continue;
            }
            items
                .entry(predicate.clone())
                .or_default()
                .push(object.clone());
        }
        items.sort_keys();

        let label = label_properties
            .iter()
            .map(|lp| {
                statements
                    .iter()
                    .filter(|(p, _)| p == lp)
                    .filter_map(|(_, o)| o.as_literal().cloned())
                    .collect::<Vec<_>>()
            })
            .find(|labels| !labels.is_empty())
            .unwrap_or_default();

        let sort_key = statements
            .iter()
            .find(|(p, _)| p == NAVE_RESOURCE_SORT_ORDER)
            .map(|(_, o)| match o.lexical().trim().parse::<i64>() {
                Ok(key) => key,
                Err(_) => {
                    warn!(subject = %subject, value = o.lexical(), "Ignoring non-numeric sort order");
                    0
                }
            })
            .unwrap_or(0);

        Self {
            subject: subject.clone(),
            statements,
            types,
            items,
            label,
            sort_key,
        }
    }

    pub fn subject(&self) -> &Term {
        &self.subject
    }

    pub fn uri(&self) -> &str {
        self.subject.lexical()
    }

    /// Type IRIs; `rdf:Description` when the subject is untyped
    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn first_type(&self) -> &str {
        self.types.first().map(String::as_str).unwrap_or(RDF_DESCRIPTION)
    }

    pub fn has_type(&self, iri: &str) -> bool {
        self.types.iter().any(|t| t == iri)
    }

    pub fn is_web_resource(&self) -> bool {
        self.has_type(EDM_WEB_RESOURCE)
    }

    pub fn is_aggregation(&self) -> bool {
        self.has_type(ORE_AGGREGATION)
    }

    /// `nave:resourceSortOrder`, 0 when absent
    pub fn sort_key(&self) -> i64 {
        self.sort_key
    }

    pub fn items(&self) -> &IndexMap<String, Vec<Term>> {
        &self.items
    }

    pub fn predicates(&self) -> Vec<&str> {
        self.items.keys().map(String::as_str).collect()
    }

    pub fn objects(&self) -> Vec<&Term> {
        self.items.values().flatten().collect()
    }

    pub fn has_content(&self) -> bool {
        !self.items.is_empty()
    }

    /// Values of the first label predicate that has any
    pub fn label(&self) -> &[Literal] {
        &self.label
    }

    pub fn is_geo(&self) -> bool {
        let has = |predicate: &str| self.statements.iter().any(|(p, _)| p == predicate);
        (has(GEO_LAT) && has(GEO_LONG)) || has(NAVE_GEO_HASH)
    }

    pub fn exact_match(&self) -> Option<&Term> {
        self.statements
            .iter()
            .find(|(p, _)| p == SKOS_EXACT_MATCH)
            .map(|(_, o)| o)
    }

    /// `(is placeholder, is linked to a concept)`
    pub fn is_enrichment(&self, placeholder_types: &[String]) -> (bool, bool) {
        let enrichment = self.types.iter().any(|t| placeholder_types.contains(t));
        (enrichment, enrichment && self.exact_match().is_some())
    }

    /// Item objects whose predicate has the given search label
    pub fn list(&self, search_label: &str, registry: &NamespaceRegistry) -> Vec<&Term> {
        self.items
            .iter()
            .filter(|(p, _)| {
                registry
                    .to_search_label(p)
                    .map(|label| label == search_label)
                    .unwrap_or(false)
            })
            .flat_map(|(_, objects)| objects.iter())
            .collect()
    }

    pub fn first(&self, search_label: &str, registry: &NamespaceRegistry) -> Option<&Term> {
        self.list(search_label, registry).into_iter().next()
    }

    /// Native value of the subject's first literal for `predicate`
    pub fn first_literal(&self, predicate: &str) -> Option<NativeValue> {
        self.statements
            .iter()
            .filter(|(p, _)| p == predicate)
            .find_map(|(_, o)| o.as_literal())
            .map(|lit| cap_native(lit.native()))
    }
}
