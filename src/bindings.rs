//! Projection of a graph into search documents
//!
//! [`Bindings`] indexes every subject of a graph around one "about" resource
//! and renders two document shapes from that index: a nested document that
//! embeds referenced resources inline, and a flat document that lists the
//! entries of every resource under its predicate's search label.
//!
//! The source graph is never mutated. Bindings works on its own copy, which
//! gains the synthetic `ore:aggregates` edges for typed blank nodes.

use indexmap::{IndexMap, IndexSet};
use serde_json::{json, Map, Value};
use std::cell::{OnceCell, RefCell};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::config::ProjectionConfig;
use crate::error::LodError;
use crate::geo::{self, GeoPoint};
use crate::graph::{Graph, GraphStatistics, Triple};
use crate::resource::{Predicate, PropertyFilter, Resource};
use crate::term::{cap_value, Literal, NativeValue, Term, TermKind, MAX_ENTRY_VALUE_LEN};
use crate::vocab::{CAPTION_FALLBACK_PROPERTIES, EDM_HAS_VIEW, ORDERED_SEARCH_LABELS, ORE_AGGREGATES, RDF_TYPE};

/// How an object was rewritten while normalizing enrichment placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrichment {
    /// Emitted as found in the graph
    None,
    /// Placeholder replaced by the concept it links to
    Redirected,
    /// Unlinked placeholder replaced by its own label
    Literalized,
}

/// An object after enrichment normalization, with its display value
#[derive(Debug, Clone, PartialEq)]
pub struct RdfObject {
    pub predicate: String,
    pub term: Term,
    pub value: String,
    pub lang: Option<String>,
    pub enrichment: Enrichment,
}

/// Normalized objects per predicate, in item order
pub type NormalizedItems = Vec<(String, Vec<RdfObject>)>;

pub struct Bindings {
    about: Term,
    graph: Graph,
    config: ProjectionConfig,
    predicates: IndexMap<String, Predicate>,
    resources: IndexMap<Term, Resource>,
    /// Normalized items per resource, same index as `resources`
    normalized: Vec<OnceCell<NormalizedItems>>,
    /// Resources reached only through an enrichment link
    inlined: RefCell<IndexSet<Term>>,
}

impl Bindings {
    pub fn new(about: &str, source: &Graph, config: ProjectionConfig) -> Self {
        let about = Term::iri(about);
        let mut graph = source.clone();
        if config.aggregate_blank_nodes {
            aggregate_blank_nodes(&mut graph, &about, &config.inline_type_namespaces);
        }

        let filter = PropertyFilter {
            excluded: config.excluded_properties.clone(),
            allowed: config.allowed_properties.clone(),
        };
        let resources: IndexMap<Term, Resource> = graph
            .subjects()
            .into_iter()
            .map(|subject| {
                let resource =
                    Resource::from_graph(subject, &graph, &filter, &config.label_properties);
                (subject.clone(), resource)
            })
            .collect();
        let predicates: IndexMap<String, Predicate> = graph
            .predicates()
            .into_iter()
            .map(|p| (p.to_string(), Predicate::new(p, graph.registry())))
            .collect();
        let normalized = (0..resources.len()).map(|_| OnceCell::new()).collect();
        debug!(about = %about, resources = resources.len(), "Indexed graph for projection");

        Self {
            about,
            graph,
            config,
            predicates,
            resources,
            normalized,
            inlined: RefCell::new(IndexSet::new()),
        }
    }

    pub fn about(&self) -> &Term {
        &self.about
    }

    /// The projected graph, including synthetic aggregation edges
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn resources(&self) -> &IndexMap<Term, Resource> {
        &self.resources
    }

    pub fn resource(&self, subject: &Term) -> Option<&Resource> {
        self.resources.get(subject)
    }

    pub fn about_resource(&self) -> Option<&Resource> {
        self.resources.get(&self.about)
    }

    /// Whether `term` is a resource worth expanding
    pub fn has_resource(&self, term: &Term) -> bool {
        term != &self.about
            && self
                .resources
                .get(term)
                .map(Resource::has_content)
                .unwrap_or(false)
    }

    /// [`Bindings::has_resource`] for an object reached through `predicate`
    fn follows(&self, predicate: &str, term: &Term) -> bool {
        !self.config.do_not_follow.iter().any(|p| p == predicate) && self.has_resource(term)
    }

    pub fn is_inlined(&self, term: &Term) -> bool {
        self.inlined.borrow().contains(term)
    }

    fn mark_inlined(&self, term: &Term) {
        if term != &self.about {
            self.inlined.borrow_mut().insert(term.clone());
        }
    }

    fn qname_or_iri(&self, iri: &str) -> String {
        match self.graph.registry().to_qname(iri) {
            Ok(qname) => qname.to_string(),
            Err(_) => iri.to_string(),
        }
    }

    /// Document key for `predicate`; the predicate IRI when it has no usable qname
    fn document_key(&self, predicate: &str) -> String {
        let result = match self.predicates.get(predicate) {
            Some(p) => p.search_label(),
            None => self.graph.registry().to_search_label(predicate),
        };
        match result {
            Ok(label) => label,
            Err(e) => {
                warn!(predicate, error = %e, "Filing predicate under its IRI");
                predicate.to_string()
            }
        }
    }

    /// Display value and language of a term
    fn display(&self, term: &Term) -> (String, Option<String>) {
        match term {
            Term::Literal(lit) => (lit.value.clone(), lit.language.clone()),
            Term::Iri(_) | Term::BlankNode { .. } => {
                match self.resources.get(term).and_then(|r| r.label().first()) {
                    Some(label) => (label.value.clone(), label.language.clone()),
                    None => (term.lexical().to_string(), None),
                }
            }
        }
    }

    fn normalize_object(&self, predicate: &str, original: &Term) -> RdfObject {
        let mut term = original.clone();
        let mut enrichment = Enrichment::None;
        if self.follows(predicate, original) {
            if let Some(resource) = self.resources.get(original) {
                match resource.is_enrichment(&self.config.placeholder_types) {
                    (true, true) => {
                        if let Some(target) = resource.exact_match() {
                            self.mark_inlined(original);
                            self.mark_inlined(target);
                            term = target.clone();
                            enrichment = Enrichment::Redirected;
                        }
                    }
                    (true, false) => {
                        let (value, language) = self.display(original);
                        term = Term::Literal(Literal {
                            value,
                            datatype: None,
                            language,
                        });
                        enrichment = Enrichment::Literalized;
                    }
                    _ => {}
                }
            }
        }
        let (value, lang) = self.display(&term);
        RdfObject {
            predicate: predicate.to_string(),
            term,
            value,
            lang,
            enrichment,
        }
    }

    fn normalize_resource(&self, resource: &Resource) -> NormalizedItems {
        resource
            .items()
            .iter()
            .map(|(predicate, objects)| {
                let mut normalized: Vec<RdfObject> = objects
                    .iter()
                    .map(|object| self.normalize_object(predicate, object))
                    .collect();
                // an aggregation lists its views in resource sort order
                let views_are_resources = predicate == EDM_HAS_VIEW
                    && resource.is_aggregation()
                    && normalized.iter().all(|o| self.has_resource(&o.term));
                if views_are_resources {
                    normalized.sort_by_key(|o| {
                        self.resources.get(&o.term).map(Resource::sort_key).unwrap_or(0)
                    });
                } else {
                    normalized.sort_by(|a, b| a.value.cmp(&b.value));
                }
                (predicate.clone(), normalized)
            })
            .collect()
    }

    fn normalized(&self, index: usize) -> &NormalizedItems {
        self.normalized[index].get_or_init(|| self.normalize_resource(&self.resources[index]))
    }

    /// Normalized items of one resource
    pub fn items_of(&self, subject: &Term) -> Option<&NormalizedItems> {
        self.resources
            .get_index_of(subject)
            .map(|index| self.normalized(index))
    }

    /// Every normalized object of the flat enumeration
    ///
    /// Web resources come last, ordered by sort key. Resources reached only
    /// through an enrichment link are left out.
    pub fn flat_items(&self) -> Vec<&RdfObject> {
        for index in 0..self.resources.len() {
            self.normalized(index);
        }
        let inlined = self.inlined.borrow().clone();

        let mut items = Vec::new();
        let mut web_resources = Vec::new();
        for (index, (subject, resource)) in self.resources.iter().enumerate() {
            if resource.is_web_resource() {
                web_resources.push(index);
            } else if !inlined.contains(subject) {
                items.extend(self.normalized(index).iter().flat_map(|(_, objs)| objs));
            }
        }
        web_resources.sort_by_key(|&index| self.resources[index].sort_key());
        for index in web_resources {
            items.extend(self.normalized(index).iter().flat_map(|(_, objs)| objs));
        }
        items
    }

    /// Objects filed under `search_label` in the flat enumeration, by value
    pub fn list(&self, search_label: &str) -> Vec<&RdfObject> {
        let mut objects: Vec<&RdfObject> = self
            .flat_items()
            .into_iter()
            .filter(|o| {
                self.predicates
                    .get(&o.predicate)
                    .and_then(|p| p.search_label().ok())
                    .map(|label| label == search_label)
                    .unwrap_or(false)
            })
            .collect();
        objects.sort_by(|a, b| a.value.cmp(&b.value));
        objects
    }

    pub fn first(&self, search_label: &str) -> Option<&RdfObject> {
        self.list(search_label).into_iter().next()
    }

    /// Resources ordered by the qname of their first type
    pub fn resource_list(&self) -> Vec<&Resource> {
        let mut list: Vec<&Resource> = self.resources.values().collect();
        list.sort_by_cached_key(|r| self.qname_or_iri(r.first_type()));
        list
    }

    /// Distinct qnames of the resources' first types
    pub fn available_types(&self) -> BTreeSet<String> {
        self.resources
            .values()
            .map(|r| self.qname_or_iri(r.first_type()))
            .collect()
    }

    /// Resources whose first type has the given search label
    pub fn resources_by_type(&self, search_label: &str) -> Vec<&Resource> {
        self.resource_list()
            .into_iter()
            .filter(|r| {
                self.graph
                    .registry()
                    .to_search_label(r.first_type())
                    .map(|label| label == search_label)
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn iri_from_search_label(&self, search_label: &str) -> Result<String, LodError> {
        self.graph.registry().iri_from_search_label(search_label)
    }

    pub fn first_literal(&self, predicate: &str) -> Option<NativeValue> {
        self.graph.first_literal(predicate)
    }

    pub fn lod_allowed(&self) -> bool {
        self.graph.lod_allowed()
    }

    pub fn statistics(&self) -> GraphStatistics {
        self.graph.statistics(&self.config.excluded_properties)
    }

    pub fn geo_points(&self) -> Vec<GeoPoint> {
        geo::geo_points(&self.graph, false)
    }

    pub fn has_geo(&self) -> bool {
        !self.geo_points().is_empty()
    }

    /// Label of the about resource, or the first title-like values in the graph
    pub fn about_caption(&self) -> Vec<Literal> {
        if let Some(label) = self.about_resource().map(Resource::label) {
            if !label.is_empty() {
                return label.to_vec();
            }
        }
        CAPTION_FALLBACK_PROPERTIES
            .iter()
            .map(|p| {
                self.graph
                    .objects(p)
                    .filter_map(Term::as_literal)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .find(|labels| !labels.is_empty())
            .unwrap_or_default()
    }

    pub fn about_thumbnail(&self) -> Option<String> {
        self.config
            .thumbnail_properties
            .iter()
            .find_map(|p| self.graph.objects(p).next())
            .map(|o| o.lexical().to_string())
    }

    // -- documents --

    fn iri_entry(&self, iri: &str) -> Value {
        let name = self.qname_or_iri(iri);
        json!({"type": TermKind::Iri.as_str(), "id": iri, "value": name, "raw": name})
    }

    fn literal_entry(value: &str, lang: Option<&str>) -> Value {
        let mut entry = Map::new();
        entry.insert("type".to_string(), json!(TermKind::Literal.as_str()));
        entry.insert("value".to_string(), json!(value));
        entry.insert("raw".to_string(), json!(value));
        if let Some(lang) = lang {
            entry.insert("lang".to_string(), json!(lang));
        }
        Value::Object(entry)
    }

    fn entry(&self, object: &RdfObject, inline: Option<Value>) -> Value {
        let value = cap_value(&object.value, MAX_ENTRY_VALUE_LEN);
        let mut entry = Map::new();
        entry.insert("type".to_string(), json!(object.term.kind().as_str()));
        if let Term::Iri(iri) = &object.term {
            entry.insert("id".to_string(), json!(iri));
        }
        entry.insert("value".to_string(), json!(value));
        entry.insert("raw".to_string(), json!(value));
        if let Some(lang) = &object.lang {
            entry.insert("lang".to_string(), json!(lang));
        }
        if let Some(inline) = inline {
            entry.insert("inline".to_string(), inline);
        }
        Value::Object(entry)
    }

    fn languages(&self) -> Vec<Value> {
        let languages: IndexSet<&str> = self.graph.iter().filter_map(|t| t.object.language()).collect();
        languages
            .into_iter()
            .map(|lang| Self::literal_entry(lang, None))
            .collect()
    }

    fn about_section(&self, nested: bool) -> Map<String, Value> {
        let mut about = Map::new();
        if nested {
            let classes: IndexSet<&str> =
                self.graph.objects(RDF_TYPE).filter_map(Term::as_iri).collect();
            about.insert(
                "class".to_string(),
                Value::Array(classes.into_iter().map(|c| self.iri_entry(c)).collect()),
            );
            let properties: Vec<Value> = self
                .predicates
                .keys()
                .filter(|p| !self.config.excluded_properties.contains(p))
                .map(|p| self.iri_entry(p))
                .collect();
            about.insert("property".to_string(), Value::Array(properties));
        }
        about.insert("language".to_string(), Value::Array(self.languages()));
        about.insert(
            "point".to_string(),
            json!(geo::point_strings(&self.geo_points())),
        );
        let caption: Vec<Value> = self
            .about_caption()
            .iter()
            .map(|lit| Self::literal_entry(&lit.value, lit.language.as_deref()))
            .collect();
        about.insert("caption".to_string(), Value::Array(caption));
        if nested {
            let thumbnail = match self.about_thumbnail() {
                Some(id) => vec![json!({"type": TermKind::Iri.as_str(), "id": id})],
                None => Vec::new(),
            };
            about.insert("thumbnail".to_string(), Value::Array(thumbnail));
        }
        about
    }

    /// Entries of one resource, recursing into referenced resources
    fn resource_document(&self, subject: &Term, depth: usize, path: &mut Vec<Term>) -> Map<String, Value> {
        let mut doc = Map::new();
        let Some(index) = self.resources.get_index_of(subject) else {
            return doc;
        };
        let types: Vec<Value> = self.resources[index]
            .types()
            .iter()
            .map(|t| self.iri_entry(t))
            .collect();
        doc.insert("rdf_type".to_string(), Value::Array(types));

        path.push(subject.clone());
        for (predicate, objects) in self.normalized(index) {
            let label = self.document_key(predicate);
            let mut entries = Vec::with_capacity(objects.len());
            for object in objects {
                let expand = depth < self.config.max_inline_depth
                    && self.follows(predicate, &object.term)
                    && !path.contains(&object.term);
                let inline = expand
                    .then(|| Value::Object(self.resource_document(&object.term, depth + 1, path)));
                entries.push(self.entry(object, inline));
            }
            append_entries(&mut doc, label, entries);
        }
        path.pop();
        doc
    }

    /// Nested document rooted at the about resource
    pub fn nested_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("about".to_string(), Value::Object(self.about_section(true)));
        let about = self.about.clone();
        doc.extend(self.resource_document(&about, 0, &mut Vec::new()));
        Value::Object(doc)
    }

    /// Flat document over every indexed resource
    ///
    /// Entries pointing back at the about resource are left out. Entry
    /// lists are sorted by `raw` except for keys whose order carries
    /// meaning (views and thumbnails).
    pub fn flat_document(&self) -> Value {
        let mut grouped: IndexMap<String, Vec<&RdfObject>> = IndexMap::new();
        for object in self.flat_items() {
            if object.term == self.about {
                continue;
            }
            grouped
                .entry(self.document_key(&object.predicate))
                .or_default()
                .push(object);
        }

        let mut doc = Map::new();
        let about = self.about_section(false);
        let points = about.get("point").cloned().unwrap_or_else(|| json!([]));
        doc.insert("about".to_string(), Value::Object(about));
        doc.insert("point".to_string(), points);
        for (label, mut objects) in grouped {
            if !ORDERED_SEARCH_LABELS.contains(&label.as_str()) {
                objects.sort_by(|a, b| {
                    cap_value(&a.value, MAX_ENTRY_VALUE_LEN).cmp(&cap_value(&b.value, MAX_ENTRY_VALUE_LEN))
                });
            }
            let entries = objects.into_iter().map(|o| self.entry(o, None)).collect();
            append_entries(&mut doc, label, entries);
        }
        Value::Object(doc)
    }
}

fn append_entries(doc: &mut Map<String, Value>, label: String, entries: Vec<Value>) {
    match doc.get_mut(&label) {
        Some(Value::Array(existing)) => existing.extend(entries),
        _ => {
            doc.insert(label, Value::Array(entries));
        }
    }
}

/// Link blank nodes typed under an inline namespace to the about resource
fn aggregate_blank_nodes(graph: &mut Graph, about: &Term, namespaces: &[String]) {
    let members: Vec<Term> = graph
        .subjects()
        .into_iter()
        .filter(|s| s.is_blank_node())
        .filter(|s| {
            graph
                .objects_of(s, RDF_TYPE)
                .filter_map(Term::as_iri)
                .any(|t| namespaces.iter().any(|ns| t.starts_with(ns.as_str())))
        })
        .cloned()
        .collect();
    for member in members {
        graph.add(Triple {
            subject: about.clone(),
            predicate: ORE_AGGREGATES.to_string(),
            object: member,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::NamespaceRegistry;
    use crate::ntriples;
    use std::sync::Arc;

    const EDM_RECORD: &str = include_str!("../tests/fixtures/edm_record.nt");
    const ABOUT: &str = "http://data.digitalecollectie.nl/ore/aggregation/http%3A%2F%2Fwww.openbeelden.nl%2Ffiles%2F01%2F65%2F165083.WEEKNUMMER552-HRE0000CF2E.mpg";
    const CHO: &str = "http://www.openbeelden.nl/files/01/65/165083.WEEKNUMMER552-HRE0000CF2E.mpg";
    const GTAA: &str = "http://data.beeldengeluid.nl/gtaa/";

    fn gtaa(id: &str) -> Term {
        Term::iri(format!("{}{}", GTAA, id))
    }

    fn registry() -> Arc<NamespaceRegistry> {
        Arc::new(NamespaceRegistry::with_defaults())
    }

    fn edm_graph() -> Graph {
        ntriples::parse(EDM_RECORD, None, registry()).unwrap()
    }

    fn edm_bindings() -> Bindings {
        Bindings::new(ABOUT, &edm_graph(), ProjectionConfig::default())
    }

    fn entries<'a>(doc: &'a Value, key: &str) -> &'a Vec<Value> {
        doc[key].as_array().unwrap()
    }

    #[test]
    fn test_resource_index() {
        let bindings = edm_bindings();
        assert_eq!(bindings.resources().len(), 10);
        let types = bindings.available_types();
        assert_eq!(types.len(), 6);
        assert!(types.contains("rdf:Description"));
        assert_eq!(bindings.resources_by_type("skos_Concept").len(), 1);
    }

    #[test]
    fn test_provided_cho_counts() {
        let bindings = edm_bindings();
        let cho = bindings.resource(&Term::iri(CHO)).unwrap();
        assert_eq!(cho.items().len(), 16);
        assert_eq!(cho.objects().len(), 30);
    }

    #[test]
    fn test_blank_nodes_aggregated_without_touching_source() {
        let source = edm_graph();
        let bindings = Bindings::new(ABOUT, &source, ProjectionConfig::default());
        assert_eq!(source.len(), 58);
        assert_eq!(bindings.graph().len(), 59);
        let about = bindings.about_resource().unwrap();
        assert_eq!(about.items().len(), 8);
        let members = &about.items()[ORE_AGGREGATES];
        assert_eq!(members.len(), 1);
        assert!(members[0].is_blank_node());
    }

    #[test]
    fn test_aggregation_can_be_disabled() {
        let config = ProjectionConfig {
            aggregate_blank_nodes: false,
            ..ProjectionConfig::default()
        };
        let bindings = Bindings::new(ABOUT, &edm_graph(), config);
        assert_eq!(bindings.about_resource().unwrap().items().len(), 7);
    }

    #[test]
    fn test_has_resource() {
        let bindings = edm_bindings();
        assert!(bindings.has_resource(&gtaa("155912")));
        assert!(!bindings.has_resource(&gtaa("155912_bla")));
        assert!(!bindings.has_resource(&Term::iri(ABOUT)));
        assert!(!bindings.has_resource(&Term::literal("155912")));
    }

    #[test]
    fn test_nested_about_section() {
        let doc = edm_bindings().nested_document();
        let about = &doc["about"];
        assert_eq!(entries(about, "property").len(), 33);
        assert_eq!(entries(about, "class").len(), 5);
        assert_eq!(entries(about, "language").len(), 2);
        let caption = entries(about, "caption");
        assert_eq!(caption.len(), 2);
        assert!(caption.iter().any(|c| c["value"] == "The European twin congress in Oirschot" && c["lang"] == "en"));
        assert_eq!(
            about["thumbnail"][0]["id"],
            "http://www.openbeelden.nl/images/170053/Het_Europees_tweelingencongres_in_Oirschot_%280_48%29.png"
        );
        assert_eq!(about["point"], json!(["52.13263,5.29127", "51.50705,5.30918"]));
    }

    #[test]
    fn test_nested_inlines_resources() {
        let doc = edm_bindings().nested_document();
        assert_eq!(doc["rdf_type"][0]["value"], "ore:Aggregation");

        let cho = &entries(&doc, "edm_aggregatedCHO")[0];
        assert_eq!(cho["id"], CHO);
        let inline = &cho["inline"];
        assert_eq!(inline["rdf_type"][0]["value"], "edm:ProvidedCHO");
        assert_eq!(entries(inline, "dc_subject").len(), 6);

        let member = &entries(&doc, "ore_aggregates")[0];
        assert_eq!(member["type"], "BNode");
        assert_eq!(member["inline"]["nave_province"][0]["value"], "Gelderland");

        for literal in entries(&doc, "edm_isShownAt") {
            assert!(literal.get("inline").is_none());
        }
    }

    /// Every entry carrying `inline` must point at an expandable resource
    fn assert_inline_only_for_resources(bindings: &Bindings, doc: &Value) {
        let Value::Object(map) = doc else { return };
        for (key, value) in map {
            if key == "about" {
                continue;
            }
            let Value::Array(list) = value else { continue };
            for entry in list {
                match entry.get("inline") {
                    Some(inline) => {
                        if let Some(id) = entry["id"].as_str() {
                            assert!(bindings.has_resource(&Term::iri(id)), "{} inlined", id);
                        }
                        assert_inline_only_for_resources(bindings, inline);
                    }
                    None => {
                        if let Some(id) = entry["id"].as_str() {
                            assert!(!bindings.has_resource(&Term::iri(id)) || key == "rdf_type");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_inline_only_for_resources() {
        let bindings = edm_bindings();
        let doc = bindings.nested_document();
        assert_inline_only_for_resources(&bindings, &doc);
    }

    #[test]
    fn test_unlinked_placeholder_becomes_literal() {
        let bindings = edm_bindings();
        let subjects = &bindings.nested_document()["edm_aggregatedCHO"][0]["inline"]["dc_subject"];
        let enriched: Vec<&Value> = subjects
            .as_array()
            .unwrap()
            .iter()
            .filter(|s| s["value"] == "test enriched")
            .collect();
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0]["type"], "Literal");
        assert_eq!(enriched[0]["lang"], "nl");
        assert!(enriched[0].get("id").is_none());
        assert!(enriched[0].get("inline").is_none());
    }

    #[test]
    fn test_linked_placeholder_redirects_to_concept() {
        let bindings = edm_bindings();
        let items = bindings.items_of(&Term::iri(CHO)).unwrap();
        let (_, subjects) = items
            .iter()
            .find(|(p, _)| p == "http://purl.org/dc/elements/1.1/subject")
            .unwrap();
        let redirected: Vec<&RdfObject> = subjects
            .iter()
            .filter(|o| o.enrichment == Enrichment::Redirected)
            .collect();
        assert_eq!(redirected.len(), 1);
        assert_eq!(redirected[0].term, gtaa("155912"));
        assert_eq!(redirected[0].value, "Steger, E.A.M.A.");
        assert!(bindings.is_inlined(&gtaa("155912")));
        assert!(bindings.is_inlined(&gtaa("155912_enriched")));
        assert!(!bindings.is_inlined(&Term::iri(ABOUT)));
    }

    #[test]
    fn test_flat_document() {
        let bindings = edm_bindings();
        let doc = bindings.flat_document();

        let subjects = entries(&doc, "dc_subject");
        assert_eq!(subjects.len(), 6);
        let ids: Vec<&str> = subjects.iter().filter_map(|s| s["id"].as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.iter().filter(|id| **id == format!("{}155912", GTAA)).count(), 2);
        assert!(!ids.iter().any(|id| id.ends_with("enrichment_link")));

        // the linked concept and its placeholder are only reachable inline
        assert!(doc.get("skos_definition").is_none());
        assert!(doc.get("skos_exactMatch").is_none());
        let proxy_values = entries(&doc, "narthex_proxyLiteralValue");
        assert_eq!(proxy_values.len(), 1);
        assert_eq!(proxy_values[0]["value"], "test enriched");

        assert!(doc.get("edm_aggregatedCHO").is_some());
        assert_eq!(doc["point"], doc["about"]["point"]);
        assert_eq!(entries(&doc["about"], "caption").len(), 2);
        assert!(doc["about"].get("class").is_none());
    }

    #[test]
    fn test_flat_entries_sorted_by_raw() {
        let doc = edm_bindings().flat_document();
        let raws: Vec<&str> = entries(&doc, "dc_description")
            .iter()
            .map(|e| e["raw"].as_str().unwrap())
            .collect();
        let mut sorted = raws.clone();
        sorted.sort();
        assert_eq!(raws, sorted);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let bindings = edm_bindings();
        let first = serde_json::to_string(&bindings.flat_document()).unwrap();
        let second = serde_json::to_string(&bindings.flat_document()).unwrap();
        assert_eq!(first, second);
        let nested = serde_json::to_string(&bindings.nested_document()).unwrap();
        assert_eq!(nested, serde_json::to_string(&bindings.nested_document()).unwrap());
        assert_eq!(first, serde_json::to_string(&bindings.flat_document()).unwrap());
    }

    #[test]
    fn test_list_and_first() {
        let bindings = edm_bindings();
        let titles = bindings.list("dc_title");
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].value, "Het Europees tweelingencongres in Oirschot");
        assert_eq!(
            bindings.first("dc_title").map(|o| o.value.as_str()),
            Some("Het Europees tweelingencongres in Oirschot")
        );
        assert!(bindings.first("dc_nothing").is_none());
    }

    #[test]
    fn test_statistics_and_lookups() {
        let bindings = edm_bindings();
        let stats = bindings.statistics();
        assert_eq!(stats.rdf_class[0], ("narthex:ProxyResource".to_string(), 2));
        assert!(bindings.lod_allowed());
        assert!(bindings.has_geo());
        assert_eq!(
            bindings.iri_from_search_label("dc_subject").unwrap(),
            "http://purl.org/dc/elements/1.1/subject"
        );
    }

    fn small_graph(statements: &[(&str, &str, Term)]) -> Graph {
        let mut graph = Graph::new(None, registry());
        for (s, p, o) in statements {
            graph.add(Triple::new(Term::iri(*s), *p, o.clone()).unwrap());
        }
        graph
    }

    #[test]
    fn test_web_resources_ordered_by_sort_key() {
        const AGG: &str = "http://example.org/aggregation";
        const RECORD: &str = "http://example.org/record";
        const WR1: &str = "http://example.org/view/1";
        const WR2: &str = "http://example.org/view/2";
        let web = "http://www.europeana.eu/schemas/edm/WebResource";
        let order = "http://schemas.delving.eu/nave/terms/resourceSortOrder";
        let thumb = "http://schemas.delving.eu/nave/terms/thumbSmall";
        let graph = small_graph(&[
            (AGG, RDF_TYPE, Term::iri("http://www.openarchives.org/ore/terms/Aggregation")),
            (AGG, EDM_HAS_VIEW, Term::iri(WR1)),
            (AGG, EDM_HAS_VIEW, Term::iri(WR2)),
            (WR1, RDF_TYPE, Term::iri(web)),
            (WR1, order, Term::literal("2")),
            (WR1, thumb, Term::literal("http://example.org/thumb/b")),
            (WR2, RDF_TYPE, Term::iri(web)),
            (WR2, order, Term::literal("1")),
            (WR2, thumb, Term::literal("http://example.org/thumb/z")),
            (RECORD, EDM_HAS_VIEW, Term::iri(WR2)),
            (RECORD, EDM_HAS_VIEW, Term::iri(WR1)),
        ]);
        let bindings = Bindings::new(AGG, &graph, ProjectionConfig::default());

        let nested = bindings.nested_document();
        let views: Vec<&str> = entries(&nested, "edm_hasView")
            .iter()
            .map(|v| v["id"].as_str().unwrap())
            .collect();
        assert_eq!(views, [WR2, WR1]);

        let flat = bindings.flat_document();
        let thumbs: Vec<&str> = entries(&flat, "nave_thumbSmall")
            .iter()
            .map(|v| v["value"].as_str().unwrap())
            .collect();
        assert_eq!(thumbs, ["http://example.org/thumb/z", "http://example.org/thumb/b"]);

        // outside an aggregation views are ordered like any other objects
        let bindings = Bindings::new(RECORD, &graph, ProjectionConfig::default());
        assert!(!bindings.about_resource().unwrap().is_aggregation());
        let nested = bindings.nested_document();
        let views: Vec<&str> = entries(&nested, "edm_hasView")
            .iter()
            .map(|v| v["id"].as_str().unwrap())
            .collect();
        assert_eq!(views, [WR1, WR2]);
    }

    #[test]
    fn test_cycles_and_depth_are_bounded() {
        const ABOUT_X: &str = "http://example.org/about";
        const A: &str = "http://example.org/a";
        const B: &str = "http://example.org/b";
        let related = "http://purl.org/dc/terms/relation";
        let graph = small_graph(&[
            (ABOUT_X, related, Term::iri(A)),
            (A, related, Term::iri(B)),
            (B, related, Term::iri(A)),
        ]);
        let bindings = Bindings::new(ABOUT_X, &graph, ProjectionConfig::default());
        let doc = bindings.nested_document();
        let a = &doc["dcterms_relation"][0]["inline"];
        let b = &a["dcterms_relation"][0]["inline"];
        assert_eq!(b["dcterms_relation"][0]["id"], A);
        assert!(b["dcterms_relation"][0].get("inline").is_none());

        let shallow = ProjectionConfig {
            max_inline_depth: 1,
            ..ProjectionConfig::default()
        };
        let bindings = Bindings::new(ABOUT_X, &graph, shallow);
        let doc = bindings.nested_document();
        let a = &doc["dcterms_relation"][0]["inline"];
        assert!(a["dcterms_relation"][0].get("inline").is_none());
    }

    #[test]
    fn test_do_not_follow_and_unknown_namespaces() {
        const ABOUT_X: &str = "http://example.org/about";
        const A: &str = "http://example.org/a";
        let graph = small_graph(&[
            (ABOUT_X, "http://xmlns.com/foaf/0.1/primaryTopic", Term::iri(A)),
            (ABOUT_X, "http://unknown.example/p", Term::literal("kept")),
            (A, "http://purl.org/dc/elements/1.1/title", Term::literal("A")),
            (A, "http://www.openarchives.org/ore/terms/isAggregatedBy", Term::iri(ABOUT_X)),
        ]);
        let bindings = Bindings::new(ABOUT_X, &graph, ProjectionConfig::default());
        let doc = bindings.nested_document();
        let topic = &doc["foaf_primaryTopic"][0];
        assert_eq!(topic["value"], "A");
        assert!(topic.get("inline").is_none());
        assert_eq!(bindings.about_resource().unwrap().items().len(), 2);

        // entries pointing back at the about resource stay out of the flat document
        let flat = bindings.flat_document();
        assert!(flat.get("ore_isAggregatedBy").is_none());
    }

    #[test]
    fn test_unmapped_predicates_filed_under_iri() {
        const ABOUT_X: &str = "http://example.org/about";
        const UNKNOWN: &str = "http://unknown.example/p";
        const DEVMODE: &str = "http://localhost:8000/resource/aggregation/set/1";
        let graph = small_graph(&[
            (ABOUT_X, UNKNOWN, Term::literal("kept")),
            (ABOUT_X, DEVMODE, Term::literal("also kept")),
            (ABOUT_X, "http://purl.org/dc/elements/1.1/title", Term::literal("Title")),
        ]);
        let bindings = Bindings::new(ABOUT_X, &graph, ProjectionConfig::default());

        let nested = bindings.nested_document();
        assert_eq!(nested[UNKNOWN][0]["value"], "kept");
        assert_eq!(nested[DEVMODE][0]["value"], "also kept");
        assert_eq!(nested["dc_title"][0]["value"], "Title");
        assert_eq!(nested.as_object().unwrap().len(), 5);

        let flat = bindings.flat_document();
        assert_eq!(flat[UNKNOWN][0]["value"], "kept");
        assert_eq!(flat[DEVMODE][0]["raw"], "also kept");
        assert_eq!(flat["dc_title"][0]["value"], "Title");
    }
}
