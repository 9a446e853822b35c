//! N-Triples payloads for the Graph Store protocol
//!
//! Parsing goes through `oxttl`, serialization through the `oxrdf`
//! display implementations, so escaping follows the W3C grammar.

use oxrdf::{BlankNode, NamedNode, NamedOrBlankNode};
use oxttl::NTriplesParser;
use std::sync::Arc;
use tracing::debug;

use crate::error::LodError;
use crate::graph::{Graph, Triple};
use crate::namespace::NamespaceRegistry;
use crate::term::{Literal, Term};
use crate::vocab::{RDF_LANG_STRING, XSD_STRING};

/// Parse an N-Triples document into a new graph
///
/// Any syntax error rejects the whole payload with [`LodError::Parse`].
pub fn parse(
    payload: &str,
    identifier: Option<String>,
    registry: Arc<NamespaceRegistry>,
) -> Result<Graph, LodError> {
    let mut graph = Graph::new(identifier, registry);
    let scope = graph.scope();
    for result in NTriplesParser::new().for_reader(payload.as_bytes()) {
        let triple = result.map_err(|e| LodError::Parse(e.to_string()))?;
        let subject = match triple.subject {
            NamedOrBlankNode::NamedNode(node) => Term::Iri(node.into_string()),
            NamedOrBlankNode::BlankNode(node) => Term::BlankNode {
                id: node.into_string(),
                scope,
            },
        };
        let object = from_ox_term(triple.object, scope)?;
        graph.add(Triple::new(subject, triple.predicate.into_string(), object)?);
    }
    debug!(triples = graph.len(), graph = ?graph.identifier(), "Parsed N-Triples payload");
    Ok(graph)
}

fn from_ox_term(term: oxrdf::Term, scope: u64) -> Result<Term, LodError> {
    match term {
        oxrdf::Term::NamedNode(node) => Ok(Term::Iri(node.into_string())),
        oxrdf::Term::BlankNode(node) => Ok(Term::BlankNode {
            id: node.into_string(),
            scope,
        }),
        oxrdf::Term::Literal(lit) => {
            let language = lit.language().map(str::to_string);
            let datatype = match lit.datatype().as_str() {
                XSD_STRING | RDF_LANG_STRING => None,
                other => Some(other.to_string()),
            };
            Ok(Term::Literal(Literal {
                value: lit.value().to_string(),
                datatype,
                language,
            }))
        }
        #[allow(unreachable_patterns)]
        other => Err(LodError::MalformedTerm(format!(
            "unsupported object term {}",
            other
        ))),
    }
}

fn to_ox_term(term: &Term) -> oxrdf::Term {
    match term {
        Term::Iri(iri) => NamedNode::new_unchecked(iri.as_str()).into(),
        Term::BlankNode { id, .. } => BlankNode::new_unchecked(id.as_str()).into(),
        Term::Literal(lit) => {
            let literal = match (&lit.language, &lit.datatype) {
                (Some(lang), _) => {
                    oxrdf::Literal::new_language_tagged_literal_unchecked(&lit.value, lang.as_str())
                }
                (None, Some(dt)) => {
                    oxrdf::Literal::new_typed_literal(&lit.value, NamedNode::new_unchecked(dt.as_str()))
                }
                (None, None) => oxrdf::Literal::new_simple_literal(&lit.value),
            };
            literal.into()
        }
    }
}

fn to_ox_triple(triple: &Triple) -> oxrdf::Triple {
    let subject: NamedOrBlankNode = match &triple.subject {
        Term::BlankNode { id, .. } => BlankNode::new_unchecked(id.as_str()).into(),
        other => NamedNode::new_unchecked(other.lexical()).into(),
    };
    oxrdf::Triple::new(
        subject,
        NamedNode::new_unchecked(triple.predicate.as_str()),
        to_ox_term(&triple.object),
    )
}

/// Serialize a graph as N-Triples, one statement per line
pub fn serialize(graph: &Graph) -> String {
    graph
        .iter()
        .map(|triple| format!("{} .\n", to_ox_triple(triple)))
        .collect()
}

/// Serialize a graph as N-Quads in its own named graph
pub fn serialize_nquads(graph: &Graph) -> String {
    match graph.identifier() {
        Some(name) => graph
            .iter()
            .map(|triple| {
                let quad = to_ox_triple(triple).in_graph(NamedNode::new_unchecked(name));
                format!("{} .\n", quad)
            })
            .collect(),
        None => serialize(graph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{RDF_TYPE, SKOS_PREF_LABEL};

    const EDM_RECORD: &str = include_str!("../tests/fixtures/edm_record.nt");

    fn registry() -> Arc<NamespaceRegistry> {
        Arc::new(NamespaceRegistry::with_defaults())
    }

    #[test]
    fn test_parse_fixture() {
        let graph = parse(EDM_RECORD, None, registry()).unwrap();
        assert_eq!(graph.len(), 58);
        let concept = Term::iri("http://data.beeldengeluid.nl/gtaa/155912");
        let labels: Vec<&Term> = graph.objects_of(&concept, SKOS_PREF_LABEL).collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].language(), Some("nl"));
    }

    #[test]
    fn test_syntax_error_rejects_payload() {
        let result = parse("<http://example.org/a> <http://example.org/p> .\n", None, registry());
        assert!(matches!(result, Err(LodError::Parse(_))));
    }

    #[test]
    fn test_serialized_graph_parses_back() {
        let graph = parse(EDM_RECORD, None, registry()).unwrap();
        let reparsed = parse(&serialize(&graph), None, registry()).unwrap();
        assert_eq!(reparsed.len(), graph.len());
        assert_eq!(
            reparsed.objects(RDF_TYPE).count(),
            graph.objects(RDF_TYPE).count()
        );
    }

    #[test]
    fn test_nquads_carry_graph_name() {
        let mut graph = Graph::new(Some("http://example.org/g".to_string()), registry());
        graph.add(
            Triple::new(
                Term::iri("http://example.org/a"),
                RDF_TYPE,
                Term::iri("http://example.org/C"),
            )
            .unwrap(),
        );
        let nquads = serialize_nquads(&graph);
        assert_eq!(
            nquads,
            "<http://example.org/a> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/C> <http://example.org/g> .\n"
        );
    }
}
