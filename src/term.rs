//! RDF term model
//!
//! A [`Term`] is a closed sum of IRI, blank node and literal. Blank nodes
//! carry the scope of the graph that minted them, so identical labels from
//! two different graphs never compare equal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LodError;
use crate::vocab::{RDF_LANG_STRING, XSD_BOOLEAN, XSD_INTEGER, XSD_STRING};

/// Longest literal value handed out by typed lookups before it is cut
pub const MAX_LITERAL_LEN: usize = 32766;
/// Longest value written into a document entry before it is cut
pub const MAX_ENTRY_VALUE_LEN: usize = 32765;
/// Length an over-long value is cut down to
pub const CUT_VALUE_LEN: usize = 32700;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    BlankNode { id: String, scope: u64 },
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub value: String,
    /// Never `xsd:string` or `rdf:langString`; those are folded into `None`
    pub datatype: Option<String>,
    pub language: Option<String>,
}

/// The kind of a term as it appears in document entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TermKind {
    #[serde(rename = "URIRef")]
    Iri,
    #[serde(rename = "BNode")]
    BlankNode,
    #[serde(rename = "Literal")]
    Literal,
}

impl TermKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TermKind::Iri => "URIRef",
            TermKind::BlankNode => "BNode",
            TermKind::Literal => "Literal",
        }
    }
}

/// Native value of a literal after datatype coercion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NativeValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl Literal {
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn with_language(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    /// Build a typed literal, normalizing booleans and integers
    ///
    /// Boolean values other than `true`/`True` become `false`. An integer
    /// that does not parse is a [`LodError::MalformedTerm`].
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Result<Self, LodError> {
        let value = value.into();
        let datatype = datatype.into();
        let value = match datatype.as_str() {
            XSD_BOOLEAN => (value == "true" || value == "True").to_string(),
            XSD_INTEGER => value
                .trim()
                .parse::<i64>()
                .map_err(|_| {
                    LodError::MalformedTerm(format!("'{}' is not a valid xsd:integer", value))
                })?
                .to_string(),
            _ => value,
        };
        let datatype = match datatype.as_str() {
            XSD_STRING | RDF_LANG_STRING => None,
            _ => Some(datatype),
        };
        Ok(Self {
            value,
            datatype,
            language: None,
        })
    }

    /// Native value according to the declared datatype
    pub fn native(&self) -> NativeValue {
        match self.datatype.as_deref() {
            Some(XSD_BOOLEAN) => NativeValue::Bool(self.value == "true" || self.value == "True"),
            Some(XSD_INTEGER) => match self.value.parse::<i64>() {
                Ok(n) => NativeValue::Integer(n),
                Err(_) => NativeValue::Text(self.value.clone()),
            },
            _ => NativeValue::Text(self.value.clone()),
        }
    }
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::simple(value))
    }

    pub fn kind(&self) -> TermKind {
        match self {
            Term::Iri(_) => TermKind::Iri,
            Term::BlankNode { .. } => TermKind::BlankNode,
            Term::Literal(_) => TermKind::Literal,
        }
    }

    /// Lexical form: the IRI, the blank node label or the literal value
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::BlankNode { id, .. } => id,
            Term::Literal(lit) => &lit.value,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode { .. })
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// IRIs and blank nodes may appear as triple subjects
    pub fn is_resource(&self) -> bool {
        !self.is_literal()
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            Term::Literal(lit) => lit.language.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::BlankNode { id, .. } => write!(f, "_:{}", id),
            Term::Literal(lit) => {
                write!(f, "{:?}", lit.value)?;
                if let Some(lang) = &lit.language {
                    write!(f, "@{}", lang)
                } else if let Some(dt) = &lit.datatype {
                    write!(f, "^^<{}>", dt)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A term in the SPARQL JSON results encoding
///
/// `{"type": "uri" | "bnode" | "literal" | "typed-literal", "value": ..,
/// "xml:lang"?: .., "datatype"?: ..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedTerm {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub value: String,
    #[serde(
        rename = "xml:lang",
        alias = "lang",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

fn default_kind() -> String {
    "literal".to_string()
}

impl TaggedTerm {
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: "uri".to_string(),
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }

    pub fn literal(value: impl Into<String>, lang: Option<&str>) -> Self {
        Self {
            kind: "literal".to_string(),
            value: value.into(),
            lang: lang.map(str::to_string),
            datatype: None,
        }
    }

    /// Coerce into a [`Term`], minting blank nodes in `scope`
    pub fn to_term(&self, scope: u64) -> Result<Term, LodError> {
        match self.kind.as_str() {
            "uri" => Ok(Term::Iri(self.value.clone())),
            "bnode" => Ok(Term::BlankNode {
                id: self.value.clone(),
                scope,
            }),
            "literal" | "typed-literal" => match (&self.lang, self.datatype.as_deref()) {
                (Some(lang), None | Some(RDF_LANG_STRING)) => {
                    Ok(Term::Literal(Literal::with_language(&self.value, lang)))
                }
                (_, Some(datatype)) => Ok(Term::Literal(Literal::typed(&self.value, datatype)?)),
                (None, None) => Ok(Term::literal(&self.value)),
            },
            other => Err(LodError::MalformedTerm(format!(
                "unrecognized term type '{}' for value '{}'",
                other, self.value
            ))),
        }
    }
}

/// Cut `value` to [`CUT_VALUE_LEN`] characters when it is longer than `max` characters
pub fn cap_value(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        value.chars().take(CUT_VALUE_LEN).collect()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_and_bnode_coercion() {
        let uri = TaggedTerm::uri("http://example.org/a");
        assert_eq!(uri.to_term(1).unwrap(), Term::iri("http://example.org/a"));

        let bnode = TaggedTerm {
            kind: "bnode".to_string(),
            value: "b0".to_string(),
            lang: None,
            datatype: None,
        };
        let term = bnode.to_term(7).unwrap();
        assert!(term.is_blank_node());
        assert_ne!(term, bnode.to_term(8).unwrap());
    }

    #[test]
    fn test_language_is_preserved() {
        let json = r#"{"type": "literal", "value": "bomen", "xml:lang": "nl"}"#;
        let tagged: TaggedTerm = serde_json::from_str(json).unwrap();
        let term = tagged.to_term(0).unwrap();
        assert_eq!(term.language(), Some("nl"));
        assert_eq!(term.lexical(), "bomen");
    }

    #[test]
    fn test_lang_string_datatype_keeps_language() {
        let json = r#"{"type": "literal", "value": "bomen", "xml:lang": "nl",
            "datatype": "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString"}"#;
        let tagged: TaggedTerm = serde_json::from_str(json).unwrap();
        let term = tagged.to_term(0).unwrap();
        assert_eq!(term, Term::Literal(Literal::with_language("bomen", "nl")));
        assert_eq!(term.as_literal().unwrap().datatype, None);

        // a real datatype still wins over a stray language tag
        let json = r#"{"type": "typed-literal", "value": "5", "xml:lang": "nl",
            "datatype": "http://www.w3.org/2001/XMLSchema#integer"}"#;
        let tagged: TaggedTerm = serde_json::from_str(json).unwrap();
        let literal = tagged.to_term(0).unwrap();
        assert_eq!(literal.as_literal().unwrap().datatype.as_deref(), Some(XSD_INTEGER));
        assert_eq!(literal.language(), None);
    }

    #[test]
    fn test_boolean_coercion() {
        for (raw, expected) in [("true", true), ("True", true), ("false", false), ("yes", false)] {
            let lit = Literal::typed(raw, XSD_BOOLEAN).unwrap();
            assert_eq!(lit.native(), NativeValue::Bool(expected));
        }
    }

    #[test]
    fn test_integer_coercion() {
        let lit = Literal::typed(" 42", XSD_INTEGER).unwrap();
        assert_eq!(lit.native(), NativeValue::Integer(42));
        assert!(matches!(
            Literal::typed("4.2", XSD_INTEGER),
            Err(LodError::MalformedTerm(_))
        ));
    }

    #[test]
    fn test_xsd_string_folds_to_plain() {
        let lit = Literal::typed("plain", XSD_STRING).unwrap();
        assert_eq!(lit, Literal::simple("plain"));
    }

    #[test]
    fn test_unknown_type_is_malformed() {
        let tagged: TaggedTerm =
            serde_json::from_str(r#"{"type": "quad", "value": "x"}"#).unwrap();
        assert!(matches!(tagged.to_term(0), Err(LodError::MalformedTerm(_))));
    }

    #[test]
    fn test_missing_type_defaults_to_literal() {
        let tagged: TaggedTerm = serde_json::from_str(r#"{"value": "x"}"#).unwrap();
        assert_eq!(tagged.to_term(0).unwrap(), Term::literal("x"));
    }

    #[test]
    fn test_cap_value() {
        let long = "a".repeat(MAX_ENTRY_VALUE_LEN + 1);
        assert_eq!(cap_value(&long, MAX_ENTRY_VALUE_LEN).len(), CUT_VALUE_LEN);
        let short = "a".repeat(MAX_ENTRY_VALUE_LEN);
        assert_eq!(cap_value(&short, MAX_ENTRY_VALUE_LEN).len(), MAX_ENTRY_VALUE_LEN);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Term::iri("x").kind().as_str(), "URIRef");
        assert_eq!(Term::literal("x").kind().as_str(), "Literal");
    }
}
