//! Namespace registry
//!
//! Maps namespace IRIs to short prefixes. Several IRIs may share a prefix;
//! when resolving a prefix back to an IRI the first registered one wins.

use std::fmt;

use crate::error::LodError;
use crate::vocab::DEFAULT_NAMESPACES;

/// A `prefix:local` short name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub prefix: String,
    pub local: String,
}

impl QName {
    /// The qname with `:` replaced by `_`, usable as a document field name
    ///
    /// Fails with [`LodError::InvalidFieldName`] instead of mangling local
    /// names that contain characters a field name cannot hold.
    pub fn search_label(&self) -> Result<String, LodError> {
        let label = format!("{}_{}", self.prefix, self.local);
        let valid = label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(label)
        } else {
            Err(LodError::InvalidFieldName(label))
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    /// `(iri, prefix)` in registration order
    entries: Vec<(String, String)>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the built-in namespace table
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (iri, prefix) in DEFAULT_NAMESPACES {
            registry.register(prefix, iri);
        }
        registry
    }

    /// Register `iri` under `prefix`; an already registered IRI keeps its prefix
    pub fn register(&mut self, prefix: &str, iri: &str) {
        if self.entries.iter().any(|(known, _)| known == iri) {
            return;
        }
        self.entries.push((iri.to_string(), prefix.to_string()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve an IRI against the longest matching namespace
    pub fn to_qname(&self, iri: &str) -> Result<QName, LodError> {
        self.entries
            .iter()
            .filter(|(ns, _)| iri.len() > ns.len() && iri.starts_with(ns.as_str()))
            .max_by_key(|(ns, _)| ns.len())
            .map(|(ns, prefix)| QName {
                prefix: prefix.clone(),
                local: iri[ns.len()..].to_string(),
            })
            .ok_or_else(|| LodError::UnknownNamespace(iri.to_string()))
    }

    pub fn to_search_label(&self, iri: &str) -> Result<String, LodError> {
        self.to_qname(iri)?.search_label()
    }

    /// First namespace IRI registered under `prefix`
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, p)| p == prefix)
            .map(|(iri, _)| iri.as_str())
    }

    /// Reverse of [`QName::search_label`]
    ///
    /// Prefixes may themselves contain `_` (`wgs84_pos`), so the longest
    /// registered prefix followed by `_` is used as the split point.
    pub fn iri_from_search_label(&self, label: &str) -> Result<String, LodError> {
        self.entries
            .iter()
            .filter(|(_, prefix)| {
                label.len() > prefix.len() + 1
                    && label.starts_with(prefix.as_str())
                    && label.as_bytes()[prefix.len()] == b'_'
            })
            .max_by_key(|(_, prefix)| prefix.len())
            .and_then(|(_, prefix)| {
                self.namespace(prefix)
                    .map(|ns| format!("{}{}", ns, &label[prefix.len() + 1..]))
            })
            .ok_or_else(|| LodError::UnknownNamespace(label.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_and_search_label() {
        let registry = NamespaceRegistry::with_defaults();
        let qname = registry
            .to_qname("http://purl.org/dc/elements/1.1/title")
            .unwrap();
        assert_eq!(qname.to_string(), "dc:title");
        assert_eq!(qname.search_label().unwrap(), "dc_title");
    }

    #[test]
    fn test_longest_namespace_wins() {
        let registry = NamespaceRegistry::with_defaults();
        let qname = registry
            .to_qname("http://schemas.delving.eu/nave/terms/thumbnail")
            .unwrap();
        assert_eq!(qname.to_string(), "nave:thumbnail");
    }

    #[test]
    fn test_unknown_namespace() {
        let registry = NamespaceRegistry::with_defaults();
        assert!(matches!(
            registry.to_qname("http://unknown.example/x"),
            Err(LodError::UnknownNamespace(_))
        ));
    }

    #[test]
    fn test_first_registered_prefix_iri_wins() {
        let registry = NamespaceRegistry::with_defaults();
        assert_eq!(registry.namespace("tib"), Some("http://www.tib.nl/schemas/tib/"));
        let qname = registry
            .to_qname("http://schemas.delving.eu/resource/ns/tib/creator")
            .unwrap();
        assert_eq!(qname.prefix, "tib");
    }

    #[test]
    fn test_reregistering_iri_is_ignored() {
        let mut registry = NamespaceRegistry::new();
        registry.register("ex", "http://example.org/");
        registry.register("other", "http://example.org/");
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.to_qname("http://example.org/a").unwrap().prefix,
            "ex"
        );
    }

    #[test]
    fn test_invalid_field_name_is_surfaced() {
        let registry = NamespaceRegistry::with_defaults();
        let result = registry.to_search_label("http://localhost:8000/resource/aggregation/x");
        assert!(matches!(result, Err(LodError::InvalidFieldName(_))));
    }

    #[test]
    fn test_search_label_round_trip() {
        let registry = NamespaceRegistry::with_defaults();
        for iri in [
            "http://www.w3.org/2003/01/geo/wgs84_pos#lat",
            "http://purl.org/dc/elements/1.1/subject",
            "http://dbpedia.org/ontology/name",
        ] {
            let label = registry.to_search_label(iri).unwrap();
            assert_eq!(registry.iri_from_search_label(&label).unwrap(), iri);
        }
    }
}
