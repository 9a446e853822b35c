//! SPARQL 1.1 query results in JSON
//!
//! `{"head": {"vars": [..]}, "results": {"bindings": [{var: term}, ..]}}`
//! for SELECT, `{"head": {}, "boolean": ..}` for ASK.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::LodError;
use crate::term::TaggedTerm;

/// One solution: variable name to bound term. Unbound variables are absent.
pub type Row = IndexMap<String, TaggedTerm>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: Head,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultRows>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Head {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRows {
    #[serde(default)]
    pub bindings: Vec<Row>,
}

impl SparqlResults {
    pub fn from_json(json: &str) -> Result<Self, LodError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn vars(&self) -> &[String] {
        &self.head.vars
    }

    pub fn rows(&self) -> &[Row] {
        self.results
            .as_ref()
            .map(|r| r.bindings.as_slice())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Answer of an ASK query
    pub fn ask(&self) -> Result<bool, LodError> {
        self.boolean
            .ok_or_else(|| LodError::Parse("ASK response carries no boolean".to_string()))
    }

    /// Value of `?count` in the first row of a COUNT query
    pub fn count(&self) -> Result<u64, LodError> {
        let term = self
            .rows()
            .first()
            .and_then(|row| row.get("count"))
            .ok_or_else(|| LodError::Parse("COUNT response carries no ?count".to_string()))?;
        term.value
            .trim()
            .parse()
            .map_err(|_| LodError::Parse(format!("'{}' is not a count", term.value)))
    }

    /// Lexical values bound to `var`, in row order
    pub fn column(&self, var: &str) -> Vec<&str> {
        self.rows()
            .iter()
            .filter_map(|row| row.get(var))
            .map(|term| term.value.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select_fixture() {
        let results =
            SparqlResults::from_json(include_str!("../tests/fixtures/context_select.json")).unwrap();
        assert_eq!(results.vars(), ["s", "p", "o", "p2", "o2", "p3", "o3"]);
        assert_eq!(results.rows().len(), 130);
    }

    #[test]
    fn test_ask() {
        let results = SparqlResults::from_json(r#"{"head": {}, "boolean": true}"#).unwrap();
        assert!(results.ask().unwrap());
        assert!(results.is_empty());
    }

    #[test]
    fn test_count() {
        let json = r#"{"head": {"vars": ["count"]}, "results": {"bindings": [
            {"count": {"type": "typed-literal", "datatype": "http://www.w3.org/2001/XMLSchema#integer", "value": "118"}}
        ]}}"#;
        let results = SparqlResults::from_json(json).unwrap();
        assert_eq!(results.count().unwrap(), 118);
        assert!(results.ask().is_err());
    }

    #[test]
    fn test_column() {
        let json = r#"{"head": {"vars": ["s"]}, "results": {"bindings": [
            {"s": {"type": "uri", "value": "http://example.org/a"}},
            {},
            {"s": {"type": "uri", "value": "http://example.org/b"}}
        ]}}"#;
        let results = SparqlResults::from_json(json).unwrap();
        assert_eq!(results.column("s"), ["http://example.org/a", "http://example.org/b"]);
    }
}
