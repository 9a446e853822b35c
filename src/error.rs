//! Error types for graph resolution and projection

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LodError {
    #[error("No such graph: <{0}>")]
    UnknownGraph(String),

    #[error("Triple store answered {status} for {url}")]
    Store { status: u16, url: String },

    #[error("Malformed term: {0}")]
    MalformedTerm(String),

    #[error("No registered namespace matches <{0}>")]
    UnknownNamespace(String),

    #[error("'{0}' cannot be used as a document field name")]
    InvalidFieldName(String),

    #[error("Failed to parse graph payload: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Triple store rejected the {0}")]
    Rejected(String),

    #[error("{0}")]
    Usage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LodError {
    /// Transport failures worth another attempt (timeouts, refused connections)
    pub fn is_transient(&self) -> bool {
        match self {
            LodError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
