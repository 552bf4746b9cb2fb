//! Content negotiation: does the client want an HTML page or structured data?

use axum::http::{header, HeaderMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentPreference {
    /// The Accept header mentions `text/html`.
    Html,
    /// Anything else, including a missing Accept header.
    StructuredData,
}

impl ContentPreference {
    /// Classify a raw Accept header value. Quality factors are ignored.
    pub fn from_accept(accept: Option<&str>) -> Self {
        match accept {
            Some(value) if value.contains("text/html") => Self::Html,
            _ => Self::StructuredData,
        }
    }

    /// Classify from request headers. Repeated Accept headers are read together.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let prefers_html = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| Self::from_accept(Some(v)) == Self::Html);
        if prefers_html {
            Self::Html
        } else {
            Self::StructuredData
        }
    }
}
