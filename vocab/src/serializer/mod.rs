//! Text serializers for exchange graphs.
//!
//! Two formats are supported:
//! - **Turtle** ([`turtle`]): triples grouped by subject, the default
//!   submission format
//! - **N-Triples** ([`ntriples`]): one triple per line, for streaming and
//!   line-based diffing
//!
//! Both write fully-qualified IRIs (no prefix declarations), so the output
//! of the same graph is byte-identical across runs.

pub mod ntriples;
pub mod turtle;

use crate::graph::{ExchangeGraph, Literal, Object};

/// A graph text format together with its media type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum GraphFormat {
    /// Turtle 1.1.
    #[default]
    Turtle,
    /// N-Triples.
    NTriples,
}

impl GraphFormat {
    /// The media type sent as `Content-Type` / `Accept`.
    #[must_use]
    pub fn media_type(self) -> &'static str {
        match self {
            GraphFormat::Turtle => "text/turtle",
            GraphFormat::NTriples => "application/n-triples",
        }
    }

    /// Serializes `graph` in this format.
    #[must_use]
    pub fn render(self, graph: &ExchangeGraph) -> String {
        match self {
            GraphFormat::Turtle => turtle::to_turtle(graph),
            GraphFormat::NTriples => ntriples::to_ntriples(graph),
        }
    }
}

impl std::str::FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "turtle" | "ttl" | "text/turtle" => Ok(GraphFormat::Turtle),
            "ntriples" | "n-triples" | "nt" | "application/n-triples" => Ok(GraphFormat::NTriples),
            other => Err(format!("unknown graph format: {other}")),
        }
    }
}

/// Writes an object term in the syntax shared by Turtle and N-Triples.
pub(crate) fn object_to_text(object: &Object) -> String {
    match object {
        Object::Iri(iri) => iri_to_text(iri),
        Object::Literal(literal) => literal_to_text(literal),
    }
}

pub(crate) fn iri_to_text(iri: &str) -> String {
    format!("<{}>", iri)
}

fn literal_to_text(literal: &Literal) -> String {
    let quoted = quote(literal.text());
    match (literal.language(), literal.datatype()) {
        (Some(language), _) => format!("{quoted}@{language}"),
        (None, Some(datatype)) => format!("{quoted}^^<{datatype}>"),
        (None, None) => quoted,
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
