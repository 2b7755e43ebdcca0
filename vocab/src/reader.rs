//! Reads Turtle / N-Triples text back into an [`ExchangeGraph`].
//!
//! Parsing is delegated to `sophia_turtle`; terms are then mapped onto the
//! exchange-graph model. Blank nodes and quoted triples have no counterpart
//! there and are rejected.

use sophia_api::source::TripleSource;
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple as _;
use sophia_turtle::parser::{nt, turtle};

use crate::error::GraphError;
use crate::graph::{ExchangeGraph, Literal, Object, Triple};
use crate::model::iris::RDF_LANG_STRING;
use crate::serializer::GraphFormat;

/// Parses `text` in the given format.
///
/// # Errors
///
/// Returns [`GraphError::Parse`] on syntax errors and
/// [`GraphError::Unsupported`] for blank nodes or other terms exchange
/// graphs do not carry.
pub fn parse(text: &str, format: GraphFormat) -> Result<ExchangeGraph, GraphError> {
    match format {
        GraphFormat::Turtle => parse_turtle(text),
        GraphFormat::NTriples => parse_ntriples(text),
    }
}

/// Parses a Turtle document.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_turtle(text: &str) -> Result<ExchangeGraph, GraphError> {
    collect(turtle::parse_str(text))
}

/// Parses an N-Triples document.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_ntriples(text: &str) -> Result<ExchangeGraph, GraphError> {
    collect(nt::parse_str(text))
}

fn collect<S: TripleSource>(mut source: S) -> Result<ExchangeGraph, GraphError> {
    let mut graph = ExchangeGraph::new();
    let mut failure = None;
    source
        .for_each_triple(|t| {
            if failure.is_some() {
                return;
            }
            match convert(&t.s(), &t.p(), &t.o()) {
                Ok(triple) => {
                    graph.insert_triple(triple);
                }
                Err(e) => failure = Some(e),
            }
        })
        .map_err(|e| GraphError::Parse(e.to_string()))?;

    match failure {
        Some(e) => Err(e),
        None => Ok(graph),
    }
}

fn convert<S: Term, P: Term, O: Term>(s: &S, p: &P, o: &O) -> Result<Triple, GraphError> {
    Ok(Triple {
        subject: iri(s)?,
        relation: iri(p)?,
        object: object(o)?,
    })
}

fn iri<T: Term>(term: &T) -> Result<String, GraphError> {
    term.iri()
        .map(|iri| iri.as_str().to_owned())
        .ok_or_else(|| GraphError::Unsupported(describe(term.kind())))
}

fn object<T: Term>(term: &T) -> Result<Object, GraphError> {
    match term.kind() {
        TermKind::Iri => iri(term).map(Object::Iri),
        TermKind::Literal => {
            let text = term
                .lexical_form()
                .map(|lex| (*lex).to_owned())
                .unwrap_or_default();
            if let Some(tag) = term.language_tag() {
                return Ok(Object::Literal(Literal::lang(text, tag.as_str())));
            }
            match term.datatype() {
                Some(dt) if dt.as_str() != RDF_LANG_STRING => {
                    Ok(Object::Literal(Literal::typed(text, dt.as_str())))
                }
                _ => Ok(Object::Literal(Literal::plain(text))),
            }
        }
        other => Err(GraphError::Unsupported(describe(other))),
    }
}

fn describe(kind: TermKind) -> String {
    match kind {
        TermKind::Iri => "IRI".to_owned(),
        TermKind::BlankNode => "blank node".to_owned(),
        TermKind::Literal => "literal in subject or relation position".to_owned(),
        _ => "quoted triple or variable".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plain_language_and_typed_literals() {
        let graph = parse_turtle(
            "<https://e.org/s> <https://e.org/p> \"a\", \"b\"@en, \"3\"^^<http://www.w3.org/2001/XMLSchema#decimal> .",
        )
        .unwrap();
        assert_eq!(graph.len(), 3);
        assert!(graph.contains("https://e.org/s", "https://e.org/p", &Literal::plain("a").into()));
        assert!(graph.contains("https://e.org/s", "https://e.org/p", &Literal::lang("b", "en").into()));
        assert!(graph.contains(
            "https://e.org/s",
            "https://e.org/p",
            &Literal::typed("3", "http://www.w3.org/2001/XMLSchema#decimal").into()
        ));
    }

    #[test]
    fn rejects_blank_nodes() {
        let err = parse_turtle("_:b0 <https://e.org/p> \"a\" .").unwrap_err();
        assert_eq!(err, GraphError::Unsupported("blank node".into()));
    }

    #[test]
    fn reports_syntax_errors() {
        assert!(matches!(
            parse_ntriples("<https://e.org/s> <https://e.org/p> ."),
            Err(GraphError::Parse(_))
        ));
    }
}
