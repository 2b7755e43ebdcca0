//! Turtle 1.1 serializer for exchange graphs.
//!
//! Triples are grouped by subject. Every relation and IRI object is written
//! in full inside angle brackets, so the document needs no prefix block.

use super::{iri_to_text, object_to_text};
use crate::graph::ExchangeGraph;

/// Serializes `graph` to a Turtle string.
///
/// # Errors
///
/// This function is infallible; it always returns a valid Turtle string.
#[must_use]
pub fn to_turtle(graph: &ExchangeGraph) -> String {
    let mut out = String::with_capacity(graph.len() * 96);
    let mut current: Option<&str> = None;

    for triple in graph {
        match current {
            Some(subject) if subject == triple.subject => out.push_str(" ;\n"),
            Some(_) => {
                out.push_str(" .\n\n");
                out.push_str(&iri_to_text(&triple.subject));
                out.push('\n');
            }
            None => {
                out.push_str(&iri_to_text(&triple.subject));
                out.push('\n');
            }
        }
        out.push_str("  ");
        out.push_str(&iri_to_text(&triple.relation));
        out.push(' ');
        out.push_str(&object_to_text(&triple.object));
        current = Some(triple.subject.as_str());
    }

    if current.is_some() {
        out.push_str(" .\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Literal, Object};

    #[test]
    fn groups_by_subject() {
        let mut graph = ExchangeGraph::new();
        graph.insert("https://e.org/a", "https://e.org/p", Literal::plain("1").into());
        graph.insert("https://e.org/a", "https://e.org/q", Object::Iri("https://e.org/b".into()));
        graph.insert("https://e.org/b", "https://e.org/p", Literal::lang("2", "en").into());

        assert_eq!(
            to_turtle(&graph),
            "<https://e.org/a>\n  <https://e.org/p> \"1\" ;\n  <https://e.org/q> <https://e.org/b> .\n\n\
             <https://e.org/b>\n  <https://e.org/p> \"2\"@en .\n"
        );
    }

    #[test]
    fn empty_graph_is_empty_document() {
        assert!(to_turtle(&ExchangeGraph::new()).is_empty());
    }
}
