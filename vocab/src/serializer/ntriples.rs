//! N-Triples serializer for exchange graphs.
//!
//! Produces one triple per line with absolute IRIs, in canonical graph order.

use super::{iri_to_text, object_to_text};
use crate::graph::ExchangeGraph;

/// Serializes `graph` to an N-Triples string.
///
/// # Errors
///
/// This function is infallible; it always returns a valid N-Triples string.
#[must_use]
pub fn to_ntriples(graph: &ExchangeGraph) -> String {
    let mut out = String::with_capacity(graph.len() * 128);
    for triple in graph {
        out.push_str(&iri_to_text(&triple.subject));
        out.push(' ');
        out.push_str(&iri_to_text(&triple.relation));
        out.push(' ');
        out.push_str(&object_to_text(&triple.object));
        out.push_str(" .\n");
    }
    out
}
