//! `foaf:` record schemas: agents that publish or maintain records.

use crate::model::{FieldDescriptor, RecordSchema};

/// Schema name of `foaf:Agent`.
pub const AGENT: &str = "Agent";

/// Returns the `foaf:Agent` schema.
#[must_use]
pub fn agent() -> RecordSchema {
    RecordSchema::new(
        AGENT,
        "http://xmlns.com/foaf/0.1/Agent",
        vec![
            FieldDescriptor::literal("name", "http://xmlns.com/foaf/0.1/name")
                .multiple()
                .mandatory(),
            FieldDescriptor::literal("identifier", "http://purl.org/dc/terms/identifier"),
            FieldDescriptor::iri("homepage", "http://xmlns.com/foaf/0.1/homepage"),
            FieldDescriptor::iri("mbox", "http://xmlns.com/foaf/0.1/mbox"),
        ],
    )
}
