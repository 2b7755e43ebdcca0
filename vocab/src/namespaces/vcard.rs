//! `vcard:` record schemas: contact points.

use crate::model::{FieldDescriptor, RecordSchema};

/// Schema name of `vcard:Kind`.
pub const KIND: &str = "Kind";

/// Returns the `vcard:Kind` schema.
#[must_use]
pub fn kind() -> RecordSchema {
    RecordSchema::new(
        KIND,
        "http://www.w3.org/2006/vcard/ns#Kind",
        vec![
            FieldDescriptor::literal("formatted_name", "http://www.w3.org/2006/vcard/ns#fn").mandatory(),
            FieldDescriptor::iri("email", "http://www.w3.org/2006/vcard/ns#hasEmail").multiple(),
            FieldDescriptor::iri("url", "http://www.w3.org/2006/vcard/ns#hasURL"),
        ],
    )
}
