//! JSON record documents.
//!
//! A document names its schema and supplies field values as JSON:
//!
//! ```json
//! {
//!   "schema": "FdpDataset",
//!   "subject": "https://example.org/ds/1",
//!   "fields": {
//!     "title": "Sequencing runs",
//!     "description": {"@value": "Raw reads", "@language": "en"},
//!     "theme": ["http://edamontology.org/topic_3168"],
//!     "publisher": {"schema": "Agent", "fields": {"name": "Acme"}}
//!   },
//!   "children": []
//! }
//! ```
//!
//! Strings become IRIs or literals according to the field's declared kind;
//! a string on a nested field references an entity by IRI. Literals on
//! typed fields take the field's datatype. Nothing is checked
//! here: [`RecordBuilder::build`](crate::RecordBuilder::build) validates.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::DocumentError;
use crate::graph::Literal;
use crate::model::{FieldDescriptor, ValueKind};
use crate::namespaces::SchemaRegistry;
use crate::record::{RecordBuilder, Value};

/// A record described as JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordDocument {
    /// Registry name of the record's schema.
    pub schema: String,
    /// Subject IRI of the record.
    #[serde(default)]
    pub subject: Option<String>,
    /// Label used in reports; defaults to the subject or schema name.
    #[serde(default)]
    pub label: Option<String>,
    /// Repository resource type; defaults to the schema's.
    #[serde(default)]
    pub resource_type: Option<String>,
    /// Field values.
    #[serde(default)]
    pub fields: BTreeMap<String, DocumentValue>,
    /// Records published after this one and anchored under its identity.
    #[serde(default)]
    pub children: Vec<RecordDocument>,
}

/// A JSON field value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DocumentValue {
    /// A bare string.
    Text(String),
    /// A list of values for a multi-valued field.
    List(Vec<DocumentValue>),
    /// An explicit literal.
    Literal {
        /// Lexical form.
        #[serde(rename = "@value")]
        value: String,
        /// Language tag.
        #[serde(rename = "@language", default)]
        language: Option<String>,
        /// Datatype IRI.
        #[serde(rename = "@type", default)]
        datatype: Option<String>,
    },
    /// A nested record.
    Record(Box<RecordDocument>),
}

impl RecordDocument {
    /// Parses a single document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Json`] if `text` is not a record document.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses either one document or an array of documents.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Json`] if `text` is neither.
    pub fn many_from_json_str(text: &str) -> Result<Vec<Self>, DocumentError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<RecordDocument>),
            One(Box<RecordDocument>),
        }
        Ok(match serde_json::from_str(text)? {
            OneOrMany::Many(docs) => docs,
            OneOrMany::One(doc) => vec![*doc],
        })
    }

    /// Label for reports.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.subject.as_deref())
            .unwrap_or(&self.schema)
    }

    /// Repository resource type the document is created under, falling back
    /// to the schema's own when the document names none.
    #[must_use]
    pub fn resource_type<'a>(&'a self, registry: &SchemaRegistry) -> Option<&'a str> {
        self.resource_type.as_deref().or_else(|| {
            registry
                .get(&self.schema)
                .and_then(|schema| schema.resource_type())
        })
    }

    /// Resolves the schema in `registry` and fills a builder with the
    /// document's values. Children are not included.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnknownSchema`] if this document, or a nested
    /// one, names a schema `registry` does not hold.
    pub fn to_builder<'s>(
        &self,
        registry: &'s SchemaRegistry,
    ) -> Result<RecordBuilder<'s>, DocumentError> {
        let schema = registry
            .get(&self.schema)
            .ok_or_else(|| DocumentError::UnknownSchema(self.schema.clone()))?;
        let mut builder = RecordBuilder::new(schema);
        if let Some(subject) = &self.subject {
            builder.set_subject(subject.clone());
        }
        for (name, value) in &self.fields {
            add_values(&mut builder, name, value, registry)?;
        }
        Ok(builder)
    }
}

fn add_values<'s>(
    builder: &mut RecordBuilder<'s>,
    name: &str,
    value: &DocumentValue,
    registry: &'s SchemaRegistry,
) -> Result<(), DocumentError> {
    let descriptor = builder.schema().field(name);
    let converted = match value {
        DocumentValue::List(items) => {
            for item in items {
                add_values(builder, name, item, registry)?;
            }
            return Ok(());
        }
        DocumentValue::Text(text) => match descriptor {
            Some(FieldDescriptor {
                kind: ValueKind::Iri | ValueKind::Nested(_),
                ..
            }) => Value::iri(text.clone()),
            Some(FieldDescriptor {
                datatype: Some(datatype),
                ..
            }) => Value::typed(text.clone(), *datatype),
            _ => Value::literal(text.clone()),
        },
        DocumentValue::Literal {
            value,
            language,
            datatype,
        } => Value::Literal(match (language, datatype) {
            (Some(language), _) => Literal::lang(value.clone(), language.clone()),
            (None, Some(datatype)) => Literal::typed(value.clone(), datatype.clone()),
            (None, None) => Literal::plain(value.clone()),
        }),
        DocumentValue::Record(doc) => doc.to_builder(registry)?.into(),
    };
    builder.add(name, converted);
    Ok(())
}
