//! Record values, validation and exchange-graph serialization.
//!
//! Callers populate a [`RecordBuilder`] with [`Value`]s and call
//! [`RecordBuilder::build`], which runs [`validate`] and yields a
//! [`RecordInstance`]. Only validated instances can be turned into an
//! [`ExchangeGraph`].

use std::collections::BTreeMap;

use crate::error::{GraphError, ValidationError};
use crate::graph::{check_subject, is_absolute_iri, is_language_tag, ExchangeGraph, Literal, Object};
use crate::model::iris::{DCTERMS_IS_PART_OF, RDF_TYPE};
use crate::model::{Cardinality, FieldDescriptor, RecordSchema, ValueKind};

/// One field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'s> {
    /// An IRI reference.
    Iri(String),
    /// A literal.
    Literal(Literal),
    /// A nested record.
    Record(Box<RecordBuilder<'s>>),
}

impl<'s> Value<'s> {
    /// An IRI value.
    #[must_use]
    pub fn iri(iri: impl Into<String>) -> Self {
        Value::Iri(iri.into())
    }

    /// A plain literal value.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Value::Literal(Literal::plain(text))
    }

    /// A language-tagged literal value.
    #[must_use]
    pub fn lang(text: impl Into<String>, language: impl Into<String>) -> Self {
        Value::Literal(Literal::lang(text, language))
    }

    /// A typed literal value.
    #[must_use]
    pub fn typed(text: impl Into<String>, datatype: impl Into<String>) -> Self {
        Value::Literal(Literal::typed(text, datatype))
    }

    fn kind_name(&self) -> String {
        match self {
            Value::Iri(_) => "IRI".to_owned(),
            Value::Literal(_) => "literal".to_owned(),
            Value::Record(record) => format!("{} record", record.schema().name()),
        }
    }
}

impl From<Literal> for Value<'_> {
    fn from(literal: Literal) -> Self {
        Value::Literal(literal)
    }
}

impl<'s> From<RecordBuilder<'s>> for Value<'s> {
    fn from(record: RecordBuilder<'s>) -> Self {
        Value::Record(Box::new(record))
    }
}

/// Field name → supplied values, not yet checked against a schema.
pub type FieldValues<'s> = BTreeMap<String, Vec<Value<'s>>>;

/// A record under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBuilder<'s> {
    schema: &'s RecordSchema,
    subject: Option<String>,
    values: FieldValues<'s>,
}

impl<'s> RecordBuilder<'s> {
    /// An empty record of `schema`.
    #[must_use]
    pub fn new(schema: &'s RecordSchema) -> Self {
        Self {
            schema,
            subject: None,
            values: BTreeMap::new(),
        }
    }

    /// The schema the record is checked against.
    #[must_use]
    pub fn schema(&self) -> &'s RecordSchema {
        self.schema
    }

    /// Sets the record's own subject IRI. Used when the record is nested;
    /// top-level records receive their subject in [`RecordInstance::to_graph`].
    pub fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    /// Replaces every value of `field` with `value`.
    pub fn set(&mut self, field: &str, value: impl Into<Value<'s>>) -> &mut Self {
        self.values.insert(field.to_owned(), vec![value.into()]);
        self
    }

    /// Appends `value` to `field`.
    pub fn add(&mut self, field: &str, value: impl Into<Value<'s>>) -> &mut Self {
        self.values
            .entry(field.to_owned())
            .or_default()
            .push(value.into());
        self
    }

    /// Appends a literal to `field`, tagged with the field's declared
    /// language or datatype when the schema declares one.
    pub fn text(&mut self, field: &str, text: impl Into<String>) -> &mut Self {
        let value = match self.schema.field(field) {
            Some(FieldDescriptor {
                datatype: Some(datatype),
                ..
            }) => Value::typed(text, *datatype),
            Some(FieldDescriptor {
                language: Some(language),
                ..
            }) => Value::lang(text, *language),
            _ => Value::literal(text),
        };
        self.add(field, value)
    }

    /// Removes every value of `field`.
    pub fn clear(&mut self, field: &str) -> &mut Self {
        self.values.remove(field);
        self
    }

    /// Anchors the record under its parent's repository identity via the
    /// `dcterms:isPartOf` field, if the schema declares one.
    pub fn part_of(&mut self, parent: impl Into<String>) -> &mut Self {
        let parent = parent.into();
        if let Some(field) = self
            .schema
            .fields()
            .iter()
            .find(|f| f.relation == DCTERMS_IS_PART_OF)
        {
            self.values
                .insert(field.name.to_owned(), vec![Value::Iri(parent)]);
        }
        self
    }

    /// Chaining form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<Value<'s>>) -> Self {
        self.set(field, value);
        self
    }

    /// Chaining form of [`add`](Self::add).
    #[must_use]
    pub fn with_added(mut self, field: &str, value: impl Into<Value<'s>>) -> Self {
        self.add(field, value);
        self
    }

    /// Chaining form of [`set_subject`](Self::set_subject).
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.set_subject(subject);
        self
    }

    /// Values supplied so far.
    #[must_use]
    pub fn values(&self) -> &FieldValues<'s> {
        &self.values
    }

    /// Validates the record and freezes it.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] produced by [`validate`].
    pub fn build(self) -> Result<RecordInstance<'s>, ValidationError> {
        validate(self.schema, &self.values)?;
        Ok(RecordInstance { record: self })
    }
}

/// Checks `values` against `schema`.
///
/// Structural problems (undeclared field, wrong value kind, malformed IRI or
/// language tag, too many values on a single field) fail on the first one
/// found, in schema field order. Absent mandatory fields are collected across
/// the record and its nested records in every case: they are reported alone
/// as [`ValidationError::MissingFields`], or in the `missing` list of the
/// structural error.
///
/// # Errors
///
/// Returns the first structural [`ValidationError`], or
/// [`ValidationError::MissingFields`] naming every absent mandatory field.
pub fn validate(schema: &RecordSchema, values: &FieldValues<'_>) -> Result<(), ValidationError> {
    let mut missing = Vec::new();
    collect_missing(schema, values, "", &mut missing);
    match check_structure(schema, values, "") {
        Err(err) => Err(err.with_missing(missing)),
        Ok(()) if missing.is_empty() => Ok(()),
        Ok(()) => Err(ValidationError::MissingFields {
            schema: schema.name(),
            fields: missing,
        }),
    }
}

fn path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_structure(
    schema: &RecordSchema,
    values: &FieldValues<'_>,
    prefix: &str,
) -> Result<(), ValidationError> {
    if let Some(unknown) = values.keys().find(|name| schema.field(name).is_none()) {
        return Err(ValidationError::UnknownField {
            schema: schema.name(),
            field: path(prefix, unknown),
            missing: Vec::new(),
        });
    }

    for descriptor in schema.fields() {
        let Some(supplied) = values.get(descriptor.name) else {
            continue;
        };
        let field = path(prefix, descriptor.name);
        if descriptor.cardinality == Cardinality::Single && supplied.len() > 1 {
            return Err(ValidationError::Cardinality {
                field,
                count: supplied.len(),
                missing: Vec::new(),
            });
        }
        for value in supplied {
            check_value(descriptor, value, &field)?;
        }
    }
    Ok(())
}

fn check_value(
    descriptor: &FieldDescriptor,
    value: &Value<'_>,
    field: &str,
) -> Result<(), ValidationError> {
    let mismatch = |expected: String| ValidationError::TypeMismatch {
        field: field.to_owned(),
        expected,
        found: value.kind_name(),
        missing: Vec::new(),
    };

    match (descriptor.kind, value) {
        // A nested field may also reference an entity described elsewhere.
        (ValueKind::Iri | ValueKind::Nested(_), Value::Iri(iri)) => {
            if is_absolute_iri(iri) {
                Ok(())
            } else {
                Err(ValidationError::InvalidIri {
                    field: field.to_owned(),
                    value: iri.clone(),
                    missing: Vec::new(),
                })
            }
        }
        (ValueKind::Literal, Value::Literal(literal)) => {
            if let Some(tag) = literal.language().filter(|tag| !is_language_tag(tag)) {
                return Err(ValidationError::InvalidLanguage {
                    field: field.to_owned(),
                    tag: tag.to_owned(),
                    missing: Vec::new(),
                });
            }
            check_datatype(descriptor, literal, field)
        }
        (ValueKind::Nested(expected), Value::Record(record)) => {
            if record.schema().name() != expected {
                return Err(mismatch(format!("{expected} record or IRI")));
            }
            if let Some(subject) = &record.subject {
                if !is_absolute_iri(subject) {
                    return Err(ValidationError::InvalidIri {
                        field: field.to_owned(),
                        value: subject.clone(),
                        missing: Vec::new(),
                    });
                }
            }
            check_structure(record.schema(), &record.values, field)
        }
        (ValueKind::Nested(expected), _) => Err(mismatch(format!("{expected} record or IRI"))),
        (kind, _) => Err(mismatch(kind.as_str().to_owned())),
    }
}

fn check_datatype(
    descriptor: &FieldDescriptor,
    literal: &Literal,
    field: &str,
) -> Result<(), ValidationError> {
    match descriptor.datatype {
        Some(datatype) if literal.datatype() != Some(datatype) => {
            Err(ValidationError::TypeMismatch {
                field: field.to_owned(),
                expected: format!("literal of type <{datatype}>"),
                found: literal
                    .datatype()
                    .map_or_else(|| "untyped literal".to_owned(), |dt| format!("literal of type <{dt}>")),
                missing: Vec::new(),
            })
        }
        _ => Ok(()),
    }
}

fn collect_missing(
    schema: &RecordSchema,
    values: &FieldValues<'_>,
    prefix: &str,
    missing: &mut Vec<String>,
) {
    for descriptor in schema.fields() {
        let supplied = values.get(descriptor.name).map(Vec::as_slice).unwrap_or_default();
        if descriptor.mandatory && supplied.is_empty() {
            missing.push(path(prefix, descriptor.name));
        }
        for value in supplied {
            if let Value::Record(record) = value {
                collect_missing(
                    record.schema(),
                    &record.values,
                    &path(prefix, descriptor.name),
                    missing,
                );
            }
        }
    }
}

/// A record whose values satisfy its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInstance<'s> {
    record: RecordBuilder<'s>,
}

impl<'s> RecordInstance<'s> {
    /// The record's schema.
    #[must_use]
    pub fn schema(&self) -> &'s RecordSchema {
        self.record.schema
    }

    /// The subject set on the record, if any.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.record.subject.as_deref()
    }

    /// Validated values.
    #[must_use]
    pub fn values(&self) -> &FieldValues<'s> {
        &self.record.values
    }

    /// Returns the record to the builder for further edits.
    #[must_use]
    pub fn into_builder(self) -> RecordBuilder<'s> {
        self.record
    }

    /// Serializes the record, and every nested record, into one graph
    /// rooted at `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidSubject`] if `subject` is not an
    /// absolute IRI.
    pub fn to_graph(&self, subject: &str) -> Result<ExchangeGraph, GraphError> {
        check_subject(subject)?;
        let mut graph = ExchangeGraph::new();
        write_record(&self.record, subject, &mut graph);
        Ok(graph)
    }

    /// Serializes the record at the subject it carries.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidSubject`] if no subject was set or it is
    /// not an absolute IRI.
    pub fn to_graph_at_own_subject(&self) -> Result<ExchangeGraph, GraphError> {
        let subject = self
            .subject()
            .ok_or_else(|| GraphError::InvalidSubject(String::new()))?;
        self.to_graph(subject)
    }
}

/// Subject of a nested record that carries none: `{parent}#{field}`, with
/// `-{n}` for the n-th value of a multi-valued field, or `{parent}-{field}`
/// when the parent already has a fragment.
#[must_use]
pub fn derived_subject(parent: &str, field: &str, position: Option<usize>) -> String {
    let separator = if parent.contains('#') { '-' } else { '#' };
    match position {
        Some(n) => format!("{parent}{separator}{field}-{n}"),
        None => format!("{parent}{separator}{field}"),
    }
}

fn write_record(record: &RecordBuilder<'_>, subject: &str, graph: &mut ExchangeGraph) {
    graph.insert(subject, RDF_TYPE, Object::Iri(record.schema.class().to_owned()));

    for descriptor in record.schema.fields() {
        let Some(values) = record.values.get(descriptor.name) else {
            continue;
        };
        for (index, value) in values.iter().enumerate() {
            let object = match value {
                Value::Iri(iri) => Object::Iri(iri.clone()),
                Value::Literal(literal) => Object::Literal(literal.clone()),
                Value::Record(nested) => {
                    let nested_subject = nested.subject.clone().unwrap_or_else(|| {
                        let position = descriptor.is_multiple().then_some(index + 1);
                        derived_subject(subject, descriptor.name, position)
                    });
                    write_record(nested, &nested_subject, graph);
                    Object::Iri(nested_subject)
                }
            };
            graph.insert(subject, descriptor.relation, object);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::{dcat, foaf, SchemaRegistry};

    fn schema(name: &str) -> &'static RecordSchema {
        SchemaRegistry::standard().get(name).unwrap()
    }

    #[test]
    fn missing_fields_reported_together() {
        let err = RecordBuilder::new(schema(dcat::DATASET))
            .with("keyword", Value::literal("genomics"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields {
                schema: "Dataset",
                fields: vec!["title".into(), "description".into()],
            }
        );
    }

    #[test]
    fn nested_missing_fields_use_dotted_paths() {
        let publisher = RecordBuilder::new(schema(foaf::AGENT)).with("identifier", Value::literal("acme-1"));
        let err = RecordBuilder::new(schema(dcat::DATASET))
            .with("title", Value::literal("t"))
            .with("publisher", publisher)
            .build()
            .unwrap_err();
        assert_eq!(err.fields(), vec!["description", "publisher.name"]);
    }

    #[test]
    fn literal_where_iri_expected_is_type_mismatch() {
        let err = RecordBuilder::new(schema(dcat::DATASET))
            .with("landing_page", Value::literal("https://example.org"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { ref field, .. } if field == "landing_page"));
    }

    #[test]
    fn structural_errors_still_list_missing_fields() {
        let err = RecordBuilder::new(schema(dcat::DATASET))
            .with("publisher", Value::literal("Acme"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { ref field, .. } if field == "publisher"));
        assert_eq!(err.missing_fields(), ["title", "description"]);
        assert_eq!(err.fields(), vec!["publisher", "title", "description"]);
        assert!(err.to_string().ends_with("also missing mandatory fields: title, description"));
    }

    #[test]
    fn nested_structural_error_lists_nested_missing_fields() {
        let publisher = RecordBuilder::new(schema(foaf::AGENT)).with("homepage", Value::iri("acme"));
        let err = RecordBuilder::new(schema(dcat::DATASET))
            .with("title", Value::literal("t"))
            .with("publisher", publisher)
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidIri { ref field, .. } if field == "publisher.homepage"));
        assert_eq!(err.missing_fields(), ["description", "publisher.name"]);
    }

    #[test]
    fn malformed_language_tag_rejected() {
        for tag in ["en us", "", "en-", "1en"] {
            let err = RecordBuilder::new(schema(foaf::AGENT))
                .with("name", Value::lang("Acme", tag))
                .build()
                .unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidLanguage { ref field, .. } if field == "name"),
                "{tag:?} accepted"
            );
        }

        let record = RecordBuilder::new(schema(foaf::AGENT))
            .with("name", Value::lang("Acme", "en-GB"))
            .build()
            .unwrap();
        let graph = record.to_graph("https://example.org/acme").unwrap();
        let names: Vec<_> = graph
            .objects("https://example.org/acme", "http://xmlns.com/foaf/0.1/name")
            .collect();
        assert_eq!(names, vec![&Object::Literal(Literal::lang("Acme", "en-gb"))]);
    }

    #[test]
    fn relative_iri_rejected() {
        let err = RecordBuilder::new(schema(dcat::DATASET))
            .with("title", Value::literal("t"))
            .with("description", Value::literal("d"))
            .with("landing_page", Value::iri("landing"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidIri {
                field: "landing_page".into(),
                value: "landing".into(),
                missing: vec![],
            }
        );
    }

    #[test]
    fn single_field_rejects_multiple_values() {
        let err = RecordBuilder::new(schema(dcat::DATASET))
            .with_added("version", Value::literal("1"))
            .with_added("version", Value::literal("2"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Cardinality {
                field: "version".into(),
                count: 2,
                missing: vec!["title".into(), "description".into()],
            }
        );
    }

    #[test]
    fn unknown_field_rejected() {
        let err = RecordBuilder::new(schema(foaf::AGENT))
            .with("nickname", Value::literal("A"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownField { schema: "Agent", .. }));
    }

    #[test]
    fn typed_field_requires_its_datatype() {
        let err = RecordBuilder::new(schema(dcat::DATASET))
            .with("title", Value::literal("t"))
            .with("description", Value::literal("d"))
            .with("issued", Value::literal("2024-01-01T00:00:00Z"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { ref field, .. } if field == "issued"));

        let mut builder = RecordBuilder::new(schema(dcat::DATASET));
        builder
            .text("title", "t")
            .text("description", "d")
            .text("issued", "2024-01-01T00:00:00Z");
        assert!(builder.build().is_ok());
    }

    #[test]
    fn language_less_literal_stays_plain() {
        let record = RecordBuilder::new(schema(foaf::AGENT))
            .with("name", Value::literal("Acme"))
            .build()
            .unwrap();
        let graph = record.to_graph("https://example.org/acme").unwrap();
        let names: Vec<_> = graph
            .objects("https://example.org/acme", "http://xmlns.com/foaf/0.1/name")
            .collect();
        assert_eq!(names, vec![&Object::Literal(Literal::plain("Acme"))]);
    }

    #[test]
    fn multiple_values_each_make_a_triple() {
        let record = RecordBuilder::new(schema(dcat::DATASET))
            .with("title", Value::literal("t"))
            .with("description", Value::literal("d"))
            .with_added("keyword", Value::literal("a"))
            .with_added("keyword", Value::literal("b"))
            .build()
            .unwrap();
        let graph = record.to_graph("https://example.org/ds").unwrap();
        assert_eq!(
            graph.objects("https://example.org/ds", "http://www.w3.org/ns/dcat#keyword").count(),
            2
        );
    }

    #[test]
    fn nested_subject_is_derived_when_absent() {
        let contact = |name: &str| {
            RecordBuilder::new(schema("Kind")).with("formatted_name", Value::literal(name))
        };
        let record = RecordBuilder::new(schema(dcat::CATALOG))
            .with("title", Value::literal("t"))
            .with("description", Value::literal("d"))
            .with_added("contact_point", contact("Desk"))
            .with_added("contact_point", contact("Lab"))
            .build()
            .unwrap();
        let graph = record.to_graph("https://example.org/cat").unwrap();
        let subjects = graph.subjects();
        assert!(subjects.contains("https://example.org/cat#contact_point-1"));
        assert!(subjects.contains("https://example.org/cat#contact_point-2"));
    }

    #[test]
    fn derived_subject_respects_existing_fragment() {
        assert_eq!(
            derived_subject("https://e.org/a#x", "publisher", None),
            "https://e.org/a#x-publisher"
        );
        assert_eq!(derived_subject("https://e.org/a", "publisher", None), "https://e.org/a#publisher");
    }

    #[test]
    fn part_of_sets_parent_anchor() {
        let mut builder = RecordBuilder::new(schema("FdpDistribution"));
        builder.part_of("https://fdp.example.org/dataset/1");
        assert_eq!(
            builder.values().get("is_part_of"),
            Some(&vec![Value::iri("https://fdp.example.org/dataset/1")])
        );

        let mut plain = RecordBuilder::new(schema(foaf::AGENT));
        plain.part_of("https://fdp.example.org/dataset/1");
        assert!(plain.values().is_empty());
    }

    #[test]
    fn invalid_subject_rejected() {
        let record = RecordBuilder::new(schema(foaf::AGENT))
            .with("name", Value::literal("Acme"))
            .build()
            .unwrap();
        assert_eq!(
            record.to_graph("acme"),
            Err(GraphError::InvalidSubject("acme".into()))
        );
        assert!(record.to_graph_at_own_subject().is_err());
    }
}
