//! Core schema model types.
//!
//! A [`RecordSchema`] is an ordered list of [`FieldDescriptor`]s attached to
//! an RDF class. Descriptors are `Copy` static data; the standard tables live
//! in [`crate::namespaces`] and are assembled by
//! [`SchemaRegistry::standard()`](crate::SchemaRegistry::standard).

use std::collections::BTreeSet;

/// The kind of value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// An absolute IRI reference, serialized as `<iri>`.
    Iri,
    /// A literal, optionally language-tagged or typed.
    Literal,
    /// A nested record of the named schema. The nested record's subject is
    /// the object of the linking triple. An absolute IRI is also accepted,
    /// referencing an entity described in another graph.
    Nested(&'static str),
}

impl ValueKind {
    /// Returns a short human-readable name used in error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Iri => "IRI",
            ValueKind::Literal => "literal",
            ValueKind::Nested(_) => "nested record",
        }
    }
}

/// How many values a field may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one value.
    Single,
    /// Any number of values; each contributes one triple.
    Multiple,
}

/// Declares how one record field maps onto an exchange-graph relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name used by callers (e.g., `"contact_point"`).
    pub name: &'static str,
    /// Full IRI of the relation (e.g., `"http://purl.org/dc/terms/title"`).
    pub relation: &'static str,
    /// Accepted value kind.
    pub kind: ValueKind,
    /// Expected language tag of literal values. Only meaningful for
    /// [`ValueKind::Literal`]; never applied implicitly on serialization.
    pub language: Option<&'static str>,
    /// Full IRI of the literal datatype, if the field is typed.
    pub datatype: Option<&'static str>,
    /// Single or multiple values.
    pub cardinality: Cardinality,
    /// Whether validation requires at least one value.
    pub mandatory: bool,
}

impl FieldDescriptor {
    /// An optional, single-valued field of the given kind.
    #[must_use]
    pub const fn new(name: &'static str, relation: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            relation,
            kind,
            language: None,
            datatype: None,
            cardinality: Cardinality::Single,
            mandatory: false,
        }
    }

    /// An optional, single-valued literal field.
    #[must_use]
    pub const fn literal(name: &'static str, relation: &'static str) -> Self {
        Self::new(name, relation, ValueKind::Literal)
    }

    /// An optional, single-valued IRI field.
    #[must_use]
    pub const fn iri(name: &'static str, relation: &'static str) -> Self {
        Self::new(name, relation, ValueKind::Iri)
    }

    /// An optional, single-valued nested-record field of schema `schema`.
    #[must_use]
    pub const fn nested(name: &'static str, relation: &'static str, schema: &'static str) -> Self {
        Self::new(name, relation, ValueKind::Nested(schema))
    }

    /// Marks the field as mandatory.
    #[must_use]
    pub const fn mandatory(self) -> Self {
        Self {
            mandatory: true,
            ..self
        }
    }

    /// Marks the field as optional.
    #[must_use]
    pub const fn optional(self) -> Self {
        Self {
            mandatory: false,
            ..self
        }
    }

    /// Allows multiple values.
    #[must_use]
    pub const fn multiple(self) -> Self {
        Self {
            cardinality: Cardinality::Multiple,
            ..self
        }
    }

    /// Declares the expected language tag of the field's literals.
    #[must_use]
    pub const fn language(self, tag: &'static str) -> Self {
        Self {
            language: Some(tag),
            ..self
        }
    }

    /// Declares the literal datatype of the field.
    #[must_use]
    pub const fn datatype(self, iri: &'static str) -> Self {
        Self {
            datatype: Some(iri),
            ..self
        }
    }

    /// Returns true if the field accepts more than one value.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.cardinality == Cardinality::Multiple
    }
}

/// A named, ordered set of field descriptors attached to an RDF class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    name: &'static str,
    class: &'static str,
    resource_type: Option<&'static str>,
    fields: Vec<FieldDescriptor>,
}

impl RecordSchema {
    /// Creates a schema from its descriptor table.
    ///
    /// Field names are expected to be unique; the standard tables are checked
    /// by the registry tests.
    #[must_use]
    pub fn new(name: &'static str, class: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name,
            class,
            resource_type: None,
            fields,
        }
    }

    /// Sets the repository collection (e.g., `"dataset"`) records of this
    /// schema are created in.
    #[must_use]
    pub fn with_resource_type(mut self, resource_type: &'static str) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    /// Resolves `overlay` on top of this schema into a new effective schema.
    ///
    /// Overlay descriptors whose name matches a base field replace it in
    /// place; the rest are appended in overlay order. The result takes the
    /// overlay's `name` and `class` and keeps the base resource type.
    #[must_use]
    pub fn overlay(
        &self,
        name: &'static str,
        class: &'static str,
        overlay: &[FieldDescriptor],
    ) -> RecordSchema {
        let mut fields = self.fields.clone();
        for descriptor in overlay {
            match fields.iter_mut().find(|f| f.name == descriptor.name) {
                Some(slot) => *slot = *descriptor,
                None => fields.push(*descriptor),
            }
        }
        RecordSchema {
            name,
            class,
            resource_type: self.resource_type,
            fields,
        }
    }

    /// Schema name used for registry lookup (e.g., `"Dataset"`).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full IRI of the RDF class every record of this schema is typed with.
    #[must_use]
    pub fn class(&self) -> &'static str {
        self.class
    }

    /// Repository collection name, if the schema is publishable.
    #[must_use]
    pub fn resource_type(&self) -> Option<&'static str> {
        self.resource_type
    }

    /// All descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a descriptor by field name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of every mandatory field.
    #[must_use]
    pub fn mandatory_fields(&self) -> BTreeSet<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.mandatory)
            .map(|f| f.name)
            .collect()
    }
}

/// Standard IRI constants used across the vocabulary tables.
pub mod iris {
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// Dublin Core terms namespace.
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    /// DCAT namespace.
    pub const DCAT: &str = "http://www.w3.org/ns/dcat#";
    /// FOAF namespace.
    pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
    /// vCard namespace.
    pub const VCARD: &str = "http://www.w3.org/2006/vcard/ns#";
    /// FAIR Data Point ontology namespace.
    pub const FDP_O: &str = "https://w3id.org/fdp/fdp-o#";

    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:langString`.
    pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    /// `dcterms:isPartOf`.
    pub const DCTERMS_IS_PART_OF: &str = "http://purl.org/dc/terms/isPartOf";

    // XSD datatypes
    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:dateTime`.
    pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    /// `xsd:date`.
    pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    /// `xsd:decimal`.
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:nonNegativeInteger`.
    pub const XSD_NON_NEGATIVE_INTEGER: &str =
        "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
}
