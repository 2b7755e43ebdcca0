//! Error types for validation, graph construction and record documents.

use thiserror::Error;

/// A record does not satisfy its schema.
///
/// Raised before any network interaction; always fixable by the caller.
/// Structural variants also carry `missing`, the mandatory fields that were
/// absent as well, so one failure names everything left to fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more mandatory fields have no value. Lists every absent field,
    /// nested ones as dotted paths (`publisher.name`).
    #[error("{schema} record is missing mandatory fields: {}", .fields.join(", "))]
    MissingFields {
        /// Schema of the top-level record.
        schema: &'static str,
        /// Every absent mandatory field.
        fields: Vec<String>,
    },

    /// A value of the wrong kind was supplied.
    #[error("field '{field}' expects {expected}, found {found}{}", also_missing(.missing))]
    TypeMismatch {
        /// Offending field path.
        field: String,
        /// What the schema declares.
        expected: String,
        /// What the caller supplied.
        found: String,
        /// Absent mandatory fields.
        missing: Vec<String>,
    },

    /// An IRI value is not an absolute IRI.
    #[error("field '{field}' holds an invalid absolute IRI: {value}{}", also_missing(.missing))]
    InvalidIri {
        /// Offending field path.
        field: String,
        /// The rejected value.
        value: String,
        /// Absent mandatory fields.
        missing: Vec<String>,
    },

    /// A literal carries a malformed language tag.
    #[error("field '{field}' holds an invalid language tag {tag:?}{}", also_missing(.missing))]
    InvalidLanguage {
        /// Offending field path.
        field: String,
        /// The rejected tag.
        tag: String,
        /// Absent mandatory fields.
        missing: Vec<String>,
    },

    /// A single-valued field received several values.
    #[error("field '{field}' accepts a single value, found {count}{}", also_missing(.missing))]
    Cardinality {
        /// Offending field path.
        field: String,
        /// Number of values supplied.
        count: usize,
        /// Absent mandatory fields.
        missing: Vec<String>,
    },

    /// A field the schema does not declare.
    #[error("schema {schema} has no field '{field}'{}", also_missing(.missing))]
    UnknownField {
        /// Schema of the record holding the field.
        schema: &'static str,
        /// Offending field path.
        field: String,
        /// Absent mandatory fields.
        missing: Vec<String>,
    },
}

fn also_missing(missing: &[String]) -> String {
    if missing.is_empty() {
        String::new()
    } else {
        format!("; also missing mandatory fields: {}", missing.join(", "))
    }
}

impl ValidationError {
    /// The offending field paths, followed by any absent mandatory fields.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::MissingFields { fields, .. } => {
                fields.iter().map(String::as_str).collect()
            }
            ValidationError::TypeMismatch { field, missing, .. }
            | ValidationError::InvalidIri { field, missing, .. }
            | ValidationError::InvalidLanguage { field, missing, .. }
            | ValidationError::Cardinality { field, missing, .. }
            | ValidationError::UnknownField { field, missing, .. } => {
                std::iter::once(field.as_str())
                    .chain(missing.iter().map(String::as_str))
                    .collect()
            }
        }
    }

    /// Absent mandatory fields, whichever variant this is.
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        match self {
            ValidationError::MissingFields { fields, .. } => fields,
            ValidationError::TypeMismatch { missing, .. }
            | ValidationError::InvalidIri { missing, .. }
            | ValidationError::InvalidLanguage { missing, .. }
            | ValidationError::Cardinality { missing, .. }
            | ValidationError::UnknownField { missing, .. } => missing,
        }
    }

    pub(crate) fn with_missing(mut self, fields: Vec<String>) -> Self {
        match &mut self {
            ValidationError::MissingFields { .. } => {}
            ValidationError::TypeMismatch { missing, .. }
            | ValidationError::InvalidIri { missing, .. }
            | ValidationError::InvalidLanguage { missing, .. }
            | ValidationError::Cardinality { missing, .. }
            | ValidationError::UnknownField { missing, .. } => *missing = fields,
        }
        self
    }
}

/// Failure building or reading an exchange graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The subject supplied for a record is not an absolute IRI.
    #[error("invalid subject IRI: {0}")]
    InvalidSubject(String),

    /// The text could not be parsed.
    #[error("failed to parse exchange graph: {0}")]
    Parse(String),

    /// The text uses a construct exchange graphs do not carry.
    #[error("unsupported term in exchange graph: {0}")]
    Unsupported(String),
}

/// Failure turning a record document into a record.
#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document names a schema the registry does not know.
    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    /// The document is not valid JSON or does not have the document shape.
    #[error("malformed record document: {0}")]
    Json(#[from] serde_json::Error),
}
