//! Vocabulary schema tables and the registry that serves them.
//!
//! Each sub-module encodes the record schemas of one vocabulary as static
//! descriptor tables. [`SchemaRegistry::standard`] assembles them once per
//! process in dependency order: referenced schemas (`foaf`, `vcard`) before
//! the schemas that nest them (`dcat`), then the FDP overlays.

pub mod dcat;
pub mod fdp;
pub mod foaf;
pub mod vcard;

use std::collections::BTreeSet;

use crate::model::RecordSchema;

/// A set of record schemas queried by name.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<RecordSchema>,
}

impl SchemaRegistry {
    /// Builds a registry from explicit schemas. Later schemas with a name
    /// already present replace the earlier one.
    #[must_use]
    pub fn new(schemas: impl IntoIterator<Item = RecordSchema>) -> Self {
        let mut registry = Self {
            schemas: Vec::new(),
        };
        for schema in schemas {
            registry.register(schema);
        }
        registry
    }

    /// Returns the standard DCAT / FOAF / vCard / FDP registry.
    #[must_use]
    pub fn standard() -> &'static SchemaRegistry {
        static REGISTRY: std::sync::OnceLock<SchemaRegistry> = std::sync::OnceLock::new();
        REGISTRY.get_or_init(|| {
            SchemaRegistry::new([
                foaf::agent(),
                vcard::kind(),
                dcat::catalog(),
                dcat::dataset(),
                dcat::distribution(),
                dcat::data_service(),
                fdp::catalog(),
                fdp::dataset(),
                fdp::distribution(),
            ])
        })
    }

    /// Adds or replaces a schema.
    pub fn register(&mut self, schema: RecordSchema) {
        match self.schemas.iter_mut().find(|s| s.name() == schema.name()) {
            Some(slot) => *slot = schema,
            None => self.schemas.push(schema),
        }
    }

    /// Looks up a schema by name. Returns `None` if not registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RecordSchema> {
        self.schemas.iter().find(|s| s.name() == name)
    }

    /// All schemas in registration order.
    #[must_use]
    pub fn schemas(&self) -> &[RecordSchema] {
        &self.schemas
    }

    /// Mandatory field names of the named schema.
    #[must_use]
    pub fn mandatory_fields(&self, name: &str) -> Option<BTreeSet<&'static str>> {
        self.get(name).map(RecordSchema::mandatory_fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValueKind;

    #[test]
    fn schema_count() {
        assert_eq!(SchemaRegistry::standard().schemas().len(), 9);
    }

    #[test]
    fn all_field_names_unique() {
        for schema in SchemaRegistry::standard().schemas() {
            let mut names = std::collections::HashSet::new();
            for field in schema.fields() {
                assert!(
                    names.insert(field.name),
                    "Duplicate field '{}' in schema {}",
                    field.name,
                    schema.name()
                );
            }
        }
    }

    #[test]
    fn nested_fields_reference_registered_schemas() {
        let registry = SchemaRegistry::standard();
        for schema in registry.schemas() {
            for field in schema.fields() {
                if let ValueKind::Nested(target) = field.kind {
                    assert!(
                        registry.get(target).is_some(),
                        "{}.{} references unknown schema {}",
                        schema.name(),
                        field.name,
                        target
                    );
                }
            }
        }
    }

    #[test]
    fn language_only_on_literal_fields() {
        for schema in SchemaRegistry::standard().schemas() {
            for field in schema.fields() {
                if field.language.is_some() || field.datatype.is_some() {
                    assert_eq!(field.kind, ValueKind::Literal, "{}.{}", schema.name(), field.name);
                }
            }
        }
    }

    #[test]
    fn fdp_dataset_overlays_dcat_dataset() {
        let registry = SchemaRegistry::standard();
        let mandatory = registry.mandatory_fields(fdp::FDP_DATASET).unwrap_or_default();
        for name in ["title", "description", "publisher", "theme", "is_part_of"] {
            assert!(mandatory.contains(name), "missing {name}");
        }
        let base = registry.mandatory_fields(dcat::DATASET).unwrap_or_default();
        assert!(!base.contains("publisher"));
        assert_eq!(
            registry.get(fdp::FDP_DATASET).and_then(RecordSchema::resource_type),
            Some("dataset")
        );
    }

    #[test]
    fn register_replaces_by_name() {
        let mut registry = SchemaRegistry::new([foaf::agent()]);
        registry.register(foaf::agent().overlay(foaf::AGENT, "https://example.org/Org", &[]));
        assert_eq!(registry.schemas().len(), 1);
        assert_eq!(registry.get(foaf::AGENT).map(RecordSchema::class), Some("https://example.org/Org"));
    }
}
