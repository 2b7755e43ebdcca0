//! Record validation and sub-entity serialization scenarios.

use fdp_vocab::model::iris::{DCTERMS, FOAF, RDF_TYPE};
use fdp_vocab::namespaces::{dcat, fdp, foaf};
use fdp_vocab::{
    GraphAssembler, Literal, Object, RecordBuilder, SchemaRegistry, ValidationError, Value,
};

#[test]
fn catalog_without_description_names_description() {
    let catalog = SchemaRegistry::standard().get(dcat::CATALOG).unwrap();
    assert!(catalog.mandatory_fields().contains("title"));
    assert!(catalog.mandatory_fields().contains("description"));

    let err = RecordBuilder::new(catalog)
        .with("title", Value::literal("Test catalog"))
        .build()
        .unwrap_err();
    match err {
        ValidationError::MissingFields { schema, fields } => {
            assert_eq!(schema, dcat::CATALOG);
            assert_eq!(fields, vec!["description".to_owned()]);
        }
        other => panic!("expected missing fields, got {other:?}"),
    }
}

#[test]
fn every_missing_field_is_reported() {
    let registry = SchemaRegistry::standard();
    let dataset = registry.get(fdp::FDP_DATASET).unwrap();
    let agent = registry.get(foaf::AGENT).unwrap();

    let err = RecordBuilder::new(dataset)
        .with("title", Value::literal("Sequencing runs"))
        .with("publisher", RecordBuilder::new(agent).with("identifier", Value::literal("acme-1")))
        .build()
        .unwrap_err();
    let mut fields = err.fields();
    fields.sort_unstable();
    assert_eq!(
        fields,
        ["description", "is_part_of", "publisher.name", "theme"]
    );
}

#[test]
fn structural_errors_also_name_missing_fields() {
    let catalog = SchemaRegistry::standard().get(dcat::CATALOG).unwrap();
    let err = RecordBuilder::new(catalog)
        .with("homepage", Value::iri("not an iri"))
        .build()
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidIri { ref field, .. } if field == "homepage"));
    assert_eq!(err.missing_fields(), ["title", "description"]);

    let err = RecordBuilder::new(catalog)
        .with("homepage", Value::literal("https://example.org"))
        .build()
        .unwrap_err();
    match err {
        ValidationError::TypeMismatch { field, missing, .. } => {
            assert_eq!(field, "homepage");
            assert_eq!(missing, ["title", "description"]);
        }
        other => panic!("expected a type mismatch, got {other:?}"),
    }
}

#[test]
fn malformed_language_tag_never_reaches_the_graph() {
    let agent = SchemaRegistry::standard().get(foaf::AGENT).unwrap();
    let err = RecordBuilder::new(agent)
        .with("name", Value::lang("Acme", "en us"))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidLanguage {
            field: "name".into(),
            tag: "en us".into(),
            missing: vec![],
        }
    );
}

#[test]
fn dataset_with_publisher_serializes_two_subjects() {
    let registry = SchemaRegistry::standard();
    let dataset = registry.get(dcat::DATASET).unwrap();
    let agent = registry.get(foaf::AGENT).unwrap();
    let dataset_iri = "https://example.org/fdp/dataset/1";
    let acme_iri = "https://example.org/agents/acme-1";

    let acme = RecordBuilder::new(agent)
        .with("name", Value::literal("Acme"))
        .with("identifier", Value::literal("acme-1"))
        .build()
        .unwrap();
    let record = RecordBuilder::new(dataset)
        .with("title", Value::literal("Sequencing runs"))
        .with("description", Value::literal("Raw reads"))
        .with(
            "publisher",
            acme.clone().into_builder().with_subject(acme_iri),
        )
        .build()
        .unwrap();

    let graph = record.to_graph(dataset_iri).unwrap();
    let subjects: Vec<_> = graph.subjects().into_iter().collect();
    assert_eq!(subjects, [acme_iri, dataset_iri]);

    let publisher = format!("{DCTERMS}publisher");
    assert!(graph.contains(dataset_iri, &publisher, &Object::Iri(acme_iri.into())));
    assert!(graph.contains(
        acme_iri,
        &format!("{FOAF}name"),
        &Literal::plain("Acme").into()
    ));
    assert!(graph.contains(
        acme_iri,
        &format!("{DCTERMS}identifier"),
        &Literal::plain("acme-1").into()
    ));
    assert!(graph.contains(
        acme_iri,
        RDF_TYPE,
        &Object::Iri("http://xmlns.com/foaf/0.1/Agent".into())
    ));

    // The same graph assembled from separately serialized records, the
    // dataset referencing its publisher by IRI.
    let referencing = record
        .into_builder()
        .with("publisher", Value::iri(acme_iri))
        .build()
        .unwrap();
    let mut assembler = GraphAssembler::new();
    assembler
        .add_record(&referencing, dataset_iri)
        .unwrap()
        .add_record(&acme, acme_iri)
        .unwrap();
    assert_eq!(assembler.root(), Some(dataset_iri));
    let assembled = assembler.finish();
    assert_eq!(assembled.describe(acme_iri).count(), 3);
    assert_eq!(assembled, graph);

    let literal = referencing.into_builder().with("publisher", Value::literal("Acme")).build();
    assert!(matches!(literal, Err(ValidationError::TypeMismatch { .. })));
}
