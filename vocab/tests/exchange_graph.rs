//! Exchange-graph text output: determinism and parse-back equivalence.

use fdp_vocab::model::iris::XSD_DATETIME;
use fdp_vocab::reader;
use fdp_vocab::{GraphFormat, RecordBuilder, RecordInstance, SchemaRegistry, Value};

const SUBJECT: &str = "https://example.org/fdp/dataset/7f3c";

fn dataset() -> RecordInstance<'static> {
    let registry = SchemaRegistry::standard();
    let dataset = registry.get("Dataset").unwrap();
    let agent = registry.get("Agent").unwrap();
    let kind = registry.get("Kind").unwrap();

    RecordBuilder::new(dataset)
        .with("title", Value::lang("Sequencing runs", "en"))
        .with_added("title", Value::lang("Sequencing-Läufe", "de"))
        .with("description", Value::literal("Raw reads.\nLine two with a \"quote\" and a \\ backslash"))
        .with_added("keyword", Value::literal("genomics"))
        .with_added("keyword", Value::literal("reads"))
        .with("issued", Value::typed("2024-03-01T09:00:00Z", XSD_DATETIME))
        .with("landing_page", Value::iri("https://example.org/landing/7f3c"))
        .with(
            "publisher",
            RecordBuilder::new(agent)
                .with_subject("https://example.org/agents/acme-1")
                .with("name", Value::literal("Acme"))
                .with("identifier", Value::literal("acme-1")),
        )
        .with_added(
            "contact_point",
            RecordBuilder::new(kind)
                .with("formatted_name", Value::literal("Data steward"))
                .with("email", Value::iri("mailto:steward@example.org")),
        )
        .build()
        .unwrap()
}

#[test]
fn turtle_output_is_byte_identical_across_runs() {
    let first = GraphFormat::Turtle.render(&dataset().to_graph(SUBJECT).unwrap());
    let second = GraphFormat::Turtle.render(&dataset().to_graph(SUBJECT).unwrap());
    assert_eq!(first, second);
}

#[test]
fn ntriples_output_is_byte_identical_across_runs() {
    let record = dataset();
    let first = GraphFormat::NTriples.render(&record.to_graph(SUBJECT).unwrap());
    let second = GraphFormat::NTriples.render(&record.to_graph(SUBJECT).unwrap());
    assert_eq!(first, second);
}

#[test]
fn turtle_parses_back_to_the_same_triples() {
    let graph = dataset().to_graph(SUBJECT).unwrap();
    let text = GraphFormat::Turtle.render(&graph);
    let parsed = reader::parse(&text, GraphFormat::Turtle).unwrap();
    assert_eq!(parsed, graph, "turtle:\n{text}");
}

#[test]
fn ntriples_parses_back_to_the_same_triples() {
    let graph = dataset().to_graph(SUBJECT).unwrap();
    let text = GraphFormat::NTriples.render(&graph);
    let parsed = reader::parse(&text, GraphFormat::NTriples).unwrap();
    assert_eq!(parsed, graph, "n-triples:\n{text}");
}

#[test]
fn nested_record_without_subject_gets_derived_subject() {
    let graph = dataset().to_graph(SUBJECT).unwrap();
    let derived = format!("{SUBJECT}#contact_point-1");
    assert!(graph.subjects().contains(derived.as_str()));
    assert!(graph.subjects().contains("https://example.org/agents/acme-1"));
    assert_eq!(graph.subjects().len(), 3);
}
