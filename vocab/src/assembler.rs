//! Merges records and sub-entity descriptions into one submission graph.

use crate::error::GraphError;
use crate::graph::ExchangeGraph;
use crate::record::RecordInstance;

/// Accumulates the triples of a record and the entities it references, so
/// a single request carries a self-contained subgraph.
#[derive(Debug, Default)]
pub struct GraphAssembler {
    root: Option<String>,
    graph: ExchangeGraph,
}

impl GraphAssembler {
    /// An empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `record` at `subject` and merges it in. The first record
    /// added becomes the root of the assembled graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidSubject`] if `subject` is not an
    /// absolute IRI.
    pub fn add_record(
        &mut self,
        record: &RecordInstance<'_>,
        subject: &str,
    ) -> Result<&mut Self, GraphError> {
        let graph = record.to_graph(subject)?;
        if self.root.is_none() {
            self.root = Some(subject.to_owned());
        }
        self.graph.merge(graph);
        Ok(self)
    }

    /// Merges an already-built graph.
    pub fn merge(&mut self, graph: ExchangeGraph) -> &mut Self {
        self.graph.merge(graph);
        self
    }

    /// Subject of the first record added.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Returns the assembled graph.
    #[must_use]
    pub fn finish(self) -> ExchangeGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::{dcat, foaf, SchemaRegistry};
    use crate::record::{RecordBuilder, Value};

    #[test]
    fn merges_record_and_referenced_agent() {
        let registry = SchemaRegistry::standard();
        let dataset = registry.get(dcat::DATASET).unwrap();
        let agent = registry.get(foaf::AGENT).unwrap();

        let dataset = RecordBuilder::new(dataset)
            .with("title", Value::literal("Sequencing runs"))
            .with("description", Value::literal("Raw reads"))
            .build()
            .unwrap();
        let acme = RecordBuilder::new(agent)
            .with("name", Value::literal("Acme"))
            .build()
            .unwrap();

        let mut assembler = GraphAssembler::new();
        assembler
            .add_record(&dataset, "https://example.org/ds/1")
            .and_then(|a| a.add_record(&acme, "https://example.org/agents/acme"))
            .unwrap();
        assert_eq!(assembler.root(), Some("https://example.org/ds/1"));
        let graph = assembler.finish();
        assert_eq!(graph.subjects().len(), 2);
    }

    #[test]
    fn invalid_subject_leaves_assembler_empty() {
        let agent = SchemaRegistry::standard()
            .get(foaf::AGENT)
            .unwrap();
        let acme = RecordBuilder::new(agent)
            .with("name", Value::literal("Acme"))
            .build()
            .unwrap();
        let mut assembler = GraphAssembler::new();
        assert!(assembler.add_record(&acme, "acme").is_err());
        assert!(assembler.root().is_none());
        assert!(assembler.finish().is_empty());
    }
}
