//! Bulk publishing: each record runs its own create → publish and failures
//! are collected rather than aborting the batch.
//!
//! A batch is not atomic. Records published before a failure stay published,
//! and a record whose publish step failed stays created on the repository.

use fdp_vocab::{ExchangeGraph, GraphFormat};
use futures::stream::{self, StreamExt};

use crate::client::{Publication, PublicationState, RepositoryClient};
use crate::error::ClientError;

/// A serialized record ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRecord {
    /// Label for reports.
    pub label: String,
    /// Repository resource type the record is created under.
    pub resource_type: String,
    /// Submission graph.
    pub graph: ExchangeGraph,
    /// Serialization, if different from the client default.
    pub format: Option<GraphFormat>,
}

impl PreparedRecord {
    /// A record submitted in the client's default format.
    pub fn new(
        label: impl Into<String>,
        resource_type: impl Into<String>,
        graph: ExchangeGraph,
    ) -> Self {
        Self {
            label: label.into(),
            resource_type: resource_type.into(),
            graph,
            format: None,
        }
    }

    /// Overrides the serialization for this record only.
    #[must_use]
    pub fn with_format(mut self, format: GraphFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// What happened to one record of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// The record's publication, at the state it reached.
    pub publication: Publication,
    /// The error that stopped it, if any.
    pub error: Option<ClientError>,
}

impl BatchOutcome {
    /// Returns true if the record did not reach the published state.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Per-record outcomes of a batch, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Every record's outcome.
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an outcome.
    pub fn push(&mut self, outcome: BatchOutcome) {
        self.outcomes.push(outcome);
    }

    /// Appends the outcomes of another report.
    pub fn extend(&mut self, other: BatchReport) {
        self.outcomes.extend(other.outcomes);
    }

    /// Number of records that reached the published state.
    pub fn published_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.publication.is_published())
            .count()
    }

    /// Number of records that failed.
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Records created on the repository but left unpublished.
    pub fn stranded(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.publication.state(), PublicationState::Created(_)))
    }

    /// Returns true if every record was published.
    pub fn all_published(&self) -> bool {
        self.failure_count() == 0
    }
}

impl RepositoryClient {
    /// Publishes `records` one after another.
    pub async fn publish_all(
        &self,
        records: impl IntoIterator<Item = PreparedRecord>,
    ) -> BatchReport {
        let mut report = BatchReport::new();
        for record in records {
            report.push(self.publish_record(record).await);
        }
        report
    }

    /// Publishes `records` with up to `limit` create → publish sequences in
    /// flight. Each sequence owns its publication; only the session is
    /// shared. The report keeps submission order.
    pub async fn publish_all_concurrent(
        &self,
        records: impl IntoIterator<Item = PreparedRecord>,
        limit: usize,
    ) -> BatchReport {
        let mut outcomes: Vec<(usize, BatchOutcome)> = stream::iter(records.into_iter().enumerate())
            .map(|(index, record)| async move { (index, self.publish_record(record).await) })
            .buffer_unordered(limit.max(1))
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _)| *index);
        BatchReport {
            outcomes: outcomes.into_iter().map(|(_, outcome)| outcome).collect(),
        }
    }

    /// Runs create → publish for one record.
    pub async fn publish_record(&self, record: PreparedRecord) -> BatchOutcome {
        let mut publication = Publication::new(record.label);
        let format = record.format.unwrap_or(self.config().graph_format);
        let result = match self
            .create_as(&mut publication, &record.resource_type, &record.graph, format)
            .await
        {
            Ok(_) => self.publish(&mut publication).await,
            Err(err) => Err(err),
        };
        BatchOutcome {
            publication,
            error: result.err(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ErrorKind;
    use crate::fake::FakeTransport;
    use crate::observer::NoopObserver;
    use crate::transport::{HttpResponse, Method};
    use fdp_vocab::{Literal, Object};

    fn record(label: &str, resource_type: &str) -> PreparedRecord {
        let mut graph = ExchangeGraph::new();
        graph.insert(
            format!("https://example.org/{label}"),
            "http://purl.org/dc/terms/title",
            Object::Literal(Literal::plain(label)),
        );
        PreparedRecord::new(label, resource_type, graph)
    }

    async fn client(fake: FakeTransport) -> RepositoryClient {
        RepositoryClient::connect(
            ClientConfig::new("https://fdp.example.org", "a@example.org", "pw"),
            Arc::new(fake),
            Arc::new(NoopObserver),
        )
        .await
        .unwrap()
    }

    fn scripted() -> FakeTransport {
        FakeTransport::new()
            .with_login("tok")
            .respond(
                Method::Post,
                "/catalog",
                HttpResponse::new(201).with_header("Location", "https://fdp.example.org/catalog/1"),
            )
            .respond(Method::Post, "/dataset", HttpResponse::new(500).with_body("SHACL violation"))
            .respond(
                Method::Post,
                "/distribution",
                HttpResponse::new(201)
                    .with_header("Location", "https://fdp.example.org/distribution/3"),
            )
            .respond(Method::Put, "/catalog/1/meta/state", HttpResponse::new(200))
            .respond(Method::Put, "/distribution/3/meta/state", HttpResponse::new(503))
    }

    fn check(report: &BatchReport) {
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.published_count(), 1);
        assert_eq!(report.failure_count(), 2);
        assert!(!report.all_published());

        let dataset = &report.outcomes[1];
        assert_eq!(dataset.publication.label(), "ds");
        assert_eq!(dataset.publication.state(), &PublicationState::Unsubmitted);
        let err = dataset.error.as_ref().unwrap();
        assert_eq!(err.kind, ErrorKind::RemoteRejection);
        assert_eq!(err.body.as_deref(), Some("SHACL violation"));

        let stranded: Vec<_> = report.stranded().collect();
        assert_eq!(stranded.len(), 1);
        assert_eq!(
            stranded[0].publication.identity(),
            Some("https://fdp.example.org/distribution/3")
        );
    }

    fn batch() -> Vec<PreparedRecord> {
        vec![
            record("cat", "catalog"),
            record("ds", "dataset"),
            record("dist", "distribution").with_format(GraphFormat::NTriples),
        ]
    }

    #[tokio::test]
    async fn sequential_batch_continues_past_failures() {
        let report = client(scripted()).await.publish_all(batch()).await;
        check(&report);
    }

    #[tokio::test]
    async fn concurrent_batch_keeps_submission_order() {
        let report = client(scripted()).await.publish_all_concurrent(batch(), 3).await;
        check(&report);
    }
}
