//! FAIR Data Point repository client.
//!
//! Logs in with `POST {base}/tokens`, submits exchange graphs with
//! `POST {base}/{resource_type}` and publishes the created record with
//! `PUT {record}/meta/state`. Validation happens earlier, in `fdp-vocab`;
//! this crate only moves graphs.
//!
//! ```no_run
//! use fdp_client::{ClientConfig, Publication, RepositoryClient};
//! use fdp_vocab::{RecordBuilder, SchemaRegistry, Value};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("https://fdp.example.org", "albert.einstein@example.com", "password");
//! let client = RepositoryClient::connect_with_defaults(config).await?;
//!
//! let catalog = SchemaRegistry::standard().get("Catalog").ok_or("no Catalog schema")?;
//! let record = RecordBuilder::new(catalog)
//!     .with("title", Value::literal("Test catalog"))
//!     .with("description", Value::literal("Catalog of test datasets"))
//!     .build()?;
//! let graph = record.to_graph("https://fdp.example.org/catalog/new")?;
//!
//! let mut publication = Publication::new("test catalog");
//! client.create_and_publish(&mut publication, "catalog", &graph).await?;
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod fake;
pub mod observer;
pub mod transport;

pub use batch::{BatchOutcome, BatchReport, PreparedRecord};
pub use client::{Publication, PublicationState, RecordStatus, RepositoryClient};
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError, ErrorKind};
pub use fake::FakeTransport;
pub use observer::{NoopObserver, PublishObserver, Stage, TracingObserver};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
