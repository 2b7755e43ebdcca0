//! FAIR Data Point metadata records encoded as typed Rust data.
//!
//! The `fdp-vocab` crate describes DCAT, FOAF and vCard metadata records as
//! static schemas, validates populated records against them (reporting every
//! missing mandatory field at once), and turns valid records into exchange
//! graphs serialized as Turtle or N-Triples.
//!
//! # Entry Point
//!
//! ```
//! use fdp_vocab::{RecordBuilder, SchemaRegistry, Value};
//!
//! let registry = SchemaRegistry::standard();
//! let catalog = registry.get("Catalog").ok_or("no Catalog schema")?;
//! let record = RecordBuilder::new(catalog)
//!     .with("title", Value::literal("Test catalog"))
//!     .with("description", Value::literal("Catalog of test datasets"))
//!     .build()?;
//! let graph = record.to_graph("https://example.org/catalog/1")?;
//! let turtle = fdp_vocab::GraphFormat::Turtle.render(&graph);
//! assert!(turtle.starts_with("<https://example.org/catalog/1>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Validation
//!
//! ```
//! use fdp_vocab::{RecordBuilder, SchemaRegistry, ValidationError, Value};
//!
//! let catalog = SchemaRegistry::standard().get("Catalog").ok_or("no Catalog schema")?;
//! let err = RecordBuilder::new(catalog)
//!     .with("title", Value::literal("Test catalog"))
//!     .build()
//!     .err()
//!     .ok_or("expected a validation error")?;
//! assert_eq!(err.fields(), ["description"]);
//! assert!(matches!(err, ValidationError::MissingFields { .. }));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod assembler;
#[cfg(feature = "serde")]
pub mod document;
pub mod error;
pub mod graph;
pub mod model;
pub mod namespaces;
pub mod reader;
pub mod record;
pub mod serializer;

pub use assembler::GraphAssembler;
#[cfg(feature = "serde")]
pub use document::{DocumentValue, RecordDocument};
#[cfg(feature = "serde")]
pub use error::DocumentError;
pub use error::{GraphError, ValidationError};
pub use graph::{ExchangeGraph, Literal, Object, Triple};
pub use model::{Cardinality, FieldDescriptor, RecordSchema, ValueKind};
pub use namespaces::SchemaRegistry;
pub use record::{validate, FieldValues, RecordBuilder, RecordInstance, Value};
pub use serializer::GraphFormat;
