//! `fdp-publish` validates JSON record documents and publishes them to a
//! FAIR Data Point: each record is created, then moved to the published
//! state. Child records are published after their parent, anchored to the
//! identity the repository assigned it.
//!
//! Settings come from `--config` (TOML), then `FDP_BASE_URL`, `FDP_EMAIL`,
//! `FDP_PASSWORD` and `FDP_INSECURE`, then command-line flags.
//!
//! **Usage:**
//! ```
//! fdp-publish [--config fdp.toml] [--base-url <url>] [--email <email>]
//!             [--concurrency <n>] [--dry-run] <document.json>...
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use fdp_client::{
    BatchOutcome, BatchReport, ClientConfig, ClientError, ErrorKind, PreparedRecord, Publication,
    RepositoryClient,
};
use fdp_vocab::{GraphFormat, RecordDocument, SchemaRegistry};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Publish record documents to a FAIR Data Point.
#[derive(Parser)]
#[command(name = "fdp-publish", about = "Publish metadata records to a FAIR Data Point")]
struct Args {
    /// JSON record documents (one document or an array per file).
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// TOML client configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Repository base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Login email.
    #[arg(long)]
    email: Option<String>,

    /// Login password. Prefer `FDP_PASSWORD` or the config file.
    #[arg(long)]
    password: Option<String>,

    /// Graph serialization sent to the repository.
    #[arg(long)]
    format: Option<GraphFormat>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Skip TLS certificate verification.
    #[arg(long)]
    insecure: bool,

    /// Log in again and retry once when a token is rejected.
    #[arg(long)]
    reauthenticate: bool,

    /// Records published concurrently within one level of the document tree.
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Validate and render only; do not contact the repository.
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn client_config(&self) -> Result<ClientConfig> {
        let config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::new("", "", ""),
        };
        let mut config = config.with_env_overrides()?;
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.trim_end_matches('/').to_owned();
        }
        if let Some(email) = &self.email {
            config.email = email.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        if let Some(format) = self.format {
            config.graph_format = format;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config.insecure |= self.insecure;
        config.reauthenticate_on_401 |= self.reauthenticate;
        config.validate()?;
        Ok(config)
    }
}

/// A document waiting for its parent's identity.
struct Pending {
    doc: RecordDocument,
    parent: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut level = Vec::new();
    for path in &args.documents {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let docs = RecordDocument::many_from_json_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        level.extend(docs.into_iter().map(|doc| Pending { doc, parent: None }));
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let failed = runtime.block_on(run(&args, level))?;

    if failed > 0 {
        eprintln!("Publishing FAILED: {failed} record(s) were not published.");
        process::exit(1);
    }
    Ok(())
}

async fn run(args: &Args, mut level: Vec<Pending>) -> Result<usize> {
    let registry = SchemaRegistry::standard();
    let client = if args.dry_run {
        None
    } else {
        let config = args.client_config()?;
        Some(
            RepositoryClient::connect_with_defaults(config)
                .await
                .context("Failed to log in to the repository")?,
        )
    };

    let mut failed = 0usize;
    let mut position = 0usize;
    let mut report = BatchReport::new();
    while !level.is_empty() {
        let mut prepared = Vec::new();
        let mut subjects = Vec::new();
        let mut children = Vec::new();
        for pending in level {
            position += 1;
            match prepare(registry, &pending, position, client.as_ref()) {
                Ok((record, subject)) => {
                    if client.is_none() {
                        println!("{}", args.format.unwrap_or_default().render(&record.graph));
                    }
                    subjects.push(Some(subject));
                    children.push(pending.doc.children);
                    prepared.push(record);
                }
                Err(e) => {
                    failed += 1 + count_descendants(&pending.doc);
                    warn!(record = pending.doc.display_label(), "{e:#}");
                }
            }
        }

        let Some(client) = &client else {
            // Dry run: children are anchored to the parent's submitted subject.
            level = next_level(subjects, children);
            continue;
        };

        let batch = client
            .publish_all_concurrent(prepared, args.concurrency)
            .await;
        let identities: Vec<Option<String>> = batch
            .outcomes
            .iter()
            .map(|o| o.publication.identity().map(str::to_owned))
            .collect();
        for (outcome, kids) in batch.outcomes.iter().zip(&children) {
            if outcome.publication.identity().is_none() {
                failed += kids.iter().map(|kid| 1 + count_descendants(kid)).sum::<usize>();
                for kid in kids {
                    report.push(skipped(kid, outcome));
                }
            }
        }
        failed += batch.failure_count();
        report.extend(batch);
        level = next_level(identities, children);
    }

    for outcome in &report.outcomes {
        match &outcome.error {
            None => info!(record = outcome.publication.label(), "{}", outcome.publication.state()),
            Some(err) => warn!(
                record = outcome.publication.label(),
                state = %outcome.publication.state(),
                "{err}"
            ),
        }
    }
    if client.is_some() {
        println!(
            "Published {} of {} record(s); {} left created but unpublished.",
            report.published_count(),
            report.outcomes.len(),
            report.stranded().count()
        );
    }
    Ok(failed)
}

fn prepare(
    registry: &SchemaRegistry,
    pending: &Pending,
    position: usize,
    client: Option<&RepositoryClient>,
) -> Result<(PreparedRecord, String)> {
    let doc = &pending.doc;
    let resource_type = doc
        .resource_type(registry)
        .ok_or_else(|| anyhow!("schema {} has no repository resource type", doc.schema))?;
    let mut builder = doc.to_builder(registry)?;
    if let Some(parent) = &pending.parent {
        builder.part_of(parent.clone());
    }
    let record = builder.build()?;

    // The repository assigns the identity; the submitted subject is only a
    // placeholder when the document carries none. Draft subjects are numbered
    // so children anchor to the right parent.
    let subject = match (&doc.subject, client) {
        (Some(subject), _) => subject.clone(),
        (None, Some(client)) => format!("{}/{resource_type}", client.config().base_url),
        (None, None) => draft_subject(resource_type, position),
    };
    let graph = record.to_graph(&subject)?;
    Ok((PreparedRecord::new(doc.display_label(), resource_type, graph), subject))
}

fn draft_subject(resource_type: &str, position: usize) -> String {
    format!("urn:fdp:draft:{resource_type}:{position}")
}

fn next_level(parents: Vec<Option<String>>, children: Vec<Vec<RecordDocument>>) -> Vec<Pending> {
    parents
        .into_iter()
        .zip(children)
        .filter_map(|(parent, kids)| parent.map(|parent| (parent, kids)))
        .flat_map(|(parent, kids)| {
            kids.into_iter().map(move |doc| Pending {
                doc,
                parent: Some(parent.clone()),
            })
        })
        .collect()
}

fn skipped(doc: &RecordDocument, parent: &BatchOutcome) -> BatchOutcome {
    BatchOutcome {
        publication: Publication::new(doc.display_label()),
        error: Some(ClientError::new(
            ErrorKind::InvalidState,
            format!("parent {} was not created", parent.publication.label()),
        )),
    }
}

fn count_descendants(doc: &RecordDocument) -> usize {
    doc.children
        .iter()
        .map(|child| 1 + count_descendants(child))
        .sum()
}
