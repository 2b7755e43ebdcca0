//! `fdp-render` validates JSON record documents and renders them as
//! Turtle or N-Triples exchange graphs, without contacting a repository.
//!
//! Child records are anchored to their parent's subject through
//! `dcterms:isPartOf`, the same way `fdp-publish` anchors them to the
//! repository identity.
//!
//! **Usage:**
//! ```
//! fdp-render [--format turtle|n-triples] [--out <path>] [--check] <document.json>...
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use fdp_vocab::{reader, GraphFormat, RecordDocument, SchemaRegistry};

/// Render record documents as exchange graphs.
#[derive(Parser)]
#[command(name = "fdp-render", about = "Validate and render FAIR Data Point record documents")]
struct Args {
    /// JSON record documents (one document or an array per file).
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// Output serialization.
    #[arg(long, default_value = "turtle")]
    format: GraphFormat,

    /// Write to this file instead of standard output.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Parse each rendered graph back and compare it with the original.
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let registry = SchemaRegistry::standard();

    let mut queue = VecDeque::new();
    for path in &args.documents {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let docs = RecordDocument::many_from_json_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        queue.extend(docs.into_iter().map(|doc| (doc, None::<String>)));
    }

    let mut output = String::new();
    let mut failed = 0usize;
    let mut rendered = 0usize;
    while let Some((doc, parent)) = queue.pop_front() {
        match render(registry, &doc, parent.as_deref(), args.format, args.check) {
            Ok(text) => {
                rendered += 1;
                if !output.is_empty() && args.format == GraphFormat::Turtle {
                    output.push('\n');
                }
                output.push_str(&text);
                if let Some(subject) = &doc.subject {
                    queue.extend(
                        doc.children
                            .iter()
                            .cloned()
                            .map(|child| (child, Some(subject.clone()))),
                    );
                }
            }
            Err(e) => {
                failed += 1 + count_descendants(&doc);
                eprintln!("  ✗ {}: {e:#}", doc.display_label());
            }
        }
    }

    match &args.out {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("  Written: {} ({rendered} record(s))", path.display());
        }
        None => print!("{output}"),
    }

    if failed > 0 {
        eprintln!("Rendering FAILED: {failed} record(s) could not be rendered.");
        process::exit(1);
    }
    Ok(())
}

fn render(
    registry: &SchemaRegistry,
    doc: &RecordDocument,
    parent: Option<&str>,
    format: GraphFormat,
    check: bool,
) -> Result<String> {
    let subject = doc
        .subject
        .as_deref()
        .ok_or_else(|| anyhow!("document has no subject to render at"))?;
    let mut builder = doc.to_builder(registry)?;
    if let Some(parent) = parent {
        builder.part_of(parent);
    }
    let graph = builder.build()?.to_graph(subject)?;
    let text = format.render(&graph);
    if check {
        let parsed = reader::parse(&text, format).context("Rendered graph does not parse")?;
        if parsed != graph {
            return Err(anyhow!("rendered graph does not parse back to the same triples"));
        }
    }
    Ok(text)
}

fn count_descendants(doc: &RecordDocument) -> usize {
    doc.children
        .iter()
        .map(|child| 1 + count_descendants(child))
        .sum()
}
