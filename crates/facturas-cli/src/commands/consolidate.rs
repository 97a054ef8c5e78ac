//! Consolidate command - process a batch of invoices into one spreadsheet.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use glob::{glob, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use facturas_core::{AutoLoader, BatchAggregator, BatchSummary, Document, PhoneBillExtractor};

use crate::export::{timestamped_file_name, SpreadsheetFormat};
use crate::preview;

/// Arguments for the consolidate command.
#[derive(Args)]
pub struct ConsolidateArgs {
    /// Input files or glob patterns, processed in the order given
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output directory for the spreadsheet
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Spreadsheet format
    #[arg(short, long, value_enum, default_value = "xlsx")]
    format: SpreadsheetFormat,

    /// Do not print the preview table
    #[arg(long)]
    no_preview: bool,
}

/// A document that yielded no text.
struct Failure {
    file_name: String,
    reason: String,
}

/// One submitted input after glob expansion.
#[derive(Debug, PartialEq)]
enum Input {
    File(PathBuf),
    /// Named on the command line or listed by the glob, but not readable.
    Unreachable { name: String, reason: String },
}

pub fn run(args: ConsolidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let inputs = expand_inputs(&args.inputs)?;
    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        inputs.len()
    );

    let documents: Vec<Document> = inputs
        .into_iter()
        .map(|input| match input {
            Input::File(path) => Document::read_or_unreadable(&path),
            Input::Unreachable { name, reason } => Document::unreadable(name, reason),
        })
        .collect();

    let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("."));
    let file_name = timestamped_file_name(
        &config.export.file_prefix,
        Local::now().naive_local(),
        args.format.extension(),
    );
    let output_path = output_dir.join(file_name);

    if !documents.is_empty() {
        fs::create_dir_all(&output_dir)?;
    }

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let aggregator = BatchAggregator::new(AutoLoader::new(&config.pdf), PhoneBillExtractor::new());
    let mut sink = args.format.sink(&output_path, &config.export);
    let mut failures = Vec::new();

    let result = aggregator.consolidate_with(&documents, sink.as_mut(), |doc, _, error| {
        if let Some(e) = error {
            failures.push(Failure {
                file_name: doc.file_name.clone(),
                reason: e.to_string(),
            });
        }
        pb.inc(1);
    });
    pb.finish_and_clear();

    let records = match result {
        Ok(records) => records,
        Err(e) => anyhow::bail!("Cannot export spreadsheet: {}", e),
    };

    let labels = config.export.labels();
    if !args.no_preview {
        println!();
        print!("{}", preview::render(&records, &labels));
    }

    let summary = BatchSummary::from_records(&records);
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        summary.total(),
        start.elapsed()
    );
    println!(
        "   {} complete, {} partial, {} unreadable",
        style(summary.complete).green(),
        style(summary.partial).yellow(),
        style(summary.unreadable).red()
    );

    if !failures.is_empty() {
        println!();
        println!("{}", style("Unreadable files:").red());
        for failure in &failures {
            println!("  - {}: {}", failure.file_name, failure.reason);
        }
    }

    println!();
    println!(
        "{} Spreadsheet written to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// Expand each input in order.
///
/// A literal path that does not exist and a listed path that cannot be read
/// still count as submitted documents. Patterns matching nothing are skipped.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<Input>> {
    let mut files = Vec::new();

    for input in inputs {
        let before = files.len();
        for entry in glob(input)? {
            match entry {
                Ok(path) if path.is_file() => files.push(Input::File(path)),
                Ok(path) => debug!("Skipping non-file {}", path.display()),
                Err(e) => {
                    warn!("Cannot read {}: {}", e.path().display(), e.error());
                    files.push(Input::Unreachable {
                        name: display_name(e.path()),
                        reason: e.error().to_string(),
                    });
                }
            }
        }

        if files.len() > before {
            continue;
        }

        if is_literal(input) {
            warn!("Input {} does not exist", input);
            files.push(Input::Unreachable {
                name: display_name(Path::new(input)),
                reason: "file not found".to_string(),
            });
        } else {
            warn!("No files match {}", input);
        }
    }

    Ok(files)
}

/// Whether the argument names a single path rather than a pattern.
fn is_literal(input: &str) -> bool {
    Pattern::escape(input) == input
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
