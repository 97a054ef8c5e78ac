//! Process command - extract the four fields from a single invoice file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use facturas_core::{
    AutoLoader, BatchAggregator, Document, InvoiceRecord, PhoneBillExtractor, SentinelLabels,
    COLUMNS,
};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let document = Document::from_path(&args.input)?;
    let aggregator = BatchAggregator::new(AutoLoader::new(&config.pdf), PhoneBillExtractor::new());
    let (record, load_error) = aggregator.process_document(&document);

    if let Some(e) = load_error {
        eprintln!(
            "{} Could not read {}: {}",
            style("⚠").yellow(),
            document.file_name,
            e
        );
    }

    let output = format_record(&record, args.format, &config.export.labels())?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_record(
    record: &InvoiceRecord,
    format: OutputFormat,
    labels: &SentinelLabels,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_record_csv(record, labels),
        OutputFormat::Text => Ok(format_record_text(record, labels)),
    }
}

fn format_record_csv(record: &InvoiceRecord, labels: &SentinelLabels) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(COLUMNS)?;
    wtr.write_record(record.cells(labels))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_record_text(record: &InvoiceRecord, labels: &SentinelLabels) -> String {
    let [file, customer, number, date, total] = record.cells(labels);

    let mut output = String::new();
    output.push_str(&format!("File:     {}\n", file));
    output.push_str(&format!("Customer: {}\n", customer));
    output.push_str(&format!("Number:   {}\n", number));
    output.push_str(&format!("Date:     {}\n", date));
    output.push_str(&format!("Total:    {}\n", total));
    output
}
