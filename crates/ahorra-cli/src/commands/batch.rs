//! Batch processing command for multiple bills.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use ahorra_core::models::comparison::SavingsReport;
use ahorra_core::{EnergyOffer, JsonOfferCatalog, OcrProvider, OfferCatalog, PdfExtractor, SavingsPipeline};

use super::analyze::{format_report, resolve_mime, status_label, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Offer catalog (JSON array of offers)
    #[arg(long)]
    offers: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

type NativePipeline = SavingsPipeline<PdfExtractor, Box<dyn OcrProvider>>;

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    report: Option<SavingsReport>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::config::load(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "pdf" | "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp"
            )
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let offers = JsonOfferCatalog::new(&args.offers).active_offers()?;

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = SavingsPipeline::native(&config);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &pipeline, &offers).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(report) => {
                results.push(ProcessResult {
                    path,
                    report: Some(report),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        report: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let processed: Vec<_> = results.iter().filter(|r| r.report.is_some()).collect();
    let errored: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &processed {
            if let Some(report) = &result.report {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("bill");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_report(report, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let with_savings = processed
        .iter()
        .filter(|r| r.report.as_ref().is_some_and(|rep| rep.comparison.is_some()))
        .count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} with savings, {} without comparison, {} errors",
        style(with_savings).green(),
        style(processed.len() - with_savings).yellow(),
        style(errored.len()).red()
    );

    if !errored.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &errored {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn process_single_file(
    path: &Path,
    pipeline: &NativePipeline,
    offers: &[EnergyOffer],
) -> anyhow::Result<SavingsReport> {
    let data = fs::read(path)?;
    let mime = resolve_mime(path, &data, None)?;
    Ok(pipeline.analyze(&data, &mime, offers).await)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "company_name",
        "consumption_kwh",
        "total_factura",
        "confidence",
        "best_offer_id",
        "estimated_savings_amount",
        "estimated_savings_percentage",
        "prudent_mode",
        "failure_reason",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let elapsed = result.processing_time_ms.to_string();

        match &result.report {
            Some(report) => {
                let extraction = &report.extraction;
                let comparison = report.comparison.as_ref();
                let optional = |value: Option<String>| value.unwrap_or_default();

                wtr.write_record([
                    filename,
                    status_label(report.status).to_string(),
                    optional(extraction.company_name.clone()),
                    optional(extraction.consumption_kwh.map(|v| v.to_string())),
                    optional(extraction.total_factura.map(|v| v.to_string())),
                    format!("{:.2}", extraction.confidence),
                    optional(comparison.map(|c| c.best_offer_id.clone())),
                    optional(comparison.map(|c| c.estimated_savings_amount.to_string())),
                    optional(comparison.map(|c| c.estimated_savings_percentage.to_string())),
                    optional(comparison.map(|c| c.prudent_mode.to_string())),
                    optional(report.failure_reason.map(|r| r.to_string())),
                    elapsed,
                    String::new(),
                ])?;
            }
            None => {
                let mut record = vec![filename, "error".to_string()];
                record.extend(std::iter::repeat_n(String::new(), 9));
                record.push(elapsed);
                record.push(result.error.clone().unwrap_or_default());
                wtr.write_record(record)?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
