//! Analyze command - run the full pipeline on a single bill.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ahorra_core::models::comparison::{ComparisonStatus, SavingsReport};
use ahorra_core::models::extraction::{InvoiceExtraction, TextSource};
use ahorra_core::{format_locale_amount, DocumentKind, JsonOfferCatalog, OfferCatalog, SavingsPipeline};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Offer catalog (JSON array of offers)
    #[arg(long)]
    offers: PathBuf,

    /// MIME type of the input (detected from content by default)
    #[arg(long)]
    mime: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence and text source
    #[arg(long)]
    show_confidence: bool,
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

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Analyzing file: {}", args.input.display());

    let offers = JsonOfferCatalog::new(&args.offers).active_offers()?;

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Loading document...");
    pb.set_position(10);

    let data = fs::read(&args.input)?;
    let mime = resolve_mime(&args.input, &data, args.mime.as_deref())?;
    debug!("Document type: {}", mime);

    pb.set_message("Reading bill...");
    pb.set_position(30);

    let pipeline = SavingsPipeline::native(&config);
    let report = pipeline.analyze(&data, &mime, &offers).await;

    pb.set_position(100);
    pb.finish_and_clear();

    let output = format_report(&report, args.format)?;

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

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}% ({})",
            style("ℹ").blue(),
            report.extraction.confidence * 100.0,
            source_label(&report.extraction)
        );
        for warning in &report.extraction.warnings {
            println!("{} {}", style("⚠").yellow(), warning);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Pick the MIME type: explicit flag, then content sniffing.
pub fn resolve_mime(path: &Path, data: &[u8], explicit: Option<&str>) -> anyhow::Result<String> {
    if let Some(mime) = explicit {
        return Ok(mime.to_string());
    }

    match DocumentKind::sniff(data) {
        Some(kind) => Ok(kind.mime_type().to_string()),
        None => anyhow::bail!(
            "Unsupported file format: {} (pass --mime to override)",
            path.display()
        ),
    }
}

pub fn format_report(report: &SavingsReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_csv(report: &SavingsReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "status",
        "company_name",
        "consumption_kwh",
        "total_factura",
        "period_months",
        "confidence",
        "best_offer_id",
        "best_offer_company",
        "current_monthly_cost",
        "best_offer_monthly_cost",
        "estimated_savings_amount",
        "estimated_savings_percentage",
        "prudent_mode",
        "failure_reason",
    ])?;

    let extraction = &report.extraction;
    let comparison = report.comparison.as_ref();
    let optional = |value: Option<String>| value.unwrap_or_default();

    wtr.write_record([
        status_label(report.status).to_string(),
        optional(extraction.company_name.clone()),
        optional(extraction.consumption_kwh.map(|v| v.to_string())),
        optional(extraction.total_factura.map(|v| v.to_string())),
        extraction.period_months.to_string(),
        format!("{:.2}", extraction.confidence),
        optional(comparison.map(|c| c.best_offer_id.clone())),
        optional(comparison.map(|c| c.best_offer_company.clone())),
        optional(comparison.map(|c| c.current_monthly_cost.to_string())),
        optional(comparison.map(|c| c.best_offer_monthly_cost.to_string())),
        optional(comparison.map(|c| c.estimated_savings_amount.to_string())),
        optional(comparison.map(|c| c.estimated_savings_percentage.to_string())),
        optional(comparison.map(|c| c.prudent_mode.to_string())),
        optional(report.failure_reason.map(|r| r.to_string())),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(report: &SavingsReport) -> String {
    let extraction = &report.extraction;
    let mut output = String::new();

    output.push_str("Bill:\n");
    output.push_str(&format!(
        "  Supplier:    {}\n",
        extraction.company_name.as_deref().unwrap_or("unknown")
    ));
    output.push_str(&format!(
        "  Consumption: {}\n",
        extraction
            .consumption_kwh
            .map(|v| format!("{} kWh", format_locale_amount(v)))
            .unwrap_or_else(|| "not found".to_string())
    ));
    output.push_str(&format!(
        "  Total:       {}\n",
        extraction
            .total_factura
            .map(|v| format!("{} €", format_locale_amount(v)))
            .unwrap_or_else(|| "not found".to_string())
    ));
    output.push_str(&format!("  Period:      {} month(s)\n", extraction.period_months));
    if let Some(period) = extraction.billing_period {
        output.push_str(&format!(
            "  Dates:       {} to {} ({} days)\n",
            period.start,
            period.end,
            period.days()
        ));
    }
    output.push('\n');

    match (&report.comparison, report.failure_reason) {
        (Some(comparison), _) => {
            output.push_str("Comparison:\n");
            output.push_str(&format!(
                "  Best offer:   {} ({})\n",
                comparison.best_offer_company, comparison.best_offer_id
            ));
            output.push_str(&format!(
                "  Current cost: {} €/month\n",
                format_locale_amount(comparison.current_monthly_cost)
            ));
            output.push_str(&format!(
                "  Offer cost:   {} €/month\n",
                format_locale_amount(comparison.best_offer_monthly_cost)
            ));
            if report.show_exact_savings {
                output.push_str(&format!(
                    "  Savings:      {} €/month ({}%)\n",
                    format_locale_amount(comparison.estimated_savings_amount),
                    format_locale_amount(comparison.estimated_savings_percentage)
                ));
            } else {
                output.push_str("  Savings:      optimization opportunity\n");
            }
            if comparison.prudent_mode {
                output.push_str("  Note:         estimate based on uncertain bill data\n");
            }
        }
        (None, Some(reason)) => {
            output.push_str(&format!("No comparison: {}\n", reason));
        }
        (None, None) => {
            output.push_str("No comparison\n");
        }
    }

    output
}

pub fn status_label(status: ComparisonStatus) -> &'static str {
    match status {
        ComparisonStatus::Completed => "completed",
        ComparisonStatus::Failed => "failed",
    }
}

fn source_label(extraction: &InvoiceExtraction) -> &'static str {
    match extraction.source {
        TextSource::EmbeddedText => "embedded PDF text",
        TextSource::Ocr => "OCR",
        TextSource::None => "no document text",
    }
}
