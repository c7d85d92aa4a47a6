//! Extract command - read bill fields without comparing.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use ahorra_core::models::extraction::InvoiceExtraction;
use ahorra_core::{format_locale_amount, SavingsPipeline};

use super::analyze::resolve_mime;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// MIME type of the input (detected from content by default)
    #[arg(long)]
    mime: Option<String>,

    /// Print a plain text summary instead of JSON
    #[arg(long)]
    text: bool,

    /// Include the recovered raw text
    #[arg(long)]
    raw: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let data = fs::read(&args.input)?;
    let mime = resolve_mime(&args.input, &data, args.mime.as_deref())?;
    info!("Extracting fields from {} ({})", args.input.display(), mime);

    let mut extraction = SavingsPipeline::native(&config).extract(&data, &mime).await;
    if !args.raw {
        extraction.raw_text = None;
    }

    if args.text {
        print!("{}", format_extraction(&extraction));
    } else {
        println!("{}", serde_json::to_string_pretty(&extraction)?);
    }

    Ok(())
}

fn format_extraction(extraction: &InvoiceExtraction) -> String {
    let mut output = String::new();

    let field = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    output.push_str(&format!("Supplier:    {}\n", field(extraction.company_name.clone())));
    output.push_str(&format!(
        "Consumption: {}\n",
        field(extraction.consumption_kwh.map(|v| format!("{} kWh", format_locale_amount(v))))
    ));
    output.push_str(&format!(
        "Total:       {}\n",
        field(extraction.total_factura.map(|v| format!("{} €", format_locale_amount(v))))
    ));
    output.push_str(&format!("Period:      {} month(s)\n", extraction.period_months));
    output.push_str(&format!("Confidence:  {:.2}\n", extraction.confidence));

    for warning in &extraction.warnings {
        output.push_str(&format!("Warning:     {}\n", warning));
    }

    if let Some(raw) = &extraction.raw_text {
        output.push_str("\n--- raw text ---\n");
        output.push_str(raw);
        output.push('\n');
    }

    output
}
