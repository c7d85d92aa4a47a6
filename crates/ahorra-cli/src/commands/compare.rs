//! Compare command - compare bill figures entered by hand.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::info;

use ahorra_core::models::extraction::InvoiceExtraction;
use ahorra_core::{parse_locale_number, savings_report, ComparisonEngine, JsonOfferCatalog, OfferCatalog};

use super::analyze::{format_report, OutputFormat};

/// Arguments for the compare command.
#[derive(Args)]
pub struct CompareArgs {
    /// Billed consumption in kWh (e.g. "1.250,5")
    #[arg(long, value_parser = parse_figure)]
    consumption: Decimal,

    /// Billed total in euros (e.g. "60,00")
    #[arg(long, value_parser = parse_figure)]
    total: Decimal,

    /// Current supplier
    #[arg(long)]
    company: Option<String>,

    /// Months covered by the bill
    #[arg(long, default_value_t = 1)]
    period_months: u32,

    /// Offer catalog (JSON array of offers)
    #[arg(long)]
    offers: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

fn parse_figure(s: &str) -> Result<Decimal, String> {
    parse_locale_number(s).ok_or_else(|| format!("invalid number: {}", s))
}

pub async fn run(args: CompareArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;
    let offers = JsonOfferCatalog::new(&args.offers).active_offers()?;

    let extraction = InvoiceExtraction::manual(
        args.company.as_deref(),
        args.consumption,
        args.total,
        args.period_months,
    );
    if !extraction.has_billing_figures() {
        info!("Consumption and total must both be positive");
    }

    let engine = ComparisonEngine::from_config(&config);
    let report = savings_report(&engine, extraction, &offers);

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

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_figure() {
        assert_eq!(parse_figure("60,00"), Ok(Decimal::new(6000, 2)));
        assert_eq!(parse_figure("1.250,5"), Ok(Decimal::new(12505, 1)));
        assert!(parse_figure("abc").is_err());
    }
}
