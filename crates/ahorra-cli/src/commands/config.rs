//! Config command - inspect and edit pipeline settings.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use ahorra_core::models::config::AhorraConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration, or one section of it
    Show {
        /// Section to print (acquisition, ocr, tariff, comparison)
        section: Option<String>,
    },

    /// Write a configuration file with default settings
    Init(InitArgs),

    /// Print one value (e.g., "comparison.min_percent_to_show")
    Get { key: String },

    /// Change one value in the configuration file
    Set { key: String, value: String },

    /// Show where configuration and OCR credentials come from
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Where to write the file (default: user config directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Document-analysis endpoint to enable OCR with
    #[arg(long)]
    ocr_endpoint: Option<String>,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { section } => show(section.as_deref()),
        ConfigCommand::Init(init_args) => init(init_args),
        ConfigCommand::Get { key } => get(&key),
        ConfigCommand::Set { key, value } => set(&key, &value),
        ConfigCommand::Path => path(),
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ahorra")
        .join("config.json")
}

/// Load the configuration used by the pipeline commands.
///
/// An explicit path must exist; otherwise the default file is used when
/// present, falling back to built-in defaults.
pub fn load(config_path: Option<&str>) -> anyhow::Result<AhorraConfig> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        read_config(&default_path)
    } else {
        debug!("No config file found, using defaults");
        Ok(AhorraConfig::default())
    }
}

fn read_config(path: &Path) -> anyhow::Result<AhorraConfig> {
    AhorraConfig::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
}

/// Walk a dotted key through a JSON tree.
fn lookup<'a>(json: &'a serde_json::Value, key: &str) -> anyhow::Result<&'a serde_json::Value> {
    key.split('.').try_fold(json, |node, part| {
        node.get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

fn show(section: Option<&str>) -> anyhow::Result<()> {
    let json = serde_json::to_value(load(None)?)?;
    let value = match section {
        Some(section) => lookup(&json, section)?,
        None => &json,
    };

    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut config = AhorraConfig::default();
    if let Some(endpoint) = args.ocr_endpoint {
        config.ocr.endpoint = endpoint;
    }
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );
    if config.ocr.is_enabled() {
        println!(
            "  Put the OCR API key in ${} (a .env file works too).",
            config.ocr.api_key_env
        );
    }

    Ok(())
}

fn get(key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(load(None)?)?;
    println!("{}", serde_json::to_string_pretty(lookup(&json, key)?)?);
    Ok(())
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let config_path = default_config_path();
    let mut json = serde_json::to_value(load(None)?)?;

    // Bare words are taken as strings ("prebuilt-read"), everything else as JSON
    let parsed_value: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    let (section, field) = key
        .rsplit_once('.')
        .ok_or_else(|| anyhow::anyhow!("Expected <section>.<field>, got: {}", key))?;
    let slot = json
        .get_mut(section)
        .and_then(|s| s.as_object_mut())
        .and_then(|s| s.get_mut(field))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    *slot = parsed_value.clone();

    // Round-trip through the typed config so invalid values are rejected
    let config: AhorraConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(&config_path)?;

    println!("{} Set {} = {}", style("✓").green(), key, parsed_value);
    Ok(())
}

fn path() -> anyhow::Result<()> {
    let config_path = default_config_path();
    let exists = config_path.exists();

    println!("Configuration file: {}", config_path.display());
    println!(
        "Status: {}",
        if exists {
            style("exists").green()
        } else {
            style("not created").yellow()
        }
    );

    let config = load(None)?;
    if config.ocr.is_enabled() {
        let key_state = if std::env::var(&config.ocr.api_key_env).is_ok_and(|k| !k.is_empty()) {
            style("set").green()
        } else {
            style("missing").red()
        };
        println!("OCR endpoint: {}", config.ocr.endpoint);
        println!("OCR key (${}): {}", config.ocr.api_key_env, key_state);
    } else {
        println!("OCR: {}", style("disabled (no endpoint)").yellow());
    }

    if !exists {
        println!();
        println!("Run 'ahorra config init' to create a configuration file.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_nested_key() {
        let json = serde_json::to_value(AhorraConfig::default()).unwrap();

        assert_eq!(lookup(&json, "acquisition.min_text_len").unwrap(), &serde_json::json!(30));
        assert!(lookup(&json, "ocr").unwrap().is_object());
        assert!(lookup(&json, "ocr.nope").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ahorra.json");
        fs::write(&path, r#"{"tariff": {"days_per_month": "31"}}"#).unwrap();

        let config = load(path.to_str()).unwrap();
        assert_eq!(config.tariff.days_per_month, rust_decimal::Decimal::from(31));
        assert!(load(Some("missing.json")).is_err());
    }
}
