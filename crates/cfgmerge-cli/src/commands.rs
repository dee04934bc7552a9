use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};

use cfgmerge_layers::{flatten_namespaces_json, merge_payloads, LayerConfig, Payload};
use cfgmerge_merge::merge_json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let output = match cli.command {
        Command::Merge(args) => cmd_merge(&args)?,
        Command::Flatten(args) => cmd_flatten(&args, &config)?,
        Command::Payloads(args) => cmd_payloads(&args, &config)?,
    };
    println!("{}", render(&output, &cli.format)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LayerConfig> {
    let Some(path) = path else {
        return Ok(LayerConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn render(value: &Value, format: &OutputFormat) -> anyhow::Result<String> {
    let text = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(text)
}

fn cmd_merge(args: &MergeArgs) -> anyhow::Result<Value> {
    let base = match &args.base {
        Some(path) => read_json(path)?,
        None => json!({}),
    };
    let docs = args
        .files
        .iter()
        .map(|path| read_json(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let merged = merge_json(&base, &docs)?;
    eprintln!("{} Merged {} documents", "✓".green().bold(), docs.len());
    Ok(merged)
}

fn cmd_flatten(args: &FlattenArgs, config: &LayerConfig) -> anyhow::Result<Value> {
    let groups = read_json(&args.file)?;
    let flat = flatten_namespaces_json(&groups, config)
        .with_context(|| format!("flattening {}", args.file.display()))?;
    eprintln!("{} Flattened {} keys", "✓".green().bold(), flat.len());
    Ok(Value::Object(flat))
}

fn cmd_payloads(args: &PayloadsArgs, config: &LayerConfig) -> anyhow::Result<Value> {
    let payloads = args
        .files
        .iter()
        .map(|path| read_json(path).map(|raw| Payload::classify(raw, config)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let count = payloads.len();
    let merged = merge_payloads(payloads, config)?;
    eprintln!("{} Merged {} payloads", "✓".green().bold(), count);
    Ok(merged)
}
