use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cfgmerge",
    about = "cfgmerge: assemble one effective configuration from layered JSON sources",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Layer settings (TOML); defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Compact,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deep-merge JSON documents; later files win
    Merge(MergeArgs),
    /// Flatten a namespace listing into one mapping
    Flatten(FlattenArgs),
    /// Normalize response payloads and deep-merge them
    Payloads(PayloadsArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Document to merge onto instead of an empty object
    #[arg(long)]
    pub base: Option<PathBuf>,
}

#[derive(Args)]
pub struct FlattenArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct PayloadsArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}
