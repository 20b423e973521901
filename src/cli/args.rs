//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    calc::CalcArgs, completions::CompletionsArgs, export::ExportArgs, init::InitArgs, item::ItemArgs, list::ListArgs,
    new::NewArgs, schedule::ScheduleArgs, set::SetArgs, tax::TaxArgs, validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "stw")]
#[command(author, version, about = "Stoneworks proposal pricing toolkit")]
#[command(long_about = "Price stone fabrication proposals kept as plain YAML drafts: products, services, subcontracted work, sized items, tax and payment plans.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .stw/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new stoneworks project
    Init(InitArgs),

    /// Create a new proposal draft
    New(NewArgs),

    /// Price a draft
    Calc(CalcArgs),

    /// Change one field of a draft
    Set(SetArgs),

    /// List drafts with their final totals
    List(ListArgs),

    /// Validate drafts
    Validate(ValidateArgs),

    /// Price a single sized item
    Item(ItemArgs),

    /// Split an amount into subtotal and tax
    Tax(TaxArgs),

    /// Preview the payment plan for an amount
    Schedule(ScheduleArgs),

    /// Print the submission payload of a draft as JSON
    Export(ExportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables on a terminal
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
