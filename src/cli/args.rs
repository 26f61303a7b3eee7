//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::branch::BranchCommands;
use crate::cli::commands::case::CaseCommands;
use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::export::ExportArgs;
use crate::cli::commands::graph::GraphArgs;
use crate::cli::commands::step::StepCommands;

/// Test Case Flow - author test cases, then export diagrams, spreadsheets, outlines and reports
#[derive(Parser, Debug)]
#[command(name = "tcf", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Case store file (overrides TCF_STORE and the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Table for lists, pretty text for single items
    #[default]
    Auto,
    /// Bordered table
    Table,
    /// Tab-separated values
    Tsv,
    Yaml,
    Json,
    /// Case ids only
    Id,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, list, show and delete test cases
    #[command(subcommand)]
    Case(CaseCommands),

    /// Add, change and remove steps of a test case
    #[command(subcommand)]
    Step(StepCommands),

    /// Add and remove conditional branches between steps
    #[command(subcommand)]
    Branch(BranchCommands),

    /// Export the collection (table, outline, report, graph)
    Export(ExportArgs),

    /// Print the flow graph of one test case
    Graph(GraphArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
