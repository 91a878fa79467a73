use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::types::OutputFormat;

/// Request RSpec generator for a single r7525 GPU node at CloudLab Clemson
#[derive(Parser)]
#[command(name = "rspec-profile")]
#[command(about = "Generate the request RSpec for an r7525 GPU node")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bind parameters and print the request document
    Generate(GenerateArgs),
    /// Print the parameter declarations as JSON
    Params,
    /// Check that a bindings file binds cleanly
    Validate {
        /// Path to bindings file to validate
        bindings: PathBuf,
    },
}

#[derive(Args, Default)]
pub struct GenerateArgs {
    /// Override a parameter (e.g. --param runSetup=false). Repeatable.
    #[arg(short, long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// JSON bindings file, applied before --param overrides
    #[arg(short, long)]
    pub bindings: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Xml)]
    pub format: OutputFormat,

    /// Write the document to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the effective bindings to a file after generating
    #[arg(long)]
    pub save_bindings: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
