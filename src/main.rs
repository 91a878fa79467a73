//! rspec-profile - Main entry point
//!
//! Binds profile parameters and prints the request RSpec for the control
//! plane. Logs go to stderr; stdout carries only the document.

use anyhow::{Context, Result};
use std::fs;
use std::io::{stdout, BufWriter};
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use rspec_profile::bindings_file::BindingsFile;
use rspec_profile::cli::{Cli, Commands, GenerateArgs};
use rspec_profile::generator::Generator;
use rspec_profile::params::ParameterBindings;
use rspec_profile::rspec;

/// Initialize the logger with appropriate settings
fn init_logger(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // RUST_LOG takes precedence over -v
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    let result = match cli.command {
        Some(Commands::Generate(args)) => run_generate(&args),
        Some(Commands::Params) => run_params(),
        Some(Commands::Validate { bindings }) => run_validate(&bindings),
        None => {
            info!("No command specified, generating with defaults");
            run_generate(&GenerateArgs::default())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

/// Collect overrides: bindings file first, then --param pairs
fn collect_bindings(args: &GenerateArgs) -> Result<ParameterBindings> {
    let mut bindings = ParameterBindings::new();
    if let Some(path) = &args.bindings {
        info!("Loading bindings from: {:?}", path);
        BindingsFile::load_from_file(path)?.apply_to(&mut bindings);
    }
    for pair in &args.params {
        bindings.push_pair(pair)?;
    }
    Ok(bindings)
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let bindings = collect_bindings(args)?;
    let generator = Generator::new();

    let bound = match &args.output {
        Some(path) => {
            // Render before creating the file so a binding failure leaves no output behind
            let (bound, doc) = generator.build(&bindings)?;
            let rendered = rspec::render(&doc, args.format)?;
            fs::write(path, format!("{}\n", rendered))
                .with_context(|| format!("Failed to write request to {:?}", path))?;
            info!("Request written to {:?}", path);
            bound
        }
        None => {
            let mut out = BufWriter::new(stdout().lock());
            generator.generate_to(&bindings, args.format, &mut out)?
        }
    };

    if let Some(path) = &args.save_bindings {
        BindingsFile::from(&bound).save_to_file(path)?;
        info!("Bindings saved to {:?}", path);
    }

    Ok(())
}

fn run_params() -> Result<()> {
    println!("{}", Generator::new().parameters().to_json()?);
    Ok(())
}

fn run_validate(path: &Path) -> Result<()> {
    info!("Validating bindings file: {:?}", path);
    let file = BindingsFile::load_from_file(path)?;
    let mut bindings = ParameterBindings::new();
    file.apply_to(&mut bindings);

    let bound = Generator::new().parameters().bind(&bindings)?;
    debug!("Bound parameters: {:?}", bound);
    println!("✓ Bindings file is valid: {}", path.display());
    Ok(())
}
