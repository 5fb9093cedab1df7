//! Modelgen Command-Line Client
//!
//! Resolves a type definition snapshot into generator models and prints them.

mod error;
mod formatter;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use error::CliError;
use formatter::OutputFormat;
use modelgen_core::{GeneratorConfig, GeneratorOptions, ModelGenerator, TypeDefSnapshot};
use std::path::PathBuf;

fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(4)
        .max(1)
}

/// Modelgen Command-Line Client
#[derive(Parser, Debug)]
#[command(name = "modelgen")]
#[command(version, about = "Resolve catalog type definitions into generator models")]
pub struct Args {
    /// Type definition snapshot (JSON)
    #[arg(short = 't', long)]
    pub typedefs: PathBuf,

    /// Generator configuration (JSON)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "json", value_enum)]
    pub format: OutputFormat,

    /// Fail when more diagnostics than this are recorded
    #[arg(long)]
    pub max_warnings: Option<usize>,

    /// Worker threads for entity resolution (0 = available cores)
    #[arg(short = 'w', long, default_value_t = 1)]
    pub workers: usize,

    /// Print diagnostics after the models
    #[arg(long)]
    pub diagnostics: bool,

    /// Print only the fingerprint of the resolved models
    #[arg(long)]
    pub fingerprint: bool,
}

impl Args {
    /// Execution options derived from the flags.
    pub fn generator_options(&self) -> GeneratorOptions {
        let workers = match self.workers {
            0 => available_workers(),
            n => n,
        };
        GeneratorOptions::default().with_workers(workers)
    }

    /// Load the configuration file, or the defaults if none was given.
    pub fn load_config(&self) -> Result<GeneratorConfig, CliError> {
        match &self.config {
            Some(path) => Ok(GeneratorConfig::from_path(path)?),
            None => Ok(GeneratorConfig::default()),
        }
    }
}

fn main() {
    // Logs go to stderr so stdout carries only the output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("modelgen=info")),
        )
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<String, CliError> {
    let config = args.load_config()?;
    let snapshot = TypeDefSnapshot::from_path(&args.typedefs)?;
    tracing::info!(
        typedefs = %args.typedefs.display(),
        definitions = snapshot.len(),
        "snapshot loaded"
    );

    let models = ModelGenerator::new(config)
        .with_options(args.generator_options())
        .generate(&snapshot);

    if let Some(limit) = args.max_warnings {
        let count = models.warning_count();
        if count > limit {
            return Err(CliError::TooManyWarnings { count, limit });
        }
    }

    if args.fingerprint {
        return Ok(models.fingerprint()?);
    }

    let formatter = formatter::create_formatter(args.format);
    let mut output = formatter.format_models(&models);
    if args.diagnostics {
        output.push('\n');
        output.push_str(&formatter.format_diagnostics(&models.diagnostics));
    }
    Ok(output)
}
