//! Droidgraph Harness CLI
//!
//! # Usage
//!
//! ```bash
//! # Driver procedure as JSON on stdout
//! droidgraph-harness synthesize --facts app-facts.yaml
//!
//! # Java harness + stubs sources under out/
//! droidgraph-harness synthesize --facts app-facts.yaml --format java --out out/
//!
//! # Lifecycle protocols in canonical order
//! droidgraph-harness protocols --kind activity
//! ```
//!
//! Log level follows `RUST_LOG` (default `info`), written to stderr.

use clap::{Parser, Subcommand, ValueEnum};
use droidgraph_harness::config::{HarnessConfig, Preset, ValidatedConfig};
use droidgraph_harness::features::driver::{DriverSynthesizer, JavaHarnessEmitter, Severity};
use droidgraph_harness::{ComponentKind, FactsDocument};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "droidgraph-harness")]
#[command(about = "Synthesize an analysis entry point for an Android app from its declared facts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize the driver procedure
    Synthesize {
        /// Facts document (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        facts: PathBuf,

        /// Harness configuration (YAML, schema v1)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Preset used when no configuration file is given
        #[arg(short, long, default_value = "balanced")]
        preset: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output directory (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print lifecycle protocols in canonical order
    Protocols {
        /// Component kind (all kinds when omitted)
        #[arg(short, long)]
        kind: Option<String>,

        /// Harness configuration with custom protocols
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Java,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Synthesize {
            facts,
            config,
            preset,
            format,
            out,
        } => {
            let config = load_config(config, &preset)?;
            synthesize(facts, config, format, out)?;
        }
        Commands::Protocols { kind, config } => {
            let config = load_config(config, "balanced")?;
            print_protocols(&config, kind.as_deref())?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>, preset: &str) -> Result<ValidatedConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => HarnessConfig::from_yaml(path)?,
        None => HarnessConfig::preset(Preset::from_str(preset)?).build()?,
    };
    eprintln!("config: {}", config.describe());
    Ok(config)
}

fn synthesize(
    facts: PathBuf,
    config: ValidatedConfig,
    format: Format,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = FactsDocument::from_path(&facts)?;
    let emitter = JavaHarnessEmitter::new(config.emit().clone());
    let procedure = DriverSynthesizer::new(config).synthesize_facts(&document);

    for diagnostic in procedure.diagnostics() {
        if diagnostic.severity == Severity::Warning {
            eprintln!("{}", diagnostic);
        }
    }

    match (format, out) {
        (Format::Json, None) => println!("{}", emitter.emit_json(&procedure)?),
        (Format::Json, Some(dir)) => {
            std::fs::create_dir_all(&dir)?;
            let path = dir.join(format!("{}.json", procedure.name()));
            std::fs::write(&path, emitter.emit_json(&procedure)?)?;
            eprintln!("wrote {}", path.display());
        }
        (Format::Java, None) => {
            println!("{}", emitter.emit_stubs(&procedure));
            println!("{}", emitter.emit_harness(&procedure));
        }
        (Format::Java, Some(dir)) => {
            for path in emitter.write_sources(&procedure, &dir)? {
                eprintln!("wrote {}", path.display());
            }
        }
    }

    eprintln!(
        "{} steps over {} stand-ins ({} degraded)",
        procedure.step_count(),
        procedure.allocations().len(),
        procedure.degradations().len()
    );
    Ok(())
}

fn print_protocols(config: &ValidatedConfig, kind: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let kinds = match kind {
        Some(kind) => vec![ComponentKind::from_str(kind)?],
        None => ComponentKind::ALL.to_vec(),
    };

    for kind in kinds {
        println!("{}:", kind);
        for step in config.protocols().get(kind).canonical_order() {
            println!("  {:<10} {}", step.phase.as_str(), step.method);
        }
    }
    Ok(())
}
