use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ffiweave::{handle_generate, handle_resolve, CliConfig, Overrides};

#[derive(Parser)]
#[command(name = "ffiweave")]
#[command(about = "Generate Dart FFI bindings from binding descriptions", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Dart source file from a description
    Generate {
        /// Description file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output Dart file
        #[arg(short, long)]
        output: PathBuf,

        /// Config file (defaults to ./ffiweave.toml when present)
        #[arg(short, long, env = "FFIWEAVE_CONFIG")]
        config: Option<PathBuf>,

        /// Preamble text placed at the top of the file
        #[arg(long)]
        preamble: Option<String>,

        /// Library identifier
        #[arg(long)]
        library: Option<String>,

        /// Generate a part file of the given library
        #[arg(long)]
        part_of: Option<String>,

        /// Additional `part` directive (repeatable)
        #[arg(long = "part")]
        parts: Vec<String>,

        /// Append a generation timestamp to the preamble
        #[arg(long)]
        timestamp: bool,
    },

    /// Show how type names resolve; lists the type table when none are given
    Resolve {
        /// Type names, e.g. int32 or "*uint8"
        types: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug) // Show target module in debug mode
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            preamble,
            library,
            part_of,
            parts,
            timestamp,
        } => {
            let config = CliConfig::load(config.as_deref())?;
            let overrides = Overrides {
                preamble,
                library,
                part_of,
                parts,
                timestamp,
            };
            handle_generate(&input, &output, &config, &overrides)
        }
        Commands::Resolve { types } => {
            print!("{}", handle_resolve(&types)?);
            Ok(())
        }
    }
}
