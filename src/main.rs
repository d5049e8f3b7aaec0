//! Command-line interface for plistconv

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::Write;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use plistconv::loaders::Loader;
#[cfg(feature = "cli")]
use plistconv::{convert, ConvertConfig, Target};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "plist")]
#[command(author, version, about = "Convert Apple's Property Lists into JSON or YAML", long_about = None)]
struct Cli {
    /// Input plist file (reads piped standard input when omitted)
    #[arg(short, long, global = true, value_name = "FILE")]
    input: Option<PathBuf>,

    /// One-to-one translation that keeps every plist type tag
    #[arg(short = 'x', long, global = true)]
    high_fidelity: bool,

    /// Reject unrecognized elements and malformed dictionaries
    #[arg(long, global = true)]
    strict: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log conversion details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a plist into JSON
    Json {
        /// Pretty print (indent) the output
        #[arg(short = 'p', long = "pretty-print")]
        pretty: bool,
    },

    /// Convert a plist into YAML
    Yaml,
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> plistconv::Result<()> {
    let (target, pretty) = match cli.command {
        Commands::Json { pretty } => (Target::Json, pretty),
        Commands::Yaml => (Target::Yaml, false),
    };

    let config = ConvertConfig::new(target)
        .with_high_fidelity(cli.high_fidelity)
        .with_pretty(pretty)
        .with_strict(cli.strict);

    let input = Loader::new()
        .with_limits(*config.limits())
        .load(cli.input.as_deref())?;

    let mut output = convert(&input, &config)?;
    if !output.ends_with(b"\n") {
        output.push(b'\n');
    }

    if let Some(path) = cli.output {
        log::debug!("writing {} bytes to {}", output.len(), path.display());
        fs::write(path, &output)?;
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(&output)?;
        handle.flush()?;
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
