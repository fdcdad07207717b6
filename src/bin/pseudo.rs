//! Command-line driver for the pseudoflow maximum flow solver.
//!
//! ```text
//! $ pseudo input.max                 # read a file, write results to stdout
//! $ cat input.max | pseudo           # read stdin
//! $ pseudo -o result.txt a.max b.max # successive runs into one file
//! ```

use anyhow::{Context as _, Result};
use clap::Parser;
use pseudoflow::dimacs;
use pseudoflow::Config;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "pseudo")]
#[command(about = "Maximum s-t flow via Hochbaum's pseudoflow algorithm", long_about = None)]
#[command(version)]
struct Cli {
    /// DIMACS input files; stdin when none are given
    files: Vec<PathBuf>,

    /// Write results to the named file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Select the lowest-label variant (default: highest label)
    #[arg(long)]
    lowest_label: bool,

    /// Use FIFO buckets (default: LIFO)
    #[arg(long)]
    fifo_buckets: bool,

    /// Report the min-cut source set instead of arc flows
    #[arg(long)]
    display_cut: bool,

    /// Print solver statistics as JSON to stderr after each run
    #[arg(long)]
    stats: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_env_filter("pseudo=debug,pseudoflow=debug")
            .with_writer(io::stderr)
            .init();
    }

    let config = Config {
        lowest_label: cli.lowest_label,
        fifo_buckets: cli.fifo_buckets,
        display_cut: cli.display_cut,
    };

    let mut out: Box<dyn Write> = match cli.output.as_ref() {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("unable to open output file: {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let inputs: Vec<Option<PathBuf>> = if cli.files.is_empty() {
        vec![None]
    } else {
        cli.files.iter().cloned().map(Some).collect()
    };

    let mut failed = false;
    for (i, input) in inputs.iter().enumerate() {
        if let Err(e) = run_one(input.as_deref(), &mut out, config, cli.stats) {
            eprintln!("ERROR - processing input: {}, error: {e:#}", describe(input.as_deref()));
            failed = true;
        }
        if i != inputs.len() - 1 {
            writeln!(out)?; // separate runs with a blank line
        }
    }
    out.flush()?;

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

fn run_one<W: Write>(input: Option<&Path>, out: &mut W, config: Config, stats: bool) -> Result<()> {
    let header = format!("Data: {}", describe(input));
    let solver = match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("unable to open input file: {}", path.display()))?;
            dimacs::run(BufReader::new(file), out, config, Some(&header))?
        }
        None => dimacs::run(io::stdin().lock(), out, config, Some(&header))?,
    };

    debug!(stats = %solver.stats_json(), times = %solver.times_json(), "run complete");
    if stats {
        eprintln!("{}", solver.stats_json());
    }
    Ok(())
}

fn describe(input: Option<&Path>) -> String {
    match input {
        Some(path) => path.display().to_string(),
        None => "stdin".to_string(),
    }
}
