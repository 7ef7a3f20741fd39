//! The `bc` command-line entry point.
//!
//! Usage: `bc <inputfile.bb> <outputfile.cmd>`. Missing arguments get
//! clap's usage line on stderr; any compilation failure prints a
//! one-line `Error:` message and exits non-zero.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bc_drv::{Config, Session};

/// bc - the bb to Windows Batch compiler
#[derive(Parser, Debug)]
#[command(name = "bc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiles bb source into a Windows Batch script", long_about = None)]
struct Cli {
    /// The bb source file
    #[arg(value_name = "inputfile.bb")]
    input: PathBuf,

    /// The Batch script to produce
    #[arg(value_name = "outputfile.cmd")]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // NO_COLOR set to a non-empty value suppresses ANSI escapes.
    let color = std::env::var_os("NO_COLOR").map_or(true, |value| value.is_empty());

    let session = Session::new(Config {
        input: cli.input,
        output: cli.output,
        color,
    });

    if let Err(error) = session.compile() {
        eprintln!("Error: {:#}", error);
        std::process::exit(1);
    }
}
