//! Command-line argument definitions for the agx CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, output format,
//! validation, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the agx architecture graph tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input agx file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (xml, text); overrides the configuration file
    #[arg(short, long)]
    pub format: Option<String>,

    /// Build the graph even if semantic validation would fail
    #[arg(long)]
    pub no_validate: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
