use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// A small Scheme interpreter written in Rust.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(name = "rusche", bin_name = "rusche")]
#[clap(subcommand_required = true, arg_required_else_help = true)] // Ensures a subcommand is given, or help is printed.
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluates a Scheme expression from a string or executes a source file.
    Run(RunArgs),
    /// Starts an interactive read-evaluate-print loop.
    Repl,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scheme expression string to evaluate.
    #[clap(short, long, value_name = "SCHEME_CODE", conflicts_with = "file")]
    pub expr: Option<String>,

    /// Path to a Scheme source file to execute.
    #[clap(value_name = "FILE_PATH", conflicts_with = "expr", required_unless_present = "expr")]
    pub file: Option<PathBuf>,
}
