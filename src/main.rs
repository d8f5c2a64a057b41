mod cli;
mod engine;
mod logging;
mod repl;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::engine::ast::Value;
use crate::engine::builtins;
use crate::engine::classify::classify;
use crate::engine::env::Environment;
use crate::engine::eval::eval;
use crate::engine::parser::parse_program;

/// Parses and evaluates a whole source unit against `env`, returning the
/// value of the last expression. `None` means the unit held no expressions
/// at all (e.g. only comments).
pub fn evaluate_source(
    source: &str,
    env: Rc<RefCell<Environment>>,
    context: &str,
) -> Result<Option<Value>> {
    let (remaining, data) =
        parse_program(source).map_err(|e| anyhow!("Parse error in {}: {}", context, e))?;
    if !remaining.trim().is_empty() {
        return Err(anyhow!(
            "Parse error in {}: unexpected trailing input: {}",
            context,
            remaining.trim()
        ));
    }

    let mut last = None;
    for datum in &data {
        let expr =
            classify(datum).with_context(|| format!("While classifying input from {}", context))?;
        let value = eval(&expr, Rc::clone(&env))
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("While evaluating input from {}", context))?;
        last = Some(value);
    }
    Ok(last)
}

#[tracing::instrument]
fn main() -> Result<()> {
    logging::init_logging();
    info!("Starting Scheme interpreter");

    let cli = Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    // The global frame is an explicit value owned here and passed by handle
    // into every top-level evaluation.
    let env = builtins::setup_environment();

    match cli.command {
        Commands::Run(args) => {
            let (source, origin) = match (args.expr, args.file) {
                (Some(expr), _) => (expr, "--expr".to_string()),
                (None, Some(file)) => {
                    let source = fs::read_to_string(&file)
                        .with_context(|| format!("Failed to read {}", file.display()))?;
                    (source, file.display().to_string())
                }
                (None, None) => return Err(anyhow!("No expression or file provided")),
            };
            if let Some(value) = evaluate_source(&source, env, &origin)? {
                if value != Value::Unspecified {
                    println!("{}", value);
                }
            }
        }
        Commands::Repl => repl::start_repl(env)?,
    }

    info!("Scheme interpreter finished");
    Ok(())
}
