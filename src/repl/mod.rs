mod highlighter;
mod history;

use crate::engine::ast::Value;
use crate::engine::env::Environment;
use crate::repl::highlighter::ReplHelper;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};

#[tracing::instrument(skip(env))]
pub fn start_repl(env: Rc<RefCell<Environment>>) -> anyhow::Result<()> {
    info!("Starting REPL session with rustyline");
    let mut rl: Editor<ReplHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ReplHelper::new()));

    let history_path_opt = history::get_history_path();
    if let Some(ref history_path) = history_path_opt {
        history::load_history_from_path(&mut rl, history_path);
    } else {
        warn!("Could not determine history file path. History will not be saved.");
    }

    let mut line_number = 1;
    loop {
        let prompt = format!("scheme ({})> ", line_number);
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    line_number += 1;
                    continue;
                }

                if let Err(err) = rl.add_history_entry(line.as_str()) {
                    warn!("Failed to add line to history: {}", err);
                }

                if trimmed == ".exit" || trimmed == "(exit)" {
                    info!("Exiting REPL session via user command.");
                    println!("Exiting.");
                    break;
                }

                match crate::evaluate_source(trimmed, Rc::clone(&env), "repl") {
                    Ok(Some(value)) if value != Value::Unspecified => {
                        println!("{}", value);
                    }
                    Ok(_) => {
                        // Definitions and comment-only input print nothing.
                    }
                    Err(e) => {
                        // Report and resume; the environment keeps any
                        // definitions made before the failure.
                        eprintln!("Error: {:#}", e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                info!("REPL interrupted (Ctrl-C).");
                println!("Interrupted. Type .exit, (exit), or Ctrl-D to exit.");
            }
            Err(ReadlineError::Eof) => {
                info!("REPL EOF detected (Ctrl-D).");
                println!("Exiting.");
                break;
            }
            Err(err) => {
                eprintln!("REPL readline error: {:?}", err);
                break;
            }
        }
        line_number += 1;
    }

    if let Some(ref history_path) = history_path_opt {
        history::save_history_to_path(&mut rl, history_path);
    }
    Ok(())
}
