// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// parsolve: resolve the parameters of a task.
///
/// Reads the task's interface file, takes values from the command line,
/// fills in the rest from saved values, defaults or prompts, and prints the
/// resolved values.
///
/// Command-line syntax:
/// - `KEYWORD=value` sets a parameter by keyword.
/// - A bare value fills the next free position.
/// - `KEYWORD` / `NOKEYWORD` sets a boolean parameter TRUE / FALSE.
/// - `ACCEPT`, `RESET`, `PROMPT`, `NOPROMPT` change how values are found.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The TOML interface file describing the task's parameters.
    pub interface: PathBuf,

    /// Print the resolved values as JSON.
    #[arg(long)]
    pub json: bool,

    /// Do not save current and global values after resolving.
    #[arg(long)]
    pub no_save: bool,

    /// Directory holding saved values (overrides PARSOLVE_USER).
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Parameter assignments, passed through to the task.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
