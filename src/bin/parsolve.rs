// src/bin/parsolve.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use parsolve::{
    cli::Cli,
    core::{
        config_loader,
        parameter_list::{ListError, ParameterList},
        parameters::ParameterError,
        paths,
        store::FileStore,
        value::{ParameterValue, StatusValue},
    },
    system::terminal::TerminalPrompter,
};

/// The main entry point of the `parsolve` application.
/// It sets up logging, resolves every parameter of the task and performs
/// centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // An abort reply ends the task quietly with its own exit code.
        if let Some(ListError::Parameter(ParameterError::Aborted { keyword })) =
            e.downcast_ref::<ListError>()
        {
            eprintln!("{} {}", "Aborted by parameter".yellow(), keyword.bold());
            std::process::exit(2);
        }

        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let store_dir = match &cli.store {
        Some(dir) => {
            paths::ensure_dir(dir)?;
            dir.clone()
        }
        None => paths::get_store_dir()?,
    };

    let mut list = config_loader::load_list(&cli.interface, Box::new(TerminalPrompter))?
        .with_stores(
            Box::new(FileStore::new(paths::current_dir(&store_dir))),
            Box::new(FileStore::new(paths::global_dir(&store_dir))),
        );
    list.load_current_values();

    // Command-line mistakes are reported but do not stop the task; the
    // affected parameters are prompted for instead.
    if let Err(e) = list.parse_command_line(&cli.args) {
        for message in e.messages() {
            eprintln!("{} {}", "Warning:".yellow().bold(), message);
        }
    }

    let resolved = resolve_all(&mut list)?;
    list.deactivate(!cli.no_save)?;

    if cli.json {
        let map: serde_json::Map<String, serde_json::Value> = resolved
            .iter()
            .map(|(name, value)| Ok((name.clone(), serde_json::to_value(value)?)))
            .collect::<Result<_, serde_json::Error>>()?;
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else {
        print_values(list.task_name(), &resolved);
    }
    Ok(())
}

/// Obtains a value for every readable parameter, in declaration order.
fn resolve_all(list: &mut ParameterList) -> Result<Vec<(String, ParameterValue)>> {
    let names: Vec<String> = list
        .iter()
        .filter(|p| p.access().is_readable())
        .map(|p| p.name().to_string())
        .collect();

    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let value = match list.get_value(&name) {
            Ok(value) => value,
            Err(ListError::Parameter(ParameterError::NullValue { .. })) => {
                ParameterValue::Status(StatusValue::Null)
            }
            Err(e) => return Err(e.into()),
        };
        resolved.push((name, value));
    }
    Ok(resolved)
}

fn print_values(task: &str, resolved: &[(String, ParameterValue)]) {
    println!("{} {}", "Task".bold(), task.cyan().bold());
    let width = resolved.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in resolved {
        let rendered = match value {
            ParameterValue::Status(_) => value.to_string().dimmed(),
            _ => value.to_string().normal(),
        };
        let padded = format!("{:<width$}", name, width = width);
        println!("  {} = {}", padded.green(), rendered);
    }
}
