//! vdbbench CLI: one subcommand per backend command.
//!
//! ```text
//! vdbbench [--config-file PATH] [--json] [--verbose] <COMMAND> [OPTIONS]
//! vdbbench list
//! ```
//!
//! Results go to stdout, logs to stderr. The exit status is the one the
//! error maps to (configuration 2, capability 3, lifecycle 4, backend 1).

mod commands;
mod format;
mod parse;

use std::process;

use tracing_subscriber::EnvFilter;

use vdbbench_executor::{Dispatcher, Error, LifecycleDriver};

use commands::build_cli;
use format::{format_error, format_list, format_outcome, OutputMode};
use parse::{matches_to_action, CliAction};

fn main() {
    let dispatcher = match Dispatcher::from_registry() {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            eprintln!("{}", format_error(&e, OutputMode::Human));
            process::exit(e.exit_code());
        }
    };

    let matches = build_cli(&dispatcher).get_matches();
    let (verbose, json) = match matches.subcommand() {
        Some((_, sub)) => (sub.get_flag("verbose"), sub.get_flag("json")),
        None => (matches.get_flag("verbose"), matches.get_flag("json")),
    };
    init_logging(verbose);

    let mode = if json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let exit_code = match matches_to_action(&matches, &dispatcher) {
        Ok(CliAction::List) => {
            println!("{}", format_list(&dispatcher, mode));
            0
        }
        Ok(CliAction::Run {
            command,
            values,
            config_file,
        }) => match run(&dispatcher, &command, values, config_file.as_deref(), mode) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}", format_error(&e, mode));
                e.exit_code()
            }
        },
        Err(e) => {
            eprintln!("(error) {}", e);
            2
        }
    };
    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(
    dispatcher: &Dispatcher,
    command: &str,
    values: vdbbench_core::RawParams,
    config_file: Option<&str>,
    mode: OutputMode,
) -> Result<(), Error> {
    let values = match config_file {
        Some(path) => dispatcher.load_config(path)?.merge(command, &values),
        None => values,
    };
    let outcome = dispatcher.dispatch(command, &values, &LifecycleDriver::new())?;
    println!("{}", format_outcome(&outcome, mode));
    Ok(())
}
