//! ArgMatches → CliAction conversion.
//!
//! Only options typed on the command line end up in the raw values; the
//! config file and the declared defaults fill in the rest later.

use clap::parser::ValueSource;
use clap::ArgMatches;

use vdbbench_clients::CommandSpec;
use vdbbench_core::RawParams;
use vdbbench_executor::Dispatcher;

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// Print the command table
    List,
    /// Run one command
    Run {
        command: String,
        values: RawParams,
        config_file: Option<String>,
    },
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(
    matches: &ArgMatches,
    dispatcher: &Dispatcher,
) -> Result<CliAction, String> {
    let (sub_name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    if sub_name == "list" {
        return Ok(CliAction::List);
    }

    let spec = dispatcher
        .command(sub_name)
        .ok_or_else(|| format!("Unknown command: {}", sub_name))?;
    Ok(CliAction::Run {
        command: sub_name.to_string(),
        values: raw_params(spec, sub_matches),
        config_file: sub_matches.get_one::<String>("config-file").cloned(),
    })
}

/// Options of `spec` that were typed on the command line.
pub fn raw_params(spec: &CommandSpec, matches: &ArgMatches) -> RawParams {
    spec.params()
        .iter()
        .filter(|param| matches.value_source(param.name) == Some(ValueSource::CommandLine))
        .filter_map(|param| {
            let value = if param.kind.takes_value() {
                matches.get_one::<String>(param.name)?.clone()
            } else {
                "true".to_string()
            };
            Some((param.name.to_string(), value))
        })
        .collect()
}
