//! clap command tree, generated from the command declarations.
//!
//! Every [`CommandSpec`] becomes a subcommand and every declared option a
//! long flag, grouped under the name of the group that declared it. No clap
//! defaults are set: defaults belong to the declarations and are applied
//! after the config file is merged, so an option is only forwarded when it
//! was actually typed.

use clap::{Arg, ArgAction, Command};

use vdbbench_clients::CommandSpec;
use vdbbench_core::{ParamDefault, ParamKind, ParamSpec};
use vdbbench_executor::Dispatcher;

/// Build the full command tree.
pub fn build_cli(dispatcher: &Dispatcher) -> Command {
    let mut cli = Command::new("vdbbench")
        .about("Benchmark vector databases through one uniform contract")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config-file")
                .long("config-file")
                .value_name("PATH")
                .global(true)
                .help("TOML file supplying option values"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print results as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level (RUST_LOG overrides)"),
        )
        .subcommand(Command::new("list").about("List every command and its options"));

    for spec in dispatcher.commands() {
        cli = cli.subcommand(command_for(spec));
    }
    cli
}

fn command_for(spec: &CommandSpec) -> Command {
    spec.params().iter().fold(
        Command::new(spec.name()).about(spec.about()),
        |cmd, param| {
            let group = spec.params().group_of(param.name).unwrap_or("Options");
            cmd.arg(arg_for(param).help_heading(group))
        },
    )
}

fn arg_for(param: &ParamSpec) -> Arg {
    let arg = Arg::new(param.name)
        .long(param.flag_name())
        .help(help_text(param));
    match param.kind {
        ParamKind::Flag => arg.action(ArgAction::SetTrue),
        kind => arg
            .value_name(kind.name().to_uppercase())
            .action(ArgAction::Set),
    }
}

/// Help line with the declared default or the required marker.
pub fn help_text(param: &ParamSpec) -> String {
    match (param.required, param.default) {
        (true, _) => format!("{} (required)", param.help),
        (false, Some(ParamDefault::Str(""))) => param.help.to_string(),
        (false, Some(default)) if param.kind != ParamKind::Flag => {
            format!("{} [default: {}]", param.help, default)
        }
        _ => param.help.to_string(),
    }
}
