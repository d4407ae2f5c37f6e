//! Command dispatcher.
//!
//! The dispatcher owns the command table and is the only place a command
//! name becomes a runnable task. It knows nothing about individual
//! backends: every command is a [`CommandSpec`] from the registry, so a new
//! backend is picked up without touching this module.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

use vdbbench_clients::{registry, CommandSpec, Operation, TaskConfig};
use vdbbench_core::{DeclarationError, RawParams};

use crate::config::ConfigFile;
use crate::driver::{drops_old, Driver};
use crate::error::{Error, Result};
use crate::summary::RunSummary;

/// What a dispatched command produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// `--dry-run`: the resolved task, nothing was contacted
    DryRun(TaskConfig),
    /// A finished run
    Completed(RunSummary),
}

/// Resolves commands and hands them to a driver.
#[derive(Debug)]
pub struct Dispatcher {
    commands: Vec<CommandSpec>,
}

impl Dispatcher {
    /// Build a dispatcher over `commands`.
    ///
    /// Fails if two commands share a name.
    pub fn new(commands: Vec<CommandSpec>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for command in &commands {
            if !seen.insert(command.name()) {
                return Err(DeclarationError::DuplicateCommand {
                    name: command.name().to_string(),
                }
                .into());
            }
        }
        Ok(Self { commands })
    }

    /// A dispatcher over every registered backend command.
    pub fn from_registry() -> Result<Self> {
        Self::new(registry::commands()?)
    }

    /// All commands, in registration order
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Look up a command by name
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name() == name)
    }

    /// Load a config file whose tables must all name known commands.
    pub fn load_config(&self, path: &str) -> Result<ConfigFile> {
        let config = ConfigFile::load(path)?;
        if let Some(unknown) = config
            .command_tables()
            .find(|table| self.command(table).is_none())
        {
            return Err(Error::ConfigFile {
                path: config.path().to_string(),
                reason: format!("[{}] does not name a command", unknown),
            });
        }
        Ok(config)
    }

    /// Turn a command and its raw values into a validated task.
    ///
    /// Everything that can be checked without a network call is checked
    /// here: option types and ranges, the search parameter of the index
    /// type, and the capabilities the requested stages need.
    pub fn resolve(&self, name: &str, raw: &RawParams) -> Result<TaskConfig> {
        let command = self.command(name).ok_or_else(|| Error::UnknownCommand {
            name: name.to_string(),
        })?;
        let task = command.resolve(raw)?;
        task.validate()?;

        let common = &task.common;
        let capabilities = task.capabilities();
        if drops_old(&task) {
            capabilities.require(task.db, Operation::DropOld)?;
        }
        if common.case_type.is_filtered() && (common.search_serial || common.search_concurrent) {
            capabilities.require(task.db, Operation::FilteredSearch)?;
        }

        debug!("Resolved {} for {} ({})", name, task.db, task.index_type);
        Ok(task)
    }

    /// Resolve and run a command.
    pub fn dispatch(&self, name: &str, raw: &RawParams, driver: &dyn Driver) -> Result<Outcome> {
        let task = self.resolve(name, raw)?;

        // Secrets serialize masked
        let rendered = serde_json::to_string(&task).unwrap_or_default();
        info!("Task {}: {}", task.run_id, rendered);

        if task.common.dry_run {
            return Ok(Outcome::DryRun(task));
        }
        let summary = driver.run(&task)?;
        Ok(Outcome::Completed(summary))
    }
}
