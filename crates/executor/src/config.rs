//! TOML config file.
//!
//! ```toml
//! [common]
//! case_type = "Performance1536D500K"
//! num_concurrency = [1, 8, 32]
//!
//! [LanceDBServerIVFPQ]
//! uri = "http://lance:8000"
//! nprobes = 20
//! ```
//!
//! `[common]` applies to every command and may only hold common options.
//! A table named after a command overrides it. Values supplied on the
//! command line override both. Keys may use `snake_case` or `kebab-case`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use vdbbench_core::{ConfigError, ParamSet, RawParams, COMMON_PARAMS};

use crate::error::{Error, Result};

const COMMON_TABLE: &str = "common";

/// A parsed config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    path: String,
    common: RawParams,
    commands: BTreeMap<String, RawParams>,
}

impl ConfigFile {
    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| Error::ConfigFile {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        Self::parse(&display, &text)
    }

    /// Parse config text. `path` is only used in messages.
    pub fn parse(path: &str, text: &str) -> Result<Self> {
        let file_error = |reason: String| Error::ConfigFile {
            path: path.to_string(),
            reason,
        };

        let root: toml::Table = toml::from_str(text).map_err(|e| file_error(e.to_string()))?;

        let mut config = ConfigFile {
            path: path.to_string(),
            ..ConfigFile::default()
        };
        for (name, value) in root {
            let toml::Value::Table(table) = value else {
                return Err(file_error(format!("top-level key {} must be a table", name)));
            };
            let raw = stringify_table(&name, table).map_err(file_error)?;
            if name == COMMON_TABLE {
                config.common = raw;
            } else {
                config.commands.insert(name, raw);
            }
        }

        // [common] may not smuggle in backend options
        let common = ParamSet::compose(&[&COMMON_PARAMS])?;
        if let Some(unknown) = config.common.keys().find(|key| common.get(key).is_none()) {
            return Err(ConfigError::UnknownOption {
                option: vdbbench_core::params::flag(unknown),
            }
            .into());
        }

        debug!(
            "Loaded config file {} with {} command tables",
            path,
            config.commands.len()
        );
        Ok(config)
    }

    /// Source path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Command tables present in the file
    pub fn command_tables(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Values for `command`: `[common]`, then its table, then `cli`.
    pub fn merge(&self, command: &str, cli: &RawParams) -> RawParams {
        let mut raw = self.common.clone();
        if let Some(table) = self.commands.get(command) {
            raw.extend(table.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        raw.extend(cli.iter().map(|(k, v)| (k.clone(), v.clone())));
        raw
    }
}

fn stringify_table(
    table_name: &str,
    table: toml::Table,
) -> std::result::Result<RawParams, String> {
    table
        .into_iter()
        .map(|(key, value)| {
            let name = key.replace('-', "_");
            let raw = stringify(&value).ok_or_else(|| {
                format!(
                    "[{}] {}: expected a string, integer, boolean or array",
                    table_name, key
                )
            })?;
            Ok((name, raw))
        })
        .collect()
}

fn stringify(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                toml::Value::Array(_) | toml::Value::Table(_) => None,
                scalar => stringify(scalar),
            })
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(",")),
        toml::Value::Float(_) | toml::Value::Datetime(_) | toml::Value::Table(_) => None,
    }
}
