//! Parameter declaration layer
//!
//! Options are declared as static data and composed per command:
//!
//! ```text
//! command options = COMMON_PARAMS ∪ <backend connection group> ∪ <index tuning group>
//! ```
//!
//! Composition is a union keyed by option name. Including the same group
//! twice is harmless (diamond-shaped compositions are common), but two
//! distinct groups declaring the same name is a [`DeclarationError`] raised
//! when the command is registered, not when it runs.
//!
//! ## Resolution
//!
//! Surfaces collect raw string values keyed by option name ([`RawParams`]).
//! [`ParamSet::resolve`] parses them by declared kind, fills defaults,
//! enforces required options and rejects names the command never declared,
//! producing a [`ParamBag`]. Typed per-command inputs are then read out of
//! the bag through [`FromParams`].
//!
//! This layer performs no I/O and holds no backend logic.

mod bag;
pub mod common;

pub use bag::{ParamBag, ParamValue};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ConfigError, DeclarationError};

/// Raw option values as supplied by a surface, keyed by option name.
pub type RawParams = BTreeMap<String, String>;

/// Semantic type of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamKind {
    /// Free text
    Str,
    /// Signed integer
    Int,
    /// Boolean taking an explicit value (`--load false`)
    Bool,
    /// Boolean switched on by presence (`--dry-run`)
    Flag,
    /// Credential; stored as a [`crate::Secret`]
    Secret,
}

impl ParamKind {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ParamKind::Str => "string",
            ParamKind::Int => "integer",
            ParamKind::Bool => "boolean",
            ParamKind::Flag => "flag",
            ParamKind::Secret => "secret",
        }
    }

    /// Whether the option consumes a value on the command line
    pub fn takes_value(&self) -> bool {
        !matches!(self, ParamKind::Flag)
    }
}

/// Declared default of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamDefault {
    /// Text default
    Str(&'static str),
    /// Integer default
    Int(i64),
    /// Boolean default
    Bool(bool),
}

impl fmt::Display for ParamDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamDefault::Str(s) => f.write_str(s),
            ParamDefault::Int(i) => write!(f, "{}", i),
            ParamDefault::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A single declared option.
///
/// `name` is the snake_case key used in config files and typed inputs; the
/// command-line spelling is derived by [`ParamSpec::long_flag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    /// Option key
    pub name: &'static str,
    /// Semantic type
    pub kind: ParamKind,
    /// Default applied when the option is not supplied
    pub default: Option<ParamDefault>,
    /// Whether the option must be supplied
    pub required: bool,
    /// Help text
    pub help: &'static str,
}

impl ParamSpec {
    const fn new(name: &'static str, kind: ParamKind, help: &'static str) -> Self {
        Self {
            name,
            kind,
            default: None,
            required: false,
            help,
        }
    }

    /// Declare a text option
    pub const fn str(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::Str, help)
    }

    /// Declare an integer option
    pub const fn int(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::Int, help)
    }

    /// Declare a boolean option taking a value
    pub const fn bool(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::Bool, help)
    }

    /// Declare a presence flag (defaults to false)
    pub const fn flag(name: &'static str, help: &'static str) -> Self {
        Self {
            default: Some(ParamDefault::Bool(false)),
            ..Self::new(name, ParamKind::Flag, help)
        }
    }

    /// Declare a credential option
    pub const fn secret(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::Secret, help)
    }

    /// Set a text default
    pub const fn default_str(self, value: &'static str) -> Self {
        Self {
            default: Some(ParamDefault::Str(value)),
            ..self
        }
    }

    /// Set an integer default
    pub const fn default_int(self, value: i64) -> Self {
        Self {
            default: Some(ParamDefault::Int(value)),
            ..self
        }
    }

    /// Set a boolean default
    pub const fn default_bool(self, value: bool) -> Self {
        Self {
            default: Some(ParamDefault::Bool(value)),
            ..self
        }
    }

    /// Mark the option as required
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Command-line spelling, without the leading dashes
    pub fn flag_name(&self) -> String {
        self.name.replace('_', "-")
    }

    /// Command-line spelling, with the leading dashes
    pub fn long_flag(&self) -> String {
        flag(self.name)
    }
}

/// `--some-option` for the key `some_option`.
pub fn flag(name: &str) -> String {
    format!("--{}", name.replace('_', "-"))
}

/// A named set of options contributed by one source.
#[derive(Debug, Clone, Copy)]
pub struct ParamGroup {
    /// Group name, shown in collision errors
    pub name: &'static str,
    /// Declared options
    pub params: &'static [ParamSpec],
}

/// The composed, collision-free option set of one command.
#[derive(Debug, Clone)]
pub struct ParamSet {
    specs: Vec<ParamSpec>,
    origins: BTreeMap<&'static str, &'static str>,
}

impl ParamSet {
    /// Union the groups, keyed by option name.
    ///
    /// Declaration order is kept. A group listed twice contributes once;
    /// two different groups under one name are a [`DeclarationError`].
    pub fn compose(groups: &[&'static ParamGroup]) -> Result<Self, DeclarationError> {
        let mut specs = Vec::new();
        let mut origins: BTreeMap<&'static str, &'static str> = BTreeMap::new();
        let mut seen_groups: Vec<&'static ParamGroup> = Vec::new();

        for &group in groups {
            match seen_groups.iter().find(|seen| seen.name == group.name) {
                Some(seen) if seen.params == group.params => continue,
                Some(_) => {
                    return Err(DeclarationError::DuplicateGroup {
                        name: group.name.to_string(),
                    })
                }
                None => seen_groups.push(group),
            }

            for spec in group.params {
                if let Some(&first) = origins.get(spec.name) {
                    return Err(DeclarationError::DuplicateOption {
                        option: spec.flag_name(),
                        first,
                        second: group.name,
                    });
                }
                origins.insert(spec.name, group.name);
                specs.push(*spec);
            }
        }

        Ok(Self { specs, origins })
    }

    /// Options in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ParamSpec> {
        self.specs.iter()
    }

    /// Look up an option by key
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Name of the group that declared an option
    pub fn group_of(&self, name: &str) -> Option<&'static str> {
        self.origins.get(name).copied()
    }

    /// Number of options
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Check if the set declares no options
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Parse raw values into a typed bag.
    ///
    /// Unknown names, unparsable values and missing required options are
    /// all reported as [`ConfigError`]s naming the option.
    pub fn resolve(&self, raw: &RawParams) -> Result<ParamBag, ConfigError> {
        if let Some(unknown) = raw.keys().find(|name| self.get(name).is_none()) {
            return Err(ConfigError::UnknownOption {
                option: flag(unknown),
            });
        }

        let mut bag = ParamBag::default();
        for spec in &self.specs {
            let value = match raw.get(spec.name) {
                Some(supplied) => Some(ParamValue::parse(spec, supplied)?),
                None => spec.default.map(ParamValue::from),
            };
            match value {
                Some(value) => bag.insert(spec.name, value),
                None if spec.required => {
                    return Err(ConfigError::MissingOption {
                        option: spec.long_flag(),
                    })
                }
                None => {}
            }
        }
        Ok(bag)
    }
}

/// Typed input read out of a resolved [`ParamBag`].
///
/// `groups` lists the option groups the type reads; a command built from
/// the type is declared with exactly those groups, so every field maps to a
/// declared option and the bag never carries an option the type ignores.
pub trait FromParams: Sized {
    /// Option groups this input is composed of
    fn groups() -> Vec<&'static ParamGroup>;

    /// Read the typed input
    fn from_params(bag: &ParamBag) -> Result<Self, ConfigError>;
}
