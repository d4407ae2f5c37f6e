//! Resolved parameter values.

use std::collections::BTreeMap;

use super::{flag, ParamDefault, ParamKind, ParamSpec};
use crate::error::ConfigError;
use crate::secret::Secret;

/// A resolved option value
#[derive(Debug, Clone)]
pub enum ParamValue {
    /// Text
    Str(String),
    /// Integer
    Int(i64),
    /// Boolean (also used for flags)
    Bool(bool),
    /// Credential
    Secret(Secret),
}

impl ParamValue {
    /// Parse a raw value according to the declared kind.
    pub(crate) fn parse(spec: &ParamSpec, raw: &str) -> Result<Self, ConfigError> {
        match spec.kind {
            ParamKind::Str => Ok(ParamValue::Str(raw.to_string())),
            ParamKind::Secret => Ok(ParamValue::Secret(Secret::new(raw))),
            ParamKind::Int => raw
                .trim()
                .parse::<i64>()
                .map(ParamValue::Int)
                .map_err(|e| ConfigError::invalid(&spec.long_flag(), raw, e.to_string())),
            ParamKind::Bool | ParamKind::Flag => parse_bool(raw)
                .map(ParamValue::Bool)
                .ok_or_else(|| ConfigError::invalid(&spec.long_flag(), raw, "expected true or false")),
        }
    }
}

impl From<ParamDefault> for ParamValue {
    fn from(default: ParamDefault) -> Self {
        match default {
            ParamDefault::Str(s) => ParamValue::Str(s.to_string()),
            ParamDefault::Int(i) => ParamValue::Int(i),
            ParamDefault::Bool(b) => ParamValue::Bool(b),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Typed values of one command invocation.
///
/// Only produced by [`super::ParamSet::resolve`], so every key is a declared
/// option and every value matches its declared kind. Accessors still check
/// both and report a [`ConfigError`] rather than panicking.
#[derive(Debug, Clone, Default)]
pub struct ParamBag {
    values: BTreeMap<&'static str, ParamValue>,
}

impl ParamBag {
    pub(crate) fn insert(&mut self, name: &'static str, value: ParamValue) {
        self.values.insert(name, value);
    }

    /// Check if an option has a value
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names with a value, in key order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    fn value(&self, name: &str) -> Result<&ParamValue, ConfigError> {
        self.values.get(name).ok_or_else(|| ConfigError::MissingOption {
            option: flag(name),
        })
    }

    fn wrong_type(name: &str, expected: &'static str) -> ConfigError {
        ConfigError::WrongType {
            option: flag(name),
            expected,
        }
    }

    /// A text value
    pub fn str(&self, name: &str) -> Result<&str, ConfigError> {
        match self.value(name)? {
            ParamValue::Str(s) => Ok(s),
            _ => Err(Self::wrong_type(name, "string")),
        }
    }

    /// An integer value
    pub fn int(&self, name: &str) -> Result<i64, ConfigError> {
        match self.value(name)? {
            ParamValue::Int(i) => Ok(*i),
            _ => Err(Self::wrong_type(name, "integer")),
        }
    }

    /// A boolean or flag value
    pub fn bool(&self, name: &str) -> Result<bool, ConfigError> {
        match self.value(name)? {
            ParamValue::Bool(b) => Ok(*b),
            _ => Err(Self::wrong_type(name, "boolean")),
        }
    }

    /// An optional credential
    pub fn secret(&self, name: &str) -> Result<Option<Secret>, ConfigError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(ParamValue::Secret(s)) => Ok(Some(s.clone())),
            Some(_) => Err(Self::wrong_type(name, "secret")),
        }
    }

    /// A required credential
    pub fn required_secret(&self, name: &str) -> Result<Secret, ConfigError> {
        self.secret(name)?.ok_or_else(|| ConfigError::MissingOption {
            option: flag(name),
        })
    }

    /// A non-negative integer that fits in `u32`
    pub fn u32(&self, name: &str) -> Result<u32, ConfigError> {
        let value = self.int(name)?;
        u32::try_from(value).map_err(|_| {
            ConfigError::invalid(&flag(name), value, "must be between 0 and 4294967295")
        })
    }

    /// A non-negative integer that fits in `u16`
    pub fn u16(&self, name: &str) -> Result<u16, ConfigError> {
        let value = self.int(name)?;
        u16::try_from(value)
            .map_err(|_| ConfigError::invalid(&flag(name), value, "must be between 0 and 65535"))
    }

    /// A non-negative integer
    pub fn usize(&self, name: &str) -> Result<usize, ConfigError> {
        let value = self.int(name)?;
        usize::try_from(value)
            .map_err(|_| ConfigError::invalid(&flag(name), value, "must not be negative"))
    }

    /// A strictly positive integer
    pub fn positive(&self, name: &str) -> Result<usize, ConfigError> {
        match self.usize(name)? {
            0 => Err(ConfigError::invalid(&flag(name), 0, "must be positive")),
            n => Ok(n),
        }
    }
}
