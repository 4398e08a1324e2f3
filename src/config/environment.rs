//! Snapshot of environment variables handed to the profile selector
//!
//! Settings never read `std::env` directly; they read an [`Environment`]
//! value, so tests can build one from literal pairs.

use crate::core::{LogLevel, LoggerError, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;

/// Process variables whose name and value are both valid UTF-8
///
/// Other entries cannot name a setting and are skipped.
fn utf8_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current process environment
    pub fn from_process() -> Self {
        Self {
            vars: utf8_vars(std::env::vars_os()),
        }
    }

    /// Variables from a `.env` file, overridden by the process environment.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn from_process_with_dotenv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut vars = HashMap::new();

        if path.exists() {
            let entries = dotenvy::from_path_iter(path).map_err(|e| {
                LoggerError::config(path.display().to_string(), e.to_string())
            })?;
            for entry in entries {
                let (key, value) = entry.map_err(|e| {
                    LoggerError::config(path.display().to_string(), e.to_string())
                })?;
                vars.insert(key, value);
            }
        }
        vars.extend(utf8_vars(std::env::vars_os()));

        Ok(Self { vars })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Value of `key`; empty values count as unset
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// First of `keys` that is set, else the first of `keys`
    ///
    /// Lets a setting be read under its current name or a legacy alias.
    pub fn first_set<'k>(&self, keys: &[&'k str]) -> &'k str {
        keys.iter()
            .copied()
            .find(|key| self.get(key).is_some())
            .or_else(|| keys.first().copied())
            .unwrap_or_default()
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| LoggerError::missing_setting(key))
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn bool(&self, key: &str, default: bool) -> Result<bool> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(LoggerError::config(
                key,
                format!("expected a boolean, found '{}'", value),
            )),
        }
    }

    /// Comma-separated list, blanks dropped
    pub fn list(&self, key: &str, default: &[&str]) -> Vec<String> {
        match self.get(key) {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect(),
            None => default.iter().map(|item| item.to_string()).collect(),
        }
    }

    pub fn level(&self, key: &str, default: LogLevel) -> Result<LogLevel> {
        match self.get(key) {
            Some(value) => value
                .parse()
                .map_err(|_| LoggerError::unknown_level(key, value)),
            None => Ok(default),
        }
    }
}
