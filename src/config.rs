//! # Configuration Module
//!
//! Service configuration comes from three layers, later ones winning:
//!
//! 1. Built-in defaults ([`ServiceConfig::default`])
//! 2. An optional YAML file ([`ServiceConfig::load`])
//! 3. Environment variables ([`ServiceConfig::apply_env`])
//!
//! Command-line flags are applied on top by the CLI.
//!
//! ## YAML Layout
//!
//! ```yaml
//! http:
//!   host: 0.0.0.0
//!   port: 8080
//! validation:
//!   responses: warn        # off | warn | enforce
//! seed:
//!   - { id: "1", name: "Item One" }
//! ```
//!
//! ## Environment Variables
//!
//! - `ITEMS_HOST`, `ITEMS_PORT`: listen address overrides
//! - `ITEMS_STACK_SIZE`: coroutine stack size, decimal or `0x` hex (default `0x8000`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::model::Item;
use crate::validator::ResponseValidation;

const DEFAULT_STACK_SIZE: usize = 0x8000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// How outgoing bodies are checked against their contracts
    pub responses: ResponseValidation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub http: HttpConfig,
    pub validation: ValidationConfig,
    /// Items loaded into the store at startup, in order
    pub seed: Vec<Item>,
}

impl ServiceConfig {
    /// Read a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// # Errors
    ///
    /// Fails on malformed YAML or unknown enum values.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `ITEMS_HOST` / `ITEMS_PORT` from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `ITEMS_PORT` is not a valid port number.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Fails when `ITEMS_PORT` is not a valid port number.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("ITEMS_HOST") {
            self.http.host = host;
        }
        if let Some(port) = lookup("ITEMS_PORT") {
            self.http.port = port
                .trim()
                .parse()
                .with_context(|| format!("ITEMS_PORT '{port}' is not a valid port"))?;
        }
        Ok(())
    }

    /// `host:port` for binding.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = env::var("ITEMS_STACK_SIZE")
            .ok()
            .and_then(|v| parse_stack_size(&v))
            .unwrap_or(DEFAULT_STACK_SIZE);
        RuntimeConfig { stack_size }
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal size.
#[must_use]
pub fn parse_stack_size(value: &str) -> Option<usize> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        value.parse().ok()
    }
}
