//! # CLI Module
//!
//! ## Commands
//!
//! ### `serve`
//!
//! ```bash
//! itemrouter serve --config config/config.yaml --port 8080 --log-level debug
//! ```
//!
//! Options:
//! - `--config <FILE>` - YAML configuration (also `ITEMS_CONFIG`)
//! - `--host <HOST>` / `--port <PORT>` - listen address overrides
//! - `--log-level <LEVEL>` - overrides `ITEMS_LOG_LEVEL`
//!
//! The server runs until SIGINT or SIGTERM.
//!
//! ### `routes`
//!
//! Prints the compiled routing table:
//!
//! ```bash
//! itemrouter routes
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{resolve_config, run_cli, Cli, Commands};
