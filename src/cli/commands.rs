use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::App;
use crate::config::{RuntimeConfig, ServiceConfig};
use crate::logging::{init_logging_with_config, LogConfig};
use crate::router::Router;
use crate::routes::item_routes;
use crate::server::{HttpServer, ServerHandle};

/// Command-line interface for the item service
#[derive(Parser, Debug)]
#[command(name = "itemrouter", version)]
#[command(about = "Item CRUD service over a declarative routing table", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// YAML configuration file
        #[arg(short, long, env = "ITEMS_CONFIG")]
        config: Option<PathBuf>,

        /// Host to bind (overrides config and ITEMS_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config and ITEMS_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Log level: trace/debug/info/warn/error (overrides ITEMS_LOG_LEVEL)
        #[arg(long)]
        log_level: Option<String>,
    },
    /// Print the routing table
    Routes,
}

/// Merge the configuration layers: file (or defaults), environment, then flags.
///
/// # Errors
///
/// Fails when the file cannot be loaded or an environment override is invalid.
pub fn resolve_config(
    path: Option<&Path>,
    host: Option<&str>,
    port: Option<u16>,
) -> anyhow::Result<ServiceConfig> {
    let mut config = match path {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    config.apply_env()?;
    if let Some(host) = host {
        config.http.host = host.to_string();
    }
    if let Some(port) = port {
        config.http.port = port;
    }
    Ok(config)
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if configuration, logging, or server startup fails.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            log_level,
        } => {
            let mut log_config = LogConfig::from_env();
            if let Some(level) = log_level {
                log_config.log_level = level;
            }
            let _log_guard = init_logging_with_config(&log_config)?;

            let config = resolve_config(config.as_deref(), host.as_deref(), port)?;
            serve(&config)
        }
        Commands::Routes => {
            Router::new(item_routes())?.dump_routes();
            Ok(())
        }
    }
}

fn serve(config: &ServiceConfig) -> anyhow::Result<()> {
    let runtime = RuntimeConfig::from_env();
    may::config().set_stack_size(runtime.stack_size);
    info!(stack_size = runtime.stack_size, "Coroutine runtime configured");

    let app = App::build(config)?;
    let addr = config.bind_addr();
    let handle = HttpServer(app.http_service())
        .start(addr.as_str())
        .with_context(|| format!("failed to start server on {addr}"))?;
    info!(addr = %handle.addr(), routes = app.dispatcher.router().routes().count(), "Serving items");

    wait_for_shutdown(handle)
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> anyhow::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> anyhow::Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server coroutine panicked: {e:?}"))
}
