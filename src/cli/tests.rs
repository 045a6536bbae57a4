//! Unit tests for CLI commands

use crate::cli::{resolve_config, Cli, Commands};
use clap::Parser;
use std::io::Write;

#[test]
fn test_serve_command_with_flags() {
    let cli = Cli::try_parse_from([
        "itemrouter",
        "serve",
        "--config",
        "items.yaml",
        "--host",
        "127.0.0.1",
        "--port",
        "9000",
        "--log-level",
        "debug",
    ])
    .unwrap();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            log_level,
        } => {
            assert_eq!(config.unwrap().to_string_lossy(), "items.yaml");
            assert_eq!(host.as_deref(), Some("127.0.0.1"));
            assert_eq!(port, Some(9000));
            assert_eq!(log_level.as_deref(), Some("debug"));
        }
        other => panic!("Expected Serve command, got {other:?}"),
    }
}

#[test]
fn test_routes_command_parses() {
    let cli = Cli::try_parse_from(["itemrouter", "routes"]).unwrap();
    assert_eq!(cli.command, Commands::Routes);
}

#[test]
fn test_invalid_port_rejected() {
    assert!(Cli::try_parse_from(["itemrouter", "serve", "--port", "99999"]).is_err());
}

#[test]
fn test_flags_override_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "http:\n  host: 10.0.0.1\n  port: 7000").unwrap();

    let config = resolve_config(Some(file.path()), None, Some(7100)).unwrap();
    assert_eq!(config.http.port, 7100);
    // ITEMS_HOST may be set by the environment running the tests
    if std::env::var("ITEMS_HOST").is_err() {
        assert_eq!(config.http.host, "10.0.0.1");
    }

    let config = resolve_config(Some(file.path()), Some("localhost"), None).unwrap();
    assert_eq!(config.http.host, "localhost");
}
