//! Configuration CLI commands.
//!
//! Provides `config path` and `config list`.

use std::path::PathBuf;

use clap::Subcommand;
use drone_deploy::config::default_config_path;

use super::common::load_config;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// List the effective configuration settings
    List {
        /// Configuration file to read instead of the default
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::List { config } => run_list(config.as_ref()),
    }
}

fn run_path() -> Result<(), CliError> {
    let path = default_config_path().ok_or_else(|| {
        CliError::Config("no configuration directory on this platform".to_string())
    })?;
    println!("{}", path.display());
    Ok(())
}

fn run_list(path: Option<&PathBuf>) -> Result<(), CliError> {
    let config = load_config(path)?;

    println!("[server]");
    println!("  host = {}", config.host);
    println!("  port = {}", config.port);
    println!("  channel = {}", or_not_set(&config.channel));
    println!(
        "  key = {}",
        if config.key.is_empty() { "(not set)" } else { "********" }
    );
    println!("  timeout_secs = {}", config.timeout.as_secs());
    println!();
    println!("[upload]");
    println!("  upload_pom = {}", config.upload_pom);
    println!("  skip_unparseable_files = {}", config.skip_unparseable_files);
    println!("  child_artifacts = {}", config.child_policy);
    println!();
    println!("[files]");
    println!("  root = {}", config.root.display());
    println!("  pattern = {}", config.patterns);
    Ok(())
}

fn or_not_set(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}
