//! drone-deploy CLI - upload OSGi and Maven build output to Package Drone.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use drone_deploy::logging::{init_logging, LogOptions};

use commands::config::ConfigCommands;
use commands::inspect::InspectArgs;
use commands::upload::UploadArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "drone-deploy", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify the selected files and upload them in dependency order
    Upload(UploadArgs),

    /// Show the upload forest without uploading anything
    Inspect(InspectArgs),

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let options = LogOptions {
        verbose: cli.verbose,
        log_file: cli.log_file.clone(),
    };
    let _guard = match init_logging(&options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Upload(args) => commands::upload::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Config { command } => commands::config::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::common::ChildPolicyArg;

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from([
            "drone-deploy",
            "upload",
            "--root",
            "target/repository",
            "--pattern",
            "**/*.jar",
            "--host",
            "drone",
            "--port",
            "8081",
            "--channel",
            "releases",
            "--key",
            "secret",
            "--upload-pom",
            "--child-policy",
            "include-children",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.port, Some(8081));
                assert_eq!(args.channel.as_deref(), Some("releases"));
                assert!(args.upload_pom);
                assert_eq!(
                    args.selection.child_policy,
                    Some(ChildPolicyArg::IncludeChildren)
                );
                assert_eq!(args.selection.root, Some(PathBuf::from("target/repository")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_reject_unknown_policy() {
        let result = Cli::try_parse_from(["drone-deploy", "inspect", "--child-policy", "all"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_upload_pom_flags_conflict() {
        let cli = Cli::try_parse_from(["drone-deploy", "upload", "--no-upload-pom"]).unwrap();
        match cli.command {
            Commands::Upload(args) => assert!(args.no_upload_pom && !args.upload_pom),
            other => panic!("unexpected command {:?}", other),
        }

        let result =
            Cli::try_parse_from(["drone-deploy", "upload", "--upload-pom", "--no-upload-pom"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::try_parse_from(["drone-deploy", "config", "path"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Path
            }
        ));
    }

    #[test]
    fn test_log_file_is_global() {
        let cli =
            Cli::try_parse_from(["drone-deploy", "inspect", "--log-file", "/tmp/d.log"]).unwrap();
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/d.log")));
    }
}
