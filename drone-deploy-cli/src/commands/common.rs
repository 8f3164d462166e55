//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use drone_deploy::config::{default_config_path, DeployConfig};
use drone_deploy::containment::ChildPolicy;

use crate::error::CliError;

/// Child artifact policy selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ChildPolicyArg {
    /// Upload every artifact as a root
    Normal,
    /// Upload contained artifacts below their parent
    IncludeChildren,
    /// Do not upload contained artifacts
    ExcludeChildren,
}

impl From<ChildPolicyArg> for ChildPolicy {
    fn from(arg: ChildPolicyArg) -> Self {
        match arg {
            ChildPolicyArg::Normal => ChildPolicy::Normal,
            ChildPolicyArg::IncludeChildren => ChildPolicy::IncludeChildren,
            ChildPolicyArg::ExcludeChildren => ChildPolicy::ExcludeChildren,
        }
    }
}

/// Which files to look at and how to arrange them.
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// Configuration file (default: <config dir>/drone-deploy/config.ini)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the file patterns are resolved against
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Comma-separated glob patterns, e.g. "**/*.jar,plugins/"
    #[arg(long, value_name = "PATTERNS")]
    pub pattern: Option<String>,

    /// How contained artifacts are treated
    #[arg(long, value_enum)]
    pub child_policy: Option<ChildPolicyArg>,

    /// Skip files without a resolvable Maven coordinate
    #[arg(long)]
    pub skip_unparseable: bool,
}

/// Load the configuration file.
///
/// An explicit `--config` must exist; the default location is optional.
pub fn load_config(explicit: Option<&PathBuf>) -> Result<DeployConfig, CliError> {
    match explicit {
        Some(path) => Ok(DeployConfig::load(path)?),
        None => match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Using default config file");
                Ok(DeployConfig::load(&path)?)
            }
            _ => Ok(DeployConfig::default()),
        },
    }
}

/// Build the effective configuration: file values overridden by CLI flags.
pub fn resolve_selection(args: &SelectionArgs) -> Result<DeployConfig, CliError> {
    let mut config = load_config(args.config.as_ref())?;

    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if let Some(pattern) = &args.pattern {
        config.patterns = pattern.clone();
    }
    if let Some(policy) = args.child_policy {
        config.child_policy = policy.into();
    }
    if args.skip_unparseable {
        config.skip_unparseable_files = true;
    }

    Ok(config)
}
