//! CLI error type.

use std::fmt;
use std::io;

use drone_deploy::DeployError;

/// Errors surfaced by CLI commands. Any of them ends the process with exit
/// code 1.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or incomplete configuration.
    Config(String),
    /// I/O failure outside the library.
    Io(io::Error),
    /// Resolution, classification or upload failed.
    Deploy(DeployError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::Deploy(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Io(e) => Some(e),
            CliError::Deploy(e) => Some(e),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<DeployError> for CliError {
    fn from(e: DeployError) -> Self {
        match e {
            DeployError::InvalidConfig(msg) => CliError::Config(msg),
            other => CliError::Deploy(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_maps_to_config() {
        let err: CliError = DeployError::InvalidConfig("channel is empty".to_string()).into();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: channel is empty");
    }

    #[test]
    fn test_deploy_error_passes_through() {
        let err: CliError = DeployError::UploadFailed {
            artifact: "a.jar".to_string(),
            status: 500,
            message: "disk full".to_string(),
        }
        .into();
        assert!(err.to_string().contains("disk full"));
    }
}
