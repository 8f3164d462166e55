//! Upload command - classify the selected files and push them to Package Drone.

use clap::Args;
use drone_deploy::config::DeployConfig;
use drone_deploy::selection::select_files;
use drone_deploy::upload::{ReqwestTransport, TracingSink};

use super::common::{resolve_selection, SelectionArgs};
use crate::error::CliError;

/// Arguments for the upload command.
#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Package Drone host
    #[arg(long)]
    pub host: Option<String>,

    /// Package Drone port
    #[arg(long)]
    pub port: Option<u16>,

    /// Target channel id
    #[arg(long)]
    pub channel: Option<String>,

    /// Deploy key
    #[arg(long, env = "DRONE_DEPLOY_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Also upload each JAR's embedded pom.xml
    #[arg(long, conflicts_with = "no_upload_pom")]
    pub upload_pom: bool,

    /// Do not upload embedded pom.xml files, even if the config file asks to
    #[arg(long)]
    pub no_upload_pom: bool,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl UploadArgs {
    /// Effective configuration: config file, then CLI flags.
    pub fn resolve(&self) -> Result<DeployConfig, CliError> {
        let mut config = resolve_selection(&self.selection)?;

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(channel) = &self.channel {
            config.channel = channel.clone();
        }
        if let Some(key) = &self.key {
            config.key = key.clone();
        }
        if self.upload_pom {
            config.upload_pom = true;
        }
        if self.no_upload_pom {
            config.upload_pom = false;
        }
        if let Some(secs) = self.timeout {
            config.timeout = std::time::Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run the upload command.
pub fn run(args: UploadArgs) -> Result<(), CliError> {
    let config = args.resolve()?;
    tracing::info!(
        server = %config.base_url(),
        channel = %config.channel,
        policy = %config.child_policy,
        "Starting upload"
    );

    let files = select_files(&config.root, &config.patterns)?;
    if files.is_empty() {
        println!(
            "No files matched '{}' under {}",
            config.patterns,
            config.root.display()
        );
        return Ok(());
    }

    let transport = ReqwestTransport::with_timeout(config.key.clone(), config.timeout)
        .map_err(|e| CliError::Config(e.to_string()))?;
    let report = drone_deploy::deploy(&files, &config, &transport, &TracingSink)?;

    println!("{}", report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drone_deploy::containment::ChildPolicy;
    use tempfile::TempDir;

    fn args(config: std::path::PathBuf) -> UploadArgs {
        UploadArgs {
            selection: SelectionArgs {
                config: Some(config),
                root: None,
                pattern: None,
                child_policy: None,
                skip_unparseable: false,
            },
            host: None,
            port: None,
            channel: None,
            key: None,
            upload_pom: false,
            no_upload_pom: false,
            timeout: None,
        }
    }

    #[test]
    fn test_resolve_requires_channel_and_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[server]\nhost = drone\n").unwrap();

        assert!(matches!(args(path.clone()).resolve(), Err(CliError::Config(_))));

        let mut upload = args(path);
        upload.channel = Some("releases".to_string());
        upload.key = Some("secret".to_string());
        upload.port = Some(9000);
        upload.upload_pom = true;
        let config = upload.resolve().unwrap();
        assert_eq!(config.base_url(), "http://drone:9000");
        assert!(config.upload_pom);
        assert_eq!(config.child_policy, ChildPolicy::Normal);
    }

    #[test]
    fn test_no_upload_pom_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(
            &path,
            "[server]\nhost = drone\nchannel = c\nkey = k\n\n[upload]\nupload_pom = true\n",
        )
        .unwrap();

        assert!(args(path.clone()).resolve().unwrap().upload_pom);

        let mut upload = args(path);
        upload.no_upload_pom = true;
        assert!(!upload.resolve().unwrap().upload_pom);
    }
}
