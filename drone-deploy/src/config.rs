//! Deployment configuration.
//!
//! Settings come from an INI file (default `<config dir>/drone-deploy/config.ini`)
//! and can be overridden programmatically through the `with_*` builders:
//!
//! ```ini
//! [server]
//! host = localhost
//! port = 8080
//! channel = my-channel
//! key = deploy-key
//! timeout_secs = 300
//!
//! [upload]
//! upload_pom = true
//! skip_unparseable_files = false
//! child_artifacts = include-children
//!
//! [files]
//! root = target/repository
//! pattern = **/*.jar
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;

use crate::containment::ChildPolicy;
use crate::error::{DeployError, DeployResult};
use crate::upload::DEFAULT_TIMEOUT_SECS;

const CONFIG_DIR_NAME: &str = "drone-deploy";
const CONFIG_FILE_NAME: &str = "config.ini";

/// Configuration for one deployment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Package Drone host name.
    pub host: String,

    pub port: u16,

    /// Target channel id.
    pub channel: String,

    /// Deploy key, sent as the basic-auth password.
    pub key: String,

    /// Upload each non-source JAR's embedded POM as its child.
    pub upload_pom: bool,

    /// Skip files whose Maven coordinate cannot be resolved instead of failing.
    pub skip_unparseable_files: bool,

    pub child_policy: ChildPolicy,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Directory the file patterns are resolved against.
    pub root: PathBuf,

    /// Comma-separated glob patterns selecting candidate files.
    pub patterns: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            channel: String::new(),
            key: String::new(),
            upload_pom: false,
            skip_unparseable_files: false,
            child_policy: ChildPolicy::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            root: PathBuf::from("."),
            patterns: "**/*.jar".to_string(),
        }
    }
}

impl DeployConfig {
    /// Create a configuration for the given server and channel.
    pub fn new(host: impl Into<String>, port: u16, channel: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            channel: channel.into(),
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_upload_pom(mut self, upload_pom: bool) -> Self {
        self.upload_pom = upload_pom;
        self
    }

    pub fn with_skip_unparseable_files(mut self, skip: bool) -> Self {
        self.skip_unparseable_files = skip;
        self
    }

    pub fn with_child_policy(mut self, policy: ChildPolicy) -> Self {
        self.child_policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_patterns(mut self, patterns: impl Into<String>) -> Self {
        self.patterns = patterns.into();
        self
    }

    /// `http://<host>:<port>`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Check that everything an upload needs is set.
    pub fn validate(&self) -> DeployResult<()> {
        if self.host.trim().is_empty() {
            return Err(DeployError::InvalidConfig("host is empty".to_string()));
        }
        if reqwest::Url::parse(&self.base_url()).is_err() {
            return Err(DeployError::InvalidConfig(format!(
                "host '{}' does not form a valid URL",
                self.host
            )));
        }
        if self.port == 0 {
            return Err(DeployError::InvalidConfig("port must not be 0".to_string()));
        }
        if self.channel.trim().is_empty() {
            return Err(DeployError::InvalidConfig("channel is empty".to_string()));
        }
        if self.key.is_empty() {
            return Err(DeployError::InvalidConfig("deploy key is empty".to_string()));
        }
        Ok(())
    }

    /// Load a configuration file. Keys it omits keep their defaults.
    pub fn load(path: &Path) -> DeployResult<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => DeployError::ReadFailed {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => {
                DeployError::InvalidConfig(format!("{}: {}", path.display(), e))
            }
        })?;
        Self::from_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> DeployResult<Self> {
        let ini = Ini::load_from_str(text).map_err(|e| DeployError::InvalidConfig(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> DeployResult<Self> {
        let mut config = Self::default();
        let get = |section: &str, key: &str| -> Option<String> {
            ini.section(Some(section))
                .and_then(|props| props.get(key))
                .map(|value| value.trim().to_string())
        };

        if let Some(host) = get("server", "host") {
            config.host = host;
        }
        if let Some(port) = get("server", "port") {
            config.port = parse_value("server.port", &port)?;
        }
        if let Some(channel) = get("server", "channel") {
            config.channel = channel;
        }
        if let Some(key) = get("server", "key") {
            config.key = key;
        }
        if let Some(secs) = get("server", "timeout_secs") {
            config.timeout = Duration::from_secs(parse_value("server.timeout_secs", &secs)?);
        }

        if let Some(value) = get("upload", "upload_pom") {
            config.upload_pom = parse_bool("upload.upload_pom", &value)?;
        }
        if let Some(value) = get("upload", "skip_unparseable_files") {
            config.skip_unparseable_files = parse_bool("upload.skip_unparseable_files", &value)?;
        }
        if let Some(value) = get("upload", "child_artifacts") {
            config.child_policy = value.parse()?;
        }

        if let Some(root) = get("files", "root") {
            config.root = PathBuf::from(root);
        }
        if let Some(pattern) = get("files", "pattern") {
            config.patterns = pattern;
        }

        Ok(config)
    }
}

/// Default configuration file location, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> DeployResult<T> {
    value
        .parse()
        .map_err(|_| DeployError::InvalidConfig(format!("{}: invalid value '{}'", key, value)))
}

fn parse_bool(key: &str, value: &str) -> DeployResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(DeployError::InvalidConfig(format!(
            "{}: expected true or false, got '{}'",
            key, value
        ))),
    }
}
