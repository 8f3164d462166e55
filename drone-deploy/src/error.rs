//! Error types for artifact deployment.

use std::io;
use std::path::PathBuf;

/// Result type for deploy operations.
pub type DeployResult<T> = Result<T, DeployError>;

/// Errors that can occur while resolving, classifying or uploading artifacts.
#[derive(Debug)]
pub enum DeployError {
    /// Failed to read a file.
    ReadFailed { path: PathBuf, source: io::Error },

    /// File is not a readable ZIP/JAR archive.
    InvalidArchive { path: PathBuf, reason: String },

    /// No Maven coordinate could be determined for the file.
    NotResolvable { path: PathBuf, reason: String },

    /// Manifest is present but could not be parsed.
    InvalidManifest { path: PathBuf, reason: String },

    /// A header required for classification is missing.
    MissingHeader { path: PathBuf, header: String },

    /// Feature descriptor is present but malformed.
    InvalidFeature { path: PathBuf, reason: String },

    /// Invalid OSGi version or version range.
    InvalidVersion(String),

    /// Invalid configuration.
    InvalidConfig(String),

    /// Candidate file selection failed.
    InvalidPattern(String),

    /// The repository rejected an upload.
    UploadFailed {
        artifact: String,
        status: u16,
        message: String,
    },

    /// The transport could not complete the request.
    Transport { artifact: String, reason: String },

    /// The repository answered 200 but the body was unusable.
    InvalidResponse { artifact: String, reason: String },

    /// A child upload was attempted before its parent had a remote id.
    ParentNotUploaded { artifact: String, parent: String },

    /// A record reached the uploader without being classified.
    Unclassified(PathBuf),
}

impl std::fmt::Display for DeployError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::InvalidArchive { path, reason } => {
                write!(f, "invalid archive {}: {}", path.display(), reason)
            }
            Self::NotResolvable { path, reason } => {
                write!(
                    f,
                    "no maven coordinate for {}: {}",
                    path.display(),
                    reason
                )
            }
            Self::InvalidManifest { path, reason } => {
                write!(f, "invalid manifest in {}: {}", path.display(), reason)
            }
            Self::MissingHeader { path, header } => {
                write!(
                    f,
                    "manifest of {} is missing required header {}",
                    path.display(),
                    header
                )
            }
            Self::InvalidFeature { path, reason } => {
                write!(
                    f,
                    "invalid feature descriptor in {}: {}",
                    path.display(),
                    reason
                )
            }
            Self::InvalidVersion(msg) => write!(f, "invalid version: {}", msg),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Self::InvalidPattern(msg) => write!(f, "invalid file pattern: {}", msg),
            Self::UploadFailed {
                artifact,
                status,
                message,
            } => {
                write!(
                    f,
                    "upload of {} failed: Got response code {}, message: {}",
                    artifact, status, message
                )
            }
            Self::Transport { artifact, reason } => {
                write!(f, "upload of {} failed: {}", artifact, reason)
            }
            Self::InvalidResponse { artifact, reason } => {
                write!(
                    f,
                    "unexpected repository response for {}: {}",
                    artifact, reason
                )
            }
            Self::ParentNotUploaded { artifact, parent } => {
                write!(
                    f,
                    "cannot upload {}: parent {} has no remote id",
                    artifact, parent
                )
            }
            Self::Unclassified(path) => {
                write!(f, "artifact {} was never classified", path.display())
            }
        }
    }
}

impl std::error::Error for DeployError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl DeployError {
    /// Whether this error may be skipped under `skip_unparseable_files`.
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, Self::NotResolvable { .. })
    }
}
