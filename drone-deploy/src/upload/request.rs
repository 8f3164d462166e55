//! Upload request construction.
//!
//! Package Drone's plain upload API takes the artifact bytes as the request
//! body and the Maven metadata as `mvn:*` query parameters.
//!
//! # Example
//!
//! ```
//! use drone_deploy::upload::upload_url;
//!
//! assert_eq!(
//!     upload_url("http://drone:8080", "releases", None, "acme-1.0.jar")?,
//!     "http://drone:8080/api/v3/upload/plain/channel/releases/acme-1.0.jar"
//! );
//! assert_eq!(
//!     upload_url("http://drone:8080", "releases", Some("p1"), "acme-1.0.pom")?,
//!     "http://drone:8080/api/v3/upload/plain/artifact/releases/p1/acme-1.0.pom"
//! );
//! # Ok::<(), drone_deploy::DeployError>(())
//! ```

use reqwest::Url;

use crate::artifact::ArtifactRecord;
use crate::error::{DeployError, DeployResult};

const API_PREFIX: &str = "api/v3/upload/plain";

/// One PUT to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    /// Name the artifact is stored under; also the last URL segment.
    pub artifact_name: String,
    pub body: Vec<u8>,
}

impl UploadRequest {
    /// Request uploading `record`'s archive.
    pub fn for_artifact(
        base_url: &str,
        channel: &str,
        parent_id: Option<&str>,
        record: &ArtifactRecord,
        body: Vec<u8>,
    ) -> DeployResult<Self> {
        let artifact_name = record.artifact_name();
        Ok(Self {
            url: upload_url(base_url, channel, parent_id, &artifact_name)?,
            query: artifact_query(record),
            artifact_name,
            body,
        })
    }

    /// Request uploading `record`'s POM as a child of the uploaded archive.
    pub fn for_pom(
        base_url: &str,
        channel: &str,
        parent_id: &str,
        record: &ArtifactRecord,
        body: Vec<u8>,
    ) -> DeployResult<Self> {
        let artifact_name = record.pom_name();
        Ok(Self {
            url: upload_url(base_url, channel, Some(parent_id), &artifact_name)?,
            query: pom_query(record),
            artifact_name,
            body,
        })
    }

    /// Look up a query parameter.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Upload URL, channel-relative or below an already uploaded parent.
///
/// Channel, parent id and artifact name are percent-encoded as single path
/// segments.
pub fn upload_url(
    base_url: &str,
    channel: &str,
    parent_id: Option<&str>,
    name: &str,
) -> DeployResult<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| DeployError::InvalidConfig(format!("base URL '{}': {}", base_url, e)))?;
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            DeployError::InvalidConfig(format!("base URL '{}' cannot take a path", base_url))
        })?;
        segments.pop_if_empty().extend(API_PREFIX.split('/'));
        match parent_id {
            None => segments.push("channel").push(channel),
            Some(parent) => segments.push("artifact").push(channel).push(parent),
        };
        segments.push(name);
    }
    Ok(url.to_string())
}

/// Maven metadata for an archive upload.
pub fn artifact_query(record: &ArtifactRecord) -> Vec<(String, String)> {
    let mut query = base_query(record);
    query.push(("mvn:snapshotVersion".to_string(), record.snapshot_version()));
    query.push(("mvn:extension".to_string(), "jar".to_string()));
    if record.is_source_artifact() {
        query.push(("mvn:classifier".to_string(), "sources".to_string()));
    }
    query
}

/// Maven metadata for a POM upload.
pub fn pom_query(record: &ArtifactRecord) -> Vec<(String, String)> {
    let mut query = base_query(record);
    query.push(("mvn:extension".to_string(), "pom".to_string()));
    query
}

fn base_query(record: &ArtifactRecord) -> Vec<(String, String)> {
    let gav = &record.coordinate;
    vec![
        ("mvn:artifactId".to_string(), gav.artifact.clone()),
        ("mvn:groupId".to_string(), gav.group.clone()),
        ("mvn:version".to_string(), gav.version.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactKind, Classification, Gav, OsgiIdentity};

    fn record(path: &str, kind: ArtifactKind) -> ArtifactRecord {
        let identity = kind
            .is_osgi()
            .then(|| OsgiIdentity::new("acme.bundle", "1.0.0.v2018".parse().unwrap()));
        ArtifactRecord::new(path, Gav::new("com.acme", "acme.bundle", "1.0.0-SNAPSHOT"))
            .with_classification(Classification {
                kind,
                identity,
                fragment_host: None,
                feature: None,
            })
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        assert_eq!(
            upload_url("http://h:1/", "c", None, "a.jar").unwrap(),
            "http://h:1/api/v3/upload/plain/channel/c/a.jar"
        );
    }

    #[test]
    fn test_url_encodes_segments() {
        assert_eq!(
            upload_url("http://h:1", "my channel", Some("p/1"), "lib#1?x%.jar").unwrap(),
            "http://h:1/api/v3/upload/plain/artifact/my%20channel/p%2F1/lib%231%3Fx%25.jar"
        );
    }

    #[test]
    fn test_url_keeps_base_path() {
        assert_eq!(
            upload_url("http://h:1/drone/", "c", None, "a.jar").unwrap(),
            "http://h:1/drone/api/v3/upload/plain/channel/c/a.jar"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            upload_url("not a url", "c", None, "a.jar"),
            Err(DeployError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bundle_query() {
        let request = UploadRequest::for_artifact(
            "http://h:1",
            "c",
            None,
            &record("/o/acme.bundle-1.0.0.v2018.jar", ArtifactKind::Bundle),
            vec![],
        )
        .unwrap();
        assert_eq!(request.artifact_name, "acme.bundle-1.0.0.v2018.jar");
        assert_eq!(request.query_value("mvn:groupId"), Some("com.acme"));
        assert_eq!(request.query_value("mvn:version"), Some("1.0.0-SNAPSHOT"));
        assert_eq!(request.query_value("mvn:snapshotVersion"), Some("1.0.0.v2018"));
        assert_eq!(request.query_value("mvn:extension"), Some("jar"));
        assert_eq!(request.query_value("mvn:classifier"), None);
    }

    #[test]
    fn test_source_bundle_has_classifier() {
        let request = UploadRequest::for_artifact(
            "http://h:1",
            "c",
            Some("p"),
            &record("/o/acme.bundle.source.jar", ArtifactKind::SourceBundle),
            vec![],
        )
        .unwrap();
        assert_eq!(request.query_value("mvn:classifier"), Some("sources"));
        assert!(request.url.contains("/artifact/c/p/"));
    }

    #[test]
    fn test_pom_query() {
        let request = UploadRequest::for_pom(
            "http://h:1",
            "c",
            "parent-id",
            &record("/o/acme.bundle-1.0.0.jar", ArtifactKind::Bundle),
            b"<project/>".to_vec(),
        )
        .unwrap();
        assert_eq!(request.artifact_name, "acme.bundle-1.0.0.v2018.pom");
        assert_eq!(request.query_value("mvn:extension"), Some("pom"));
        assert_eq!(request.query_value("mvn:snapshotVersion"), None);
        assert_eq!(request.query_value("mvn:classifier"), None);
        assert!(request.url.ends_with("/artifact/c/parent-id/acme.bundle-1.0.0.v2018.pom"));
    }
}
