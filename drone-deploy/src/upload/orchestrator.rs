//! Dependency-ordered upload of an artifact forest.
//!
//! Package Drone only accepts a child artifact below a parent that already
//! exists in the channel, so uploads run top-down: features first, then the
//! roots they list, then everything else. Each child request carries the
//! remote id the repository assigned to its parent.

use std::fs;
use std::time::Instant;

use tracing::debug;

use super::report::{UploadKind, UploadReport, UploadedArtifact};
use super::request::UploadRequest;
use super::response::remote_id;
use super::sink::LogSink;
use super::transport::Transport;
use crate::archive::JarArchive;
use crate::artifact::{ArtifactId, ArtifactKind, ArtifactSet};
use crate::containment::{is_feature_member, Forest};
use crate::error::{DeployError, DeployResult};

/// Sequential uploader.
///
/// One upload at a time; the first failure aborts the run.
pub struct Orchestrator<'a> {
    transport: &'a dyn Transport,
    sink: &'a dyn LogSink,
    base_url: String,
    channel: String,
    upload_pom: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        sink: &'a dyn LogSink,
        base_url: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            sink,
            base_url: base_url.into(),
            channel: channel.into(),
            upload_pom: false,
        }
    }

    /// Also upload each non-source archive's embedded POM.
    pub fn with_upload_pom(mut self, upload_pom: bool) -> Self {
        self.upload_pom = upload_pom;
        self
    }

    /// Upload every root of `forest` with its subtree.
    ///
    /// The failure that ends a run is also reported to the log sink.
    pub fn run(&self, set: &mut ArtifactSet, forest: &Forest) -> DeployResult<UploadReport> {
        let mut report = UploadReport::default();
        match self.upload_forest(set, forest, &mut report) {
            Ok(()) => Ok(report),
            Err(e) => {
                self.sink.error(&e.to_string());
                Err(e)
            }
        }
    }

    fn upload_forest(
        &self,
        set: &mut ArtifactSet,
        forest: &Forest,
        report: &mut UploadReport,
    ) -> DeployResult<()> {
        let (features, mut others): (Vec<ArtifactId>, Vec<ArtifactId>) = forest
            .roots()
            .iter()
            .copied()
            .partition(|id| set.get(*id).kind.is_feature());

        for feature in features {
            self.upload_tree(set, feature, None, report)?;

            let (members, rest): (Vec<ArtifactId>, Vec<ArtifactId>) = others
                .into_iter()
                .partition(|id| is_feature_member(set.get(feature), set.get(*id)));
            others = rest;

            for member in members {
                self.upload_tree(set, member, Some(feature), report)?;
            }
        }

        for root in others {
            self.upload_tree(set, root, None, report)?;
        }
        Ok(())
    }

    /// Upload `id`, then its forest children depth-first.
    fn upload_tree(
        &self,
        set: &mut ArtifactSet,
        id: ArtifactId,
        parent: Option<ArtifactId>,
        report: &mut UploadReport,
    ) -> DeployResult<()> {
        self.upload_archive(set, id, parent, report)?;
        let children = set.get(id).children.clone();
        for child in children {
            self.upload_tree(set, child, Some(id), report)?;
        }
        Ok(())
    }

    fn upload_archive(
        &self,
        set: &mut ArtifactSet,
        id: ArtifactId,
        parent: Option<ArtifactId>,
        report: &mut UploadReport,
    ) -> DeployResult<()> {
        let record = set.get(id);
        if record.kind == ArtifactKind::Undefined {
            return Err(DeployError::Unclassified(record.path.clone()));
        }

        let parent_id = match parent {
            None => None,
            Some(parent) => {
                let parent = set.get(parent);
                let remote = parent
                    .remote_id()
                    .ok_or_else(|| DeployError::ParentNotUploaded {
                        artifact: record.artifact_name(),
                        parent: parent.artifact_name(),
                    })?;
                Some(remote.to_string())
            }
        };

        let body = fs::read(&record.path).map_err(|source| DeployError::ReadFailed {
            path: record.path.clone(),
            source,
        })?;
        let request = UploadRequest::for_artifact(
            &self.base_url,
            &self.channel,
            parent_id.as_deref(),
            record,
            body,
        )?;
        let wants_pom = self.upload_pom && !record.is_source_artifact();
        let path = record.path.clone();

        let (remote, elapsed_ms) = self.send(&request)?;
        set.get_mut(id).assign_remote_id(remote.clone());
        report.uploads.push(UploadedArtifact {
            path,
            artifact_name: request.artifact_name,
            kind: UploadKind::Archive,
            parent_id,
            remote_id: remote,
            elapsed_ms,
        });

        if wants_pom {
            self.upload_embedded_pom(set, id, report)?;
        }
        Ok(())
    }

    /// Upload `META-INF/maven/<group>/<artifact>/pom.xml` below the archive.
    fn upload_embedded_pom(
        &self,
        set: &ArtifactSet,
        id: ArtifactId,
        report: &mut UploadReport,
    ) -> DeployResult<()> {
        let record = set.get(id);
        let entry = format!(
            "META-INF/maven/{}/{}/pom.xml",
            record.coordinate.group, record.coordinate.artifact
        );
        let Some(body) = JarArchive::open(&record.path)?.read_entry(&entry)? else {
            debug!(path = %record.path.display(), entry = %entry, "No embedded POM to upload");
            return Ok(());
        };
        let parent_id = record
            .remote_id()
            .ok_or_else(|| DeployError::ParentNotUploaded {
                artifact: record.pom_name(),
                parent: record.artifact_name(),
            })?
            .to_string();

        let request =
            UploadRequest::for_pom(&self.base_url, &self.channel, &parent_id, record, body)?;
        let (remote, elapsed_ms) = self.send(&request)?;
        report.uploads.push(UploadedArtifact {
            path: record.path.clone(),
            artifact_name: request.artifact_name,
            kind: UploadKind::Pom,
            parent_id: Some(parent_id),
            remote_id: remote,
            elapsed_ms,
        });
        Ok(())
    }

    /// Issue one request and return the created id and elapsed milliseconds.
    fn send(&self, request: &UploadRequest) -> DeployResult<(String, u64)> {
        let name = &request.artifact_name;
        self.sink.info(&format!("Start uploading {}", name));
        debug!(url = %request.url, bytes = request.body.len(), "PUT");

        let start = Instant::now();
        let response = self
            .transport
            .put(request)
            .map_err(|e| DeployError::Transport {
                artifact: name.clone(),
                reason: e.to_string(),
            })?;
        let remote = remote_id(name, &response)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        self.sink
            .info(&format!("Uploaded {} in {}ms", name, elapsed_ms));
        debug!(artifact = %name, remote_id = %remote, "Upload accepted");
        Ok((remote, elapsed_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactRecord, Classification, Gav, OsgiIdentity};
    use crate::containment::ChildPolicy;
    use crate::osgi::FeatureDescriptor;
    use crate::upload::sink::MemorySink;
    use crate::upload::transport::tests::MockTransport;
    use crate::upload::transport::TransportResponse;
    use std::path::Path;
    use tempfile::TempDir;

    const BASE: &str = "http://drone:8080";

    fn touch(dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, name.as_bytes()).unwrap();
        path
    }

    fn maven(dir: &Path, name: &str) -> ArtifactRecord {
        ArtifactRecord::new(touch(dir, name), Gav::new("g", "lib", "1.0"))
            .with_classification(Classification::maven_module())
    }

    fn bundle(dir: &Path, name: &str, id: &str) -> ArtifactRecord {
        ArtifactRecord::new(touch(dir, name), Gav::new("g", id, "1.0.0")).with_classification(
            Classification {
                kind: ArtifactKind::Bundle,
                identity: Some(OsgiIdentity::new(id, "1.0.0".parse().unwrap())),
                fragment_host: None,
                feature: None,
            },
        )
    }

    fn feature(dir: &Path, name: &str, members: &[&str]) -> ArtifactRecord {
        let plugins: String = members
            .iter()
            .map(|m| format!("<plugin id=\"{}\" version=\"1.0.0\"/>", m))
            .collect();
        let xml = format!("<feature id=\"acme.feature\" version=\"1.0.0\">{}</feature>", plugins);
        ArtifactRecord::new(touch(dir, name), Gav::new("g", "acme.feature", "1.0.0"))
            .with_classification(Classification {
                kind: ArtifactKind::Feature,
                identity: Some(OsgiIdentity::new("acme.feature", "1.0.0".parse().unwrap())),
                fragment_host: None,
                feature: Some(FeatureDescriptor::parse(&xml).unwrap()),
            })
    }

    #[test]
    fn test_children_get_parent_remote_id() {
        let dir = TempDir::new().unwrap();
        let mut set = ArtifactSet::new(vec![
            maven(dir.path(), "lib-1.0.jar"),
            maven(dir.path(), "lib-1.0-sources.jar"),
        ]);
        let forest = Forest::build(&mut set, ChildPolicy::IncludeChildren);
        let transport = MockTransport::accepting(2);
        let sink = MemorySink::new();

        let report = Orchestrator::new(&transport, &sink, BASE, "ch")
            .run(&mut set, &forest)
            .unwrap();

        assert_eq!(report.len(), 2);
        let urls = transport.urls();
        assert_eq!(urls[0], format!("{}/api/v3/upload/plain/channel/ch/lib-1.0.jar", BASE));
        assert_eq!(
            urls[1],
            format!("{}/api/v3/upload/plain/artifact/ch/id-0/lib-1.0-sources.jar", BASE)
        );
        assert_eq!(report.uploads[1].parent_id.as_deref(), Some("id-0"));
        assert_eq!(
            transport.requests.borrow()[1].query_value("mvn:classifier"),
            Some("sources")
        );
    }

    #[test]
    fn test_feature_members_upload_below_feature() {
        let dir = TempDir::new().unwrap();
        let mut set = ArtifactSet::new(vec![
            bundle(dir.path(), "a.bundle.jar", "acme.bundle"),
            feature(dir.path(), "z.feature.jar", &["acme.bundle"]),
            bundle(dir.path(), "b.other.jar", "acme.other"),
        ]);
        // Normal keeps the member as a root; the orchestrator still nests it.
        let forest = Forest::build(&mut set, ChildPolicy::Normal);
        let transport = MockTransport::accepting(3);
        let sink = MemorySink::new();

        Orchestrator::new(&transport, &sink, BASE, "ch")
            .run(&mut set, &forest)
            .unwrap();

        let urls = transport.urls();
        assert!(urls[0].ends_with("/channel/ch/acme.feature-1.0.0.jar"));
        assert!(urls[1].ends_with("/artifact/ch/id-0/acme.bundle-1.0.0.jar"));
        assert!(urls[2].ends_with("/channel/ch/acme.other-1.0.0.jar"));
    }

    #[test]
    fn test_failure_aborts_and_logs() {
        let dir = TempDir::new().unwrap();
        let mut set = ArtifactSet::new(vec![
            maven(dir.path(), "a-1.0.jar"),
            maven(dir.path(), "b-1.0.jar"),
            maven(dir.path(), "c-1.0.jar"),
        ]);
        let forest = Forest::build(&mut set, ChildPolicy::Normal);
        let transport = MockTransport::default();
        transport.push_ok("first");
        transport.push(Ok(TransportResponse::new(500, r#"{"message":"disk full"}"#)));
        transport.push_ok("never");
        let sink = MemorySink::new();

        let err = Orchestrator::new(&transport, &sink, BASE, "ch")
            .run(&mut set, &forest)
            .unwrap_err();

        assert!(err.to_string().contains("disk full"));
        assert_eq!(transport.requests.borrow().len(), 2);
        assert_eq!(sink.errors().len(), 1);
        assert!(sink.infos().iter().any(|l| l.starts_with("Uploaded a-1.0.jar in ")));
    }

    #[test]
    fn test_transport_error_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut set = ArtifactSet::new(vec![maven(dir.path(), "a-1.0.jar")]);
        let forest = Forest::build(&mut set, ChildPolicy::Normal);
        let transport = MockTransport::default();
        transport.push(Err(crate::upload::TransportError::Request {
            url: "u".to_string(),
            reason: "connection refused".to_string(),
        }));
        let sink = MemorySink::new();

        let err = Orchestrator::new(&transport, &sink, BASE, "ch")
            .run(&mut set, &forest)
            .unwrap_err();
        assert!(matches!(err, DeployError::Transport { .. }));
    }

    #[test]
    fn test_undefined_record_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut set = ArtifactSet::new(vec![ArtifactRecord::new(
            touch(dir.path(), "x.jar"),
            Gav::new("g", "x", "1"),
        )]);
        let forest = Forest::build(&mut set, ChildPolicy::Normal);
        let transport = MockTransport::accepting(1);
        let sink = MemorySink::new();

        let err = Orchestrator::new(&transport, &sink, BASE, "ch")
            .run(&mut set, &forest)
            .unwrap_err();
        assert!(matches!(err, DeployError::Unclassified(_)));
        assert!(transport.requests.borrow().is_empty());
    }
}
