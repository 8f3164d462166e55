//! Per-file artifact records and the arena that owns them.

use std::fmt;
use std::path::{Path, PathBuf};

use super::kind::ArtifactKind;
use crate::osgi::{FeatureDescriptor, FragmentHost, Version};

/// Maven coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gav {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Gav {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// OSGi symbolic name and version, used for containment matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OsgiIdentity {
    pub symbolic_id: String,
    pub version: Version,
}

impl OsgiIdentity {
    pub fn new(symbolic_id: impl Into<String>, version: Version) -> Self {
        Self {
            symbolic_id: symbolic_id.into(),
            version,
        }
    }
}

impl fmt::Display for OsgiIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.symbolic_id, self.version)
    }
}

/// Result of classifying one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: ArtifactKind,
    pub identity: Option<OsgiIdentity>,
    pub fragment_host: Option<FragmentHost>,
    pub feature: Option<FeatureDescriptor>,
}

impl Classification {
    pub fn maven_module() -> Self {
        Self {
            kind: ArtifactKind::MavenModule,
            identity: None,
            fragment_host: None,
            feature: None,
        }
    }
}

/// Index of a record inside an [`ArtifactSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactId(pub usize);

/// One candidate file and everything learned about it during a run.
#[derive(Debug, Clone)]
pub struct ArtifactRecord {
    pub path: PathBuf,
    pub coordinate: Gav,
    pub kind: ArtifactKind,
    pub identity: Option<OsgiIdentity>,
    pub fragment_host: Option<FragmentHost>,
    pub feature: Option<FeatureDescriptor>,
    /// Forest children, filled in by containment resolution.
    pub children: Vec<ArtifactId>,
    remote_id: Option<String>,
}

impl ArtifactRecord {
    /// Create an unclassified record.
    pub fn new(path: impl Into<PathBuf>, coordinate: Gav) -> Self {
        Self {
            path: path.into(),
            coordinate,
            kind: ArtifactKind::Undefined,
            identity: None,
            fragment_host: None,
            feature: None,
            children: Vec::new(),
            remote_id: None,
        }
    }

    /// Take over the result of classification.
    pub fn apply(&mut self, classification: Classification) {
        self.kind = classification.kind;
        self.identity = classification.identity;
        self.fragment_host = classification.fragment_host;
        self.feature = classification.feature;
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.apply(classification);
        self
    }

    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }

    /// File name without extension.
    pub fn stem(&self) -> String {
        file_stem(&self.path)
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    /// Record the id the repository assigned. Happens once per run.
    pub fn assign_remote_id(&mut self, id: impl Into<String>) {
        debug_assert!(
            self.remote_id.is_none(),
            "{} uploaded twice",
            self.path.display()
        );
        self.remote_id = Some(id.into());
    }

    /// Whether this record is a source companion (classifier `sources`).
    pub fn is_source_artifact(&self) -> bool {
        match self.kind {
            ArtifactKind::MavenModule => self.stem().ends_with("-sources"),
            kind => kind.is_source(),
        }
    }

    /// Name the artifact is stored under in the repository.
    ///
    /// OSGi artifacts are renamed to `<symbolic id>-<version>.jar`; everything
    /// else keeps its file name.
    pub fn artifact_name(&self) -> String {
        match &self.identity {
            Some(identity) if self.kind.is_osgi() => {
                format!("{}-{}.jar", identity.symbolic_id, identity.version)
            }
            _ => self.file_name(),
        }
    }

    /// Name of the POM companion upload.
    pub fn pom_name(&self) -> String {
        match &self.identity {
            Some(identity) if self.kind.is_osgi() => {
                format!("{}-{}.pom", identity.symbolic_id, identity.version)
            }
            _ => format!("{}.pom", self.stem()),
        }
    }

    /// Version sent as `mvn:snapshotVersion`.
    pub fn snapshot_version(&self) -> String {
        match &self.identity {
            Some(identity) => identity.version.to_string(),
            None => self.coordinate.version.clone(),
        }
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Arena of records for one run, ordered by path.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    records: Vec<ArtifactRecord>,
}

impl ArtifactSet {
    pub fn new(mut records: Vec<ArtifactRecord>) -> Self {
        records.sort_by(|a, b| a.path.cmp(&b.path));
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: ArtifactId) -> &ArtifactRecord {
        &self.records[id.0]
    }

    pub fn get_mut(&mut self, id: ArtifactId) -> &mut ArtifactRecord {
        &mut self.records[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = ArtifactId> {
        (0..self.records.len()).map(ArtifactId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArtifactId, &ArtifactRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (ArtifactId(i), record))
    }

    /// Look a record up by path.
    pub fn find(&self, path: &Path) -> Option<ArtifactId> {
        self.records
            .binary_search_by(|record| record.path.as_path().cmp(path))
            .ok()
            .map(ArtifactId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(path: &str, id: &str, version: &str) -> ArtifactRecord {
        ArtifactRecord::new(path, Gav::new("g", id, "1.0.0-SNAPSHOT")).with_classification(
            Classification {
                kind: ArtifactKind::Bundle,
                identity: Some(OsgiIdentity::new(id, version.parse().unwrap())),
                fragment_host: None,
                feature: None,
            },
        )
    }

    #[test]
    fn test_new_record_is_undefined() {
        let record = ArtifactRecord::new("/a/x.jar", Gav::new("g", "x", "1"));
        assert_eq!(record.kind, ArtifactKind::Undefined);
        assert!(record.remote_id().is_none());
        assert!(record.children.is_empty());
    }

    #[test]
    fn test_osgi_artifact_name_uses_identity() {
        let record = bundle("/out/acme.bundle-1.0.0-SNAPSHOT.jar", "acme.bundle", "1.0.0.v2018");
        assert_eq!(record.artifact_name(), "acme.bundle-1.0.0.v2018.jar");
        assert_eq!(record.pom_name(), "acme.bundle-1.0.0.v2018.pom");
        assert_eq!(record.snapshot_version(), "1.0.0.v2018");
    }

    #[test]
    fn test_maven_module_keeps_file_name() {
        let record = ArtifactRecord::new("/out/lib-2.0-sources.jar", Gav::new("g", "lib", "2.0"))
            .with_classification(Classification::maven_module());
        assert_eq!(record.artifact_name(), "lib-2.0-sources.jar");
        assert_eq!(record.pom_name(), "lib-2.0-sources.pom");
        assert_eq!(record.snapshot_version(), "2.0");
        assert!(record.is_source_artifact());
    }

    #[test]
    fn test_set_sorted_by_path() {
        let set = ArtifactSet::new(vec![
            bundle("/b/b.jar", "b", "1"),
            bundle("/a/a.jar", "a", "1"),
        ]);
        assert_eq!(set.get(ArtifactId(0)).path, PathBuf::from("/a/a.jar"));
        assert_eq!(set.find(Path::new("/b/b.jar")), Some(ArtifactId(1)));
        assert_eq!(set.find(Path::new("/c.jar")), None);
    }

    #[test]
    fn test_assign_remote_id() {
        let mut record = bundle("/a.jar", "a", "1");
        record.assign_remote_id("abc");
        assert_eq!(record.remote_id(), Some("abc"));
    }
}
