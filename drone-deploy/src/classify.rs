//! Artifact classification from packaging metadata.
//!
//! A JAR with a parseable root `feature.xml` is a feature. Otherwise the manifest
//! decides: no `Bundle-SymbolicName` means a plain Maven module, a
//! `Fragment-Host` header means a fragment, and the symbolic name's suffix
//! tells source and test companions apart.

use std::path::Path;

use tracing::{debug, warn};

use crate::archive::JarArchive;
use crate::artifact::{ArtifactKind, Classification, OsgiIdentity};
use crate::error::{DeployError, DeployResult};
use crate::osgi::{
    FeatureDescriptor, FragmentHost, Manifest, Version, BUNDLE_SYMBOLIC_NAME, BUNDLE_VERSION,
    FEATURE_DESCRIPTOR_PATH, FRAGMENT_HOST, MANIFEST_PATH,
};

const SOURCE_SUFFIX: &str = ".source";
const TEST_SOURCE_SUFFIXES: [&str; 2] = [".test.source", ".tests.source"];
const TEST_SUFFIXES: [&str; 2] = [".test", ".tests"];

/// Classify the archive at `path`.
pub fn classify(path: &Path) -> DeployResult<Classification> {
    let mut jar = JarArchive::open(path)?;

    let mut broken_feature = None;
    if let Some(xml) = jar.read_entry_string(FEATURE_DESCRIPTOR_PATH)? {
        match FeatureDescriptor::parse(&xml) {
            Ok(feature) => return Ok(feature_classification(path, feature)),
            Err(reason) => {
                warn!(
                    path = %path.display(),
                    reason = %reason,
                    "Ignoring unparseable feature.xml, falling back to the manifest"
                );
                broken_feature = Some(reason);
            }
        }
    }

    let Some(text) = jar.read_entry_string(MANIFEST_PATH)? else {
        // A broken descriptor with nothing else to go on is not a Maven module.
        if let Some(reason) = broken_feature {
            return Err(DeployError::InvalidFeature {
                path: path.to_path_buf(),
                reason,
            });
        }
        debug!(path = %path.display(), "No manifest, classified as maven-module");
        return Ok(Classification::maven_module());
    };
    drop(jar);

    let manifest = Manifest::parse(&text).map_err(|reason| DeployError::InvalidManifest {
        path: path.to_path_buf(),
        reason,
    })?;
    let classification = classify_manifest(path, &manifest)?;
    debug!(path = %path.display(), kind = %classification.kind, "Classified");
    Ok(classification)
}

fn feature_classification(path: &Path, feature: FeatureDescriptor) -> Classification {
    let kind = if feature.id.ends_with(SOURCE_SUFFIX) {
        ArtifactKind::SourceFeature
    } else {
        ArtifactKind::Feature
    };
    debug!(path = %path.display(), kind = %kind, id = %feature.id, "Classified");
    Classification {
        kind,
        identity: Some(OsgiIdentity::new(feature.id.clone(), feature.version.clone())),
        fragment_host: None,
        feature: Some(feature),
    }
}

/// Classify from already-parsed manifest headers.
pub fn classify_manifest(path: &Path, manifest: &Manifest) -> DeployResult<Classification> {
    let symbolic_id = manifest
        .get(BUNDLE_SYMBOLIC_NAME)
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let Some(symbolic_id) = symbolic_id else {
        return Ok(Classification::maven_module());
    };

    let invalid = |reason: String| DeployError::InvalidManifest {
        path: path.to_path_buf(),
        reason,
    };

    let version: Version = manifest
        .get(BUNDLE_VERSION)
        .ok_or_else(|| DeployError::MissingHeader {
            path: path.to_path_buf(),
            header: BUNDLE_VERSION.to_string(),
        })?
        .parse()
        .map_err(|e: DeployError| invalid(e.to_string()))?;

    let fragment_host = manifest
        .get(FRAGMENT_HOST)
        .map(|header| header.parse::<FragmentHost>())
        .transpose()
        .map_err(|e| invalid(e.to_string()))?;

    Ok(Classification {
        kind: kind_for_bundle(symbolic_id, fragment_host.is_some()),
        identity: Some(OsgiIdentity::new(symbolic_id, version)),
        fragment_host,
        feature: None,
    })
}

/// Kind of a bundle or fragment, from its symbolic name.
pub fn kind_for_bundle(symbolic_id: &str, is_fragment: bool) -> ArtifactKind {
    let ends_with_any = |suffixes: &[&str]| suffixes.iter().any(|s| symbolic_id.ends_with(s));

    if !is_fragment {
        return if symbolic_id.ends_with(SOURCE_SUFFIX) {
            ArtifactKind::SourceBundle
        } else {
            ArtifactKind::Bundle
        };
    }

    if ends_with_any(&TEST_SOURCE_SUFFIXES) {
        ArtifactKind::SourceTestFragment
    } else if symbolic_id.ends_with(SOURCE_SUFFIX) {
        ArtifactKind::SourceFragment
    } else if ends_with_any(&TEST_SUFFIXES) {
        ArtifactKind::TestFragment
    } else {
        ArtifactKind::Fragment
    }
}
