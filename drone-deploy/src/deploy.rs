//! The deployment pipeline.
//!
//! candidate files → coordinate resolution + classification → containment
//! forest → ordered upload.

use std::fmt::Write as _;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::artifact::{ArtifactRecord, ArtifactSet};
use crate::classify::classify;
use crate::config::DeployConfig;
use crate::containment::{ChildPolicy, Forest};
use crate::coordinate::resolve;
use crate::error::DeployResult;
use crate::selection::select_files;
use crate::upload::{LogSink, Orchestrator, Transport, UploadReport};

/// Classified records and the forest built over them.
#[derive(Debug)]
pub struct DeploymentPlan {
    pub artifacts: ArtifactSet,
    pub forest: Forest,
    /// Files dropped because no coordinate could be resolved.
    pub skipped: Vec<PathBuf>,
}

impl DeploymentPlan {
    /// Render the forest as an indented listing.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (id, depth) in self.forest.walk(&self.artifacts) {
            let record = self.artifacts.get(id);
            let identity = record
                .identity
                .as_ref()
                .map(|i| format!(" [{}]", i))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{}{} ({}, {}){}",
                "  ".repeat(depth),
                record.file_name(),
                record.kind,
                record.coordinate,
                identity
            );
        }
        for id in self.forest.excluded() {
            let parent = self
                .forest
                .parent_of(*id)
                .map(|parent| format!(" (child of {})", self.artifacts.get(parent).file_name()))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "excluded: {}{}",
                self.artifacts.get(*id).file_name(),
                parent
            );
        }
        for path in &self.skipped {
            let _ = writeln!(out, "skipped: {}", path.display());
        }
        out
    }
}

/// Resolve, classify and arrange `files`.
///
/// Resolution failures are skipped (and reported to `sink`) when
/// `skip_unparseable` is set; classification failures are always fatal.
pub fn plan(
    files: &[PathBuf],
    skip_unparseable: bool,
    policy: ChildPolicy,
    sink: &dyn LogSink,
) -> DeployResult<DeploymentPlan> {
    let mut records = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();

    for file in files {
        let coordinate = match resolve(file, files) {
            Ok(gav) => gav,
            Err(e) if skip_unparseable && e.is_resolution_error() => {
                warn!(path = %file.display(), error = %e, "Skipping file");
                sink.error(&format!("Skipping {}: {}", file.display(), e));
                skipped.push(file.clone());
                continue;
            }
            Err(e) => {
                sink.error(&e.to_string());
                return Err(e);
            }
        };

        let classification = classify(file).inspect_err(|e| sink.error(&e.to_string()))?;
        records.push(ArtifactRecord::new(file.clone(), coordinate).with_classification(classification));
    }

    let mut artifacts = ArtifactSet::new(records);
    let forest = Forest::build(&mut artifacts, policy);
    info!(
        artifacts = artifacts.len(),
        roots = forest.roots().len(),
        skipped = skipped.len(),
        "Deployment planned"
    );

    Ok(DeploymentPlan {
        artifacts,
        forest,
        skipped,
    })
}

/// Select files from `config`'s root and patterns and plan them without
/// uploading anything.
pub fn inspect(config: &DeployConfig, sink: &dyn LogSink) -> DeployResult<DeploymentPlan> {
    let files = select_files(&config.root, &config.patterns)?;
    plan(
        &files,
        config.skip_unparseable_files,
        config.child_policy,
        sink,
    )
}

/// Plan and upload `files` according to `config`.
pub fn deploy(
    files: &[PathBuf],
    config: &DeployConfig,
    transport: &dyn Transport,
    sink: &dyn LogSink,
) -> DeployResult<UploadReport> {
    let mut deployment = plan(
        files,
        config.skip_unparseable_files,
        config.child_policy,
        sink,
    )?;

    Orchestrator::new(transport, sink, config.base_url(), config.channel.clone())
        .with_upload_pom(config.upload_pom)
        .run(&mut deployment.artifacts, &deployment.forest)
}
