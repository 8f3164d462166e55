//! Summary of a completed upload run.

use std::fmt;
use std::path::PathBuf;

/// What was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Archive,
    Pom,
}

/// One successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedArtifact {
    pub path: PathBuf,
    pub artifact_name: String,
    pub kind: UploadKind,
    pub parent_id: Option<String>,
    pub remote_id: String,
    pub elapsed_ms: u64,
}

/// Every upload of a run, in the order issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploads: Vec<UploadedArtifact>,
}

impl UploadReport {
    pub fn len(&self) -> usize {
        self.uploads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }

    /// Number of archive uploads, not counting POMs.
    pub fn archive_count(&self) -> usize {
        self.uploads
            .iter()
            .filter(|u| u.kind == UploadKind::Archive)
            .count()
    }

    /// Remote id assigned to the archive at `path`.
    pub fn remote_id_of(&self, path: &std::path::Path) -> Option<&str> {
        self.uploads
            .iter()
            .find(|u| u.kind == UploadKind::Archive && u.path == path)
            .map(|u| u.remote_id.as_str())
    }
}

impl fmt::Display for UploadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for upload in &self.uploads {
            match &upload.parent_id {
                Some(parent) => writeln!(
                    f,
                    "  {} -> {} (child of {})",
                    upload.artifact_name, upload.remote_id, parent
                )?,
                None => writeln!(f, "  {} -> {}", upload.artifact_name, upload.remote_id)?,
            }
        }
        write!(
            f,
            "{} artifact(s) uploaded, {} pom(s)",
            self.archive_count(),
            self.len() - self.archive_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let report = UploadReport {
            uploads: vec![
                UploadedArtifact {
                    path: PathBuf::from("/a.jar"),
                    artifact_name: "a-1.0.jar".to_string(),
                    kind: UploadKind::Archive,
                    parent_id: None,
                    remote_id: "r1".to_string(),
                    elapsed_ms: 3,
                },
                UploadedArtifact {
                    path: PathBuf::from("/a.jar"),
                    artifact_name: "a-1.0.pom".to_string(),
                    kind: UploadKind::Pom,
                    parent_id: Some("r1".to_string()),
                    remote_id: "r2".to_string(),
                    elapsed_ms: 1,
                },
            ],
        };
        assert_eq!(report.archive_count(), 1);
        assert_eq!(report.remote_id_of(std::path::Path::new("/a.jar")), Some("r1"));
        let text = report.to_string();
        assert!(text.contains("a-1.0.pom -> r2 (child of r1)"));
        assert!(text.ends_with("1 artifact(s) uploaded, 1 pom(s)"));
    }
}
