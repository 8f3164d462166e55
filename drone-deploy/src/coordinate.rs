//! Maven coordinate resolution.
//!
//! A file's GAV comes from the `pom.xml` Maven embeds under
//! `META-INF/maven/<group>/<artifact>/`. Companion files such as
//! `-sources.jar` carry no descriptor; they borrow the coordinate of the
//! sibling whose name they extend.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use drone_deploy::coordinate::resolve;
//!
//! let files = vec![
//!     PathBuf::from("out/acme.bundle-1.0.0.jar"),
//!     PathBuf::from("out/acme.bundle-1.0.0-sources.jar"),
//! ];
//! let gav = resolve(&files[1], &files)?;
//! println!("{}", gav);
//! # Ok::<(), drone_deploy::DeployError>(())
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::archive::JarArchive;
use crate::artifact::{file_stem, Gav};
use crate::error::{DeployError, DeployResult};

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Resolve the Maven coordinate of `file`.
///
/// `siblings` is the full candidate set; it may contain `file` itself.
pub fn resolve(file: &Path, siblings: &[PathBuf]) -> DeployResult<Gav> {
    let not_resolvable = |reason: String| DeployError::NotResolvable {
        path: file.to_path_buf(),
        reason,
    };

    let mut jar = JarArchive::open(file).map_err(|e| not_resolvable(e.to_string()))?;
    let descriptor = jar
        .find_entry(|name| name.starts_with("META-INF/maven/") && name.ends_with("/pom.xml"))
        .or_else(|| jar.find_entry(|name| name.ends_with("pom.xml")));

    let Some(entry) = descriptor else {
        drop(jar);
        return match descriptor_sibling(file, siblings) {
            Some(sibling) => {
                debug!(
                    path = %file.display(),
                    sibling = %sibling.display(),
                    "No pom.xml, using sibling coordinate"
                );
                resolve(sibling, siblings)
            }
            None => Err(not_resolvable(
                "no pom.xml and no sibling to inherit from".to_string(),
            )),
        };
    };

    let xml = jar
        .read_entry_string(&entry)
        .map_err(|e| not_resolvable(e.to_string()))?
        .ok_or_else(|| not_resolvable(format!("{} vanished from archive", entry)))?;
    let mut gav =
        parse_pom(&xml).map_err(|reason| not_resolvable(format!("{}: {}", entry, reason)))?;

    if gav.version.ends_with(SNAPSHOT_SUFFIX) {
        gav.version = snapshot_version(&file_stem(file), &gav.version);
    }
    Ok(gav)
}

/// Read group, artifact and version from a POM.
///
/// Group and version fall back to the `<parent>` element.
pub fn parse_pom(xml: &str) -> Result<Gav, String> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| e.to_string())?;
    let project = doc.root_element();
    if project.tag_name().name() != "project" {
        return Err(format!(
            "root element is <{}>, expected <project>",
            project.tag_name().name()
        ));
    }

    let parent = project
        .children()
        .find(|node| node.is_element() && node.tag_name().name() == "parent");

    let group =
        child_text(project, "groupId").or_else(|| parent.and_then(|p| child_text(p, "groupId")));
    let artifact = child_text(project, "artifactId");
    let version =
        child_text(project, "version").or_else(|| parent.and_then(|p| child_text(p, "version")));

    match (group, artifact, version) {
        (Some(group), Some(artifact), Some(version)) => Ok(Gav {
            group,
            artifact,
            version,
        }),
        (None, _, _) => Err("groupId missing".to_string()),
        (_, None, _) => Err("artifactId missing".to_string()),
        (_, _, None) => Err("version missing".to_string()),
    }
}

fn child_text(parent: roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    parent
        .children()
        .find(|node| node.is_element() && node.tag_name().name() == name)
        .and_then(|node| node.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Replace a `-SNAPSHOT` version with the one baked into the file name.
///
/// `acme.bundle-1.0.0.v2018` yields `1.0.0.v2018`. A stem without a hyphen
/// keeps the descriptor version.
pub fn snapshot_version(stem: &str, descriptor_version: &str) -> String {
    match stem.split_once('-') {
        Some((_, version)) if !version.is_empty() => version.to_string(),
        _ => descriptor_version.to_string(),
    }
}

/// The sibling whose stem this file's stem extends with `-`. Longest wins.
fn descriptor_sibling<'a>(file: &Path, siblings: &'a [PathBuf]) -> Option<&'a PathBuf> {
    let stem = file_stem(file);
    siblings
        .iter()
        .filter(|sibling| sibling.as_path() != file)
        .filter_map(|sibling| {
            let candidate = file_stem(sibling);
            let extends = stem.len() > candidate.len() + 1
                && stem.starts_with(&candidate)
                && stem[candidate.len()..].starts_with('-');
            extends.then_some((candidate.len(), sibling))
        })
        .max_by_key(|(len, _)| *len)
        .map(|(_, sibling)| sibling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pom_direct() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
            <modelVersion>4.0.0</modelVersion>
            <groupId>com.acme</groupId>
            <artifactId>acme.bundle</artifactId>
            <version>1.0.0</version>
        </project>"#;
        assert_eq!(parse_pom(xml).unwrap(), Gav::new("com.acme", "acme.bundle", "1.0.0"));
    }

    #[test]
    fn test_parse_pom_parent_fallback() {
        let xml = r#"<project>
            <parent>
                <groupId>com.acme</groupId>
                <artifactId>acme.parent</artifactId>
                <version>2.1.0</version>
            </parent>
            <artifactId>acme.child</artifactId>
        </project>"#;
        assert_eq!(parse_pom(xml).unwrap(), Gav::new("com.acme", "acme.child", "2.1.0"));
    }

    #[test]
    fn test_parse_pom_own_values_beat_parent() {
        let xml = r#"<project>
            <parent><groupId>p</groupId><version>9</version></parent>
            <groupId>own</groupId>
            <artifactId>a</artifactId>
            <version>1</version>
        </project>"#;
        assert_eq!(parse_pom(xml).unwrap(), Gav::new("own", "a", "1"));
    }

    #[test]
    fn test_parse_pom_missing_artifact() {
        let xml = "<project><groupId>g</groupId><version>1</version></project>";
        assert!(parse_pom(xml).unwrap_err().contains("artifactId"));
    }

    #[test]
    fn test_parse_pom_ignores_dependency_versions() {
        let xml = r#"<project>
            <groupId>g</groupId>
            <artifactId>a</artifactId>
            <dependencies>
                <dependency><groupId>x</groupId><artifactId>y</artifactId><version>5</version></dependency>
            </dependencies>
        </project>"#;
        assert!(parse_pom(xml).is_err());
    }

    #[test]
    fn test_snapshot_version_from_stem() {
        assert_eq!(
            snapshot_version("acme.bundle-1.0.0.v20180101", "1.0.0-SNAPSHOT"),
            "1.0.0.v20180101"
        );
        assert_eq!(snapshot_version("lib-2.0-20180101", "2.0-SNAPSHOT"), "2.0-20180101");
        assert_eq!(snapshot_version("nohyphen", "1.0-SNAPSHOT"), "1.0-SNAPSHOT");
    }

    #[test]
    fn test_descriptor_sibling_prefers_longest() {
        let files = vec![
            PathBuf::from("/o/acme-1.0.jar"),
            PathBuf::from("/o/acme-1.0-tests.jar"),
            PathBuf::from("/o/acme-1.0-tests-sources.jar"),
        ];
        assert_eq!(
            descriptor_sibling(&files[2], &files),
            Some(&PathBuf::from("/o/acme-1.0-tests.jar"))
        );
        assert_eq!(descriptor_sibling(&files[0], &files), None);
    }

    #[test]
    fn test_descriptor_sibling_needs_hyphen() {
        let files = vec![PathBuf::from("/o/acme.jar"), PathBuf::from("/o/acme.ui.jar")];
        assert_eq!(descriptor_sibling(&files[1], &files), None);
    }
}
