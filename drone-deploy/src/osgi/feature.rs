//! Eclipse feature descriptor (`feature.xml`) parsing.

use std::str::FromStr;

use super::version::Version;

/// Path of the feature descriptor inside a feature JAR.
pub const FEATURE_DESCRIPTOR_PATH: &str = "feature.xml";

/// What a feature entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// `<plugin>`: a bundle or fragment.
    Plugin,
    /// `<includes>`: a nested feature.
    Feature,
}

/// One member listed by a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEntry {
    pub id: String,
    /// Version exactly as written in the descriptor.
    pub version: String,
    pub kind: EntryKind,
}

impl FeatureEntry {
    /// Whether this entry names the given identity.
    ///
    /// The version is compared as an OSGi version, or literally against
    /// `literal_version` (a Maven coordinate version).
    pub fn matches(&self, id: &str, version: &Version, literal_version: &str) -> bool {
        if self.id != id {
            return false;
        }
        match Version::from_str(&self.version) {
            Ok(parsed) if &parsed == version => true,
            _ => self.version == literal_version,
        }
    }
}

/// Parsed feature descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDescriptor {
    pub id: String,
    pub version: Version,
    pub entries: Vec<FeatureEntry>,
}

impl FeatureDescriptor {
    /// Parse `feature.xml` content.
    ///
    /// `<requires>` imports are dependencies rather than members and are not
    /// collected.
    pub fn parse(xml: &str) -> Result<Self, String> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| e.to_string())?;
        let root = doc.root_element();
        if root.tag_name().name() != "feature" {
            return Err(format!(
                "root element is <{}>, expected <feature>",
                root.tag_name().name()
            ));
        }

        let id = root
            .attribute("id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or("feature has no id")?;
        let version = root
            .attribute("version")
            .ok_or("feature has no version")?
            .parse::<Version>()
            .map_err(|e| e.to_string())?;

        let entries = root
            .children()
            .filter(|node| node.is_element())
            .filter_map(|node| {
                let kind = match node.tag_name().name() {
                    "plugin" => EntryKind::Plugin,
                    "includes" => EntryKind::Feature,
                    _ => return None,
                };
                let id = node.attribute("id")?.trim();
                Some(FeatureEntry {
                    id: id.to_string(),
                    version: node.attribute("version").unwrap_or("0.0.0").trim().to_string(),
                    kind,
                })
            })
            .collect();

        Ok(Self {
            id: id.to_string(),
            version,
            entries,
        })
    }

    /// Whether any entry names the given identity.
    pub fn lists(&self, id: &str, version: &Version, literal_version: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.matches(id, version, literal_version))
    }
}
