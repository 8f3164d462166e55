//! `Fragment-Host` header parsing.

use std::str::FromStr;

use super::version::{Version, VersionRange};
use crate::error::DeployError;

/// The host a fragment attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentHost {
    /// Symbolic name of the host bundle.
    pub host_id: String,

    /// Acceptable host versions. `[0.0.0,∞)` when the header gives none.
    pub range: VersionRange,
}

impl FragmentHost {
    /// Whether a bundle with the given identity satisfies this header.
    pub fn accepts(&self, id: &str, version: &Version) -> bool {
        self.host_id == id && self.range.includes(version)
    }
}

impl FromStr for FragmentHost {
    type Err = DeployError;

    /// Parse a header such as `my.bundle;bundle-version="[1.0.0,2.0.0)"`.
    fn from_str(header: &str) -> Result<Self, Self::Err> {
        let mut parts = header.split(';');
        let host_id = parts.next().unwrap_or_default().trim();
        if host_id.is_empty() {
            return Err(DeployError::InvalidVersion(format!(
                "Fragment-Host '{}' names no host",
                header
            )));
        }

        let mut range = VersionRange::any();
        for parameter in parts {
            let Some((name, value)) = parameter.split_once('=') else {
                continue;
            };
            if name.trim() == "bundle-version" {
                range = value.parse()?;
            }
        }

        Ok(Self {
            host_id: host_id.to_string(),
            range,
        })
    }
}
