//! What happens to contained artifacts.

use std::fmt;
use std::str::FromStr;

use crate::error::DeployError;

/// How contained (child) artifacts are treated during upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildPolicy {
    /// Every artifact is uploaded as its own root.
    #[default]
    Normal,
    /// Children are uploaded under their parent.
    IncludeChildren,
    /// Children are not uploaded at all.
    ExcludeChildren,
}

impl ChildPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::IncludeChildren => "include-children",
            Self::ExcludeChildren => "exclude-children",
        }
    }
}

impl fmt::Display for ChildPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChildPolicy {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "include-children" => Ok(Self::IncludeChildren),
            "exclude-children" => Ok(Self::ExcludeChildren),
            other => Err(DeployError::InvalidConfig(format!(
                "unknown child artifact policy '{}' (expected normal, include-children or exclude-children)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policies() {
        assert_eq!("normal".parse::<ChildPolicy>().unwrap(), ChildPolicy::Normal);
        assert_eq!(
            " Include-Children ".parse::<ChildPolicy>().unwrap(),
            ChildPolicy::IncludeChildren
        );
        assert_eq!(
            "exclude-children".parse::<ChildPolicy>().unwrap(),
            ChildPolicy::ExcludeChildren
        );
    }

    #[test]
    fn test_unknown_policy_is_config_error() {
        assert!(matches!(
            "children".parse::<ChildPolicy>(),
            Err(DeployError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_display_matches_parse() {
        for policy in [
            ChildPolicy::Normal,
            ChildPolicy::IncludeChildren,
            ChildPolicy::ExcludeChildren,
        ] {
            assert_eq!(policy.to_string().parse::<ChildPolicy>().unwrap(), policy);
        }
    }
}
