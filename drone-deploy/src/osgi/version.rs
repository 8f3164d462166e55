//! OSGi versions and version ranges.
//!
//! OSGi versions have the form `major[.minor[.micro[.qualifier]]]`, which is
//! not semver compatible (the qualifier is separated by a dot and compares
//! lexically), so they get their own type.

use std::fmt;
use std::str::FromStr;

use crate::error::DeployError;

/// An OSGi version.
///
/// Ordering follows the OSGi core specification: numeric components first,
/// then the qualifier compared as a string.
///
/// # Example
///
/// ```
/// use drone_deploy::osgi::Version;
///
/// let v: Version = "1.2".parse().unwrap();
/// assert_eq!(v.to_string(), "1.2.0");
/// assert!(v < "1.2.0.v2018".parse().unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub micro: u64,
    pub qualifier: String,
}

impl Version {
    /// The empty version `0.0.0`.
    pub const ZERO: Version = Version {
        major: 0,
        minor: 0,
        micro: 0,
        qualifier: String::new(),
    };

    /// Create a version without qualifier.
    pub fn new(major: u64, minor: u64, micro: u64) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    /// Set the qualifier.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }
}

impl FromStr for Version {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DeployError::InvalidVersion("empty version".to_string()));
        }

        let mut parts = s.splitn(4, '.');
        let mut numeric = [0u64; 3];
        for (i, slot) in numeric.iter_mut().enumerate() {
            match parts.next() {
                Some(part) => {
                    *slot = part.parse().map_err(|_| {
                        DeployError::InvalidVersion(format!(
                            "'{}': component {} is not a number",
                            s,
                            i + 1
                        ))
                    })?;
                }
                None => break,
            }
        }

        let qualifier = parts.next().unwrap_or_default();
        if !qualifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DeployError::InvalidVersion(format!(
                "'{}': invalid qualifier",
                s
            )));
        }

        Ok(Self {
            major: numeric[0],
            minor: numeric[1],
            micro: numeric[2],
            qualifier: qualifier.to_string(),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

/// An OSGi version range such as `[1.0.0,2.0.0)`.
///
/// A bare version `1.0` means "at least 1.0", with no upper bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    pub floor: Version,
    pub floor_inclusive: bool,
    pub ceiling: Option<Version>,
    pub ceiling_inclusive: bool,
}

impl VersionRange {
    /// Range `[floor, ∞)`.
    pub fn at_least(floor: Version) -> Self {
        Self {
            floor,
            floor_inclusive: true,
            ceiling: None,
            ceiling_inclusive: false,
        }
    }

    /// Range matching every version, `[0.0.0, ∞)`.
    pub fn any() -> Self {
        Self::at_least(Version::ZERO)
    }

    /// Check whether a version lies within this range.
    pub fn includes(&self, version: &Version) -> bool {
        let above_floor = if self.floor_inclusive {
            version >= &self.floor
        } else {
            version > &self.floor
        };
        let below_ceiling = match &self.ceiling {
            None => true,
            Some(ceiling) if self.ceiling_inclusive => version <= ceiling,
            Some(ceiling) => version < ceiling,
        };
        above_floor && below_ceiling
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self::any()
    }
}

impl FromStr for VersionRange {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_matches('"').trim();
        let floor_inclusive = match s.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => return Ok(Self::at_least(s.parse()?)),
        };
        let ceiling_inclusive = match s.chars().last() {
            Some(']') => true,
            Some(')') => false,
            _ => {
                return Err(DeployError::InvalidVersion(format!(
                    "'{}': unterminated range",
                    s
                )))
            }
        };

        let inner = &s[1..s.len() - 1];
        let (floor, ceiling) = inner.split_once(',').ok_or_else(|| {
            DeployError::InvalidVersion(format!("'{}': range needs two bounds", s))
        })?;

        let ceiling = ceiling.trim();
        Ok(Self {
            floor: floor.parse()?,
            floor_inclusive,
            ceiling: if ceiling.is_empty() {
                None
            } else {
                Some(ceiling.parse()?)
            },
            ceiling_inclusive,
        })
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.floor_inclusive { '[' } else { '(' };
        match &self.ceiling {
            Some(ceiling) => {
                let close = if self.ceiling_inclusive { ']' } else { ')' };
                write!(f, "{}{},{}{}", open, self.floor, ceiling, close)
            }
            None => write!(f, "{}{},∞)", open, self.floor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_full_version() {
        let v: Version = "1.2.3.v20180101".parse().unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.micro, 3);
        assert_eq!(v.qualifier, "v20180101");
    }

    #[test]
    fn test_parse_short_version_pads_zeros() {
        let v: Version = "2".parse().unwrap();
        assert_eq!(v, Version::new(2, 0, 0));
        assert_eq!(v.to_string(), "2.0.0");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Version>().is_err());
        assert!("one.two".parse::<Version>().is_err());
        assert!("1.0.0.bad qualifier".parse::<Version>().is_err());
    }

    #[test]
    fn test_qualifier_ordering() {
        let plain = Version::new(1, 0, 0);
        let qualified = Version::new(1, 0, 0).with_qualifier("SNAPSHOT");
        assert!(plain < qualified);
        assert!(qualified < Version::new(1, 0, 1));
    }

    #[test]
    fn test_range_half_open() {
        let range: VersionRange = "[1.0.0,2.0.0)".parse().unwrap();
        assert!(range.includes(&Version::new(1, 0, 0)));
        assert!(range.includes(&Version::new(1, 9, 9)));
        assert!(!range.includes(&Version::new(2, 0, 0)));
        assert!(!range.includes(&Version::new(0, 9, 0)));
    }

    #[test]
    fn test_range_exclusive_floor_inclusive_ceiling() {
        let range: VersionRange = "(1.0,2.0]".parse().unwrap();
        assert!(!range.includes(&Version::new(1, 0, 0)));
        assert!(range.includes(&Version::new(2, 0, 0)));
    }

    #[test]
    fn test_range_bare_version_is_minimum() {
        let range: VersionRange = "\"1.5\"".parse().unwrap();
        assert_eq!(range, VersionRange::at_least(Version::new(1, 5, 0)));
        assert!(range.includes(&Version::new(99, 0, 0)));
    }

    #[test]
    fn test_range_rejects_unterminated() {
        assert!("[1.0,2.0".parse::<VersionRange>().is_err());
        assert!("[1.0]".parse::<VersionRange>().is_err());
    }

    proptest! {
        #[test]
        fn prop_any_range_includes_everything(major in 0u64..1000, minor in 0u64..1000, micro in 0u64..1000) {
            prop_assert!(VersionRange::any().includes(&Version::new(major, minor, micro)));
        }

        #[test]
        fn prop_half_open_range_excludes_ceiling(major in 0u64..1000, minor in 0u64..1000) {
            let floor = Version::new(major, minor, 0);
            let ceiling = Version::new(major + 1, 0, 0);
            let range: VersionRange = format!("[{},{})", floor, ceiling).parse().unwrap();
            prop_assert!(range.includes(&floor));
            prop_assert!(!range.includes(&ceiling));
        }
    }
}
