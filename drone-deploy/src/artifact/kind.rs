//! The closed set of artifact kinds.

use std::fmt;

/// What a candidate file turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Bundle,
    Fragment,
    SourceBundle,
    SourceFragment,
    TestFragment,
    SourceTestFragment,
    Feature,
    SourceFeature,
    /// A plain Maven JAR without OSGi metadata.
    MavenModule,
    /// Not classified yet.
    Undefined,
}

impl ArtifactKind {
    pub fn is_feature(self) -> bool {
        match self {
            Self::Feature | Self::SourceFeature => true,
            Self::Bundle
            | Self::Fragment
            | Self::SourceBundle
            | Self::SourceFragment
            | Self::TestFragment
            | Self::SourceTestFragment
            | Self::MavenModule
            | Self::Undefined => false,
        }
    }

    /// Source companions are uploaded with the `sources` classifier.
    pub fn is_source(self) -> bool {
        match self {
            Self::SourceBundle
            | Self::SourceFragment
            | Self::SourceTestFragment
            | Self::SourceFeature => true,
            Self::Bundle
            | Self::Fragment
            | Self::TestFragment
            | Self::Feature
            | Self::MavenModule
            | Self::Undefined => false,
        }
    }

    /// Whether records of this kind carry an OSGi identity.
    pub fn is_osgi(self) -> bool {
        match self {
            Self::MavenModule | Self::Undefined => false,
            Self::Bundle
            | Self::Fragment
            | Self::SourceBundle
            | Self::SourceFragment
            | Self::TestFragment
            | Self::SourceTestFragment
            | Self::Feature
            | Self::SourceFeature => true,
        }
    }

    /// Kinds a fragment can attach to.
    pub fn can_host_fragments(self) -> bool {
        match self {
            Self::Bundle | Self::Fragment => true,
            Self::SourceBundle
            | Self::SourceFragment
            | Self::TestFragment
            | Self::SourceTestFragment
            | Self::Feature
            | Self::SourceFeature
            | Self::MavenModule
            | Self::Undefined => false,
        }
    }

    /// Kinds that are nested under their `Fragment-Host`.
    pub fn attaches_to_host(self) -> bool {
        match self {
            Self::Fragment | Self::TestFragment => true,
            Self::Bundle
            | Self::SourceBundle
            | Self::SourceFragment
            | Self::SourceTestFragment
            | Self::Feature
            | Self::SourceFeature
            | Self::MavenModule
            | Self::Undefined => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bundle => "bundle",
            Self::Fragment => "fragment",
            Self::SourceBundle => "source-bundle",
            Self::SourceFragment => "source-fragment",
            Self::TestFragment => "test-fragment",
            Self::SourceTestFragment => "source-test-fragment",
            Self::Feature => "feature",
            Self::SourceFeature => "source-feature",
            Self::MavenModule => "maven-module",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
