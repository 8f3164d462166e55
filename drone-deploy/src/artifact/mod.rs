//! Artifact records.
//!
//! One [`ArtifactRecord`] exists per candidate file. Records are created
//! unclassified, filled in by [`crate::classify`], linked by
//! [`crate::containment`] and finally given a remote id by the uploader.
//! They live in an [`ArtifactSet`] arena; everything else refers to them by
//! [`ArtifactId`].

mod kind;
mod record;

pub use kind::ArtifactKind;
pub use record::{ArtifactId, ArtifactRecord, ArtifactSet, Classification, Gav, OsgiIdentity};

pub(crate) use record::{file_name, file_stem};
