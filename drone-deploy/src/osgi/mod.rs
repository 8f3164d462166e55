//! OSGi packaging metadata.
//!
//! Versions and ranges, JAR manifest headers, the `Fragment-Host` header and
//! Eclipse feature descriptors. Everything here works on text already read
//! out of an archive; archive access lives in [`crate::archive`].

mod feature;
mod host;
mod manifest;
mod version;

pub use feature::{EntryKind, FeatureDescriptor, FeatureEntry, FEATURE_DESCRIPTOR_PATH};
pub use host::FragmentHost;
pub use manifest::{Manifest, BUNDLE_SYMBOLIC_NAME, BUNDLE_VERSION, FRAGMENT_HOST, MANIFEST_PATH};
pub use version::{Version, VersionRange};
