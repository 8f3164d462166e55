//! Containment resolution.
//!
//! Decides which artifact belongs to which: a `-sources.jar` to its binary, a
//! bundle to the feature listing it, a fragment to its host bundle. The
//! result is a [`Forest`] whose shape depends on the [`ChildPolicy`].

mod forest;
mod policy;
mod relation;

pub use forest::Forest;
pub use policy::ChildPolicy;
pub use relation::{containment, extends_file_name, select_parents, Containment};

pub(crate) use relation::is_feature_member;
