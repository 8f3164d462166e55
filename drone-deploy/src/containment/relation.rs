//! The "does A contain B" tests and parent selection.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::artifact::{ArtifactId, ArtifactRecord, ArtifactSet};

/// Why one artifact contains another. Declaration order is preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Containment {
    /// The child's file name extends the parent's with `-`.
    Filename,
    /// The parent feature lists the child.
    FeatureMember,
    /// The child fragment attaches to the parent bundle.
    FragmentHost,
}

/// Check whether `parent` contains `child`.
///
/// Filename containment is tested first; when it holds, the OSGi tests are
/// not consulted.
pub fn containment(parent: &ArtifactRecord, child: &ArtifactRecord) -> Option<Containment> {
    if extends_file_name(&parent.stem(), &child.stem()) {
        return Some(Containment::Filename);
    }
    if is_feature_member(parent, child) {
        return Some(Containment::FeatureMember);
    }
    if is_hosted_fragment(parent, child) {
        return Some(Containment::FragmentHost);
    }
    None
}

/// `child_stem` starts with `parent_stem` followed by `-`.
pub fn extends_file_name(parent_stem: &str, child_stem: &str) -> bool {
    child_stem
        .strip_prefix(parent_stem)
        .is_some_and(|rest| rest.len() > 1 && rest.starts_with('-'))
}

pub(crate) fn is_feature_member(parent: &ArtifactRecord, child: &ArtifactRecord) -> bool {
    if !parent.kind.is_feature() || !child.kind.is_osgi() {
        return false;
    }
    match (&parent.feature, &child.identity) {
        (Some(feature), Some(identity)) => feature.lists(
            &identity.symbolic_id,
            &identity.version,
            &child.coordinate.version,
        ),
        _ => false,
    }
}

fn is_hosted_fragment(parent: &ArtifactRecord, child: &ArtifactRecord) -> bool {
    if !parent.kind.can_host_fragments() || !child.kind.attaches_to_host() {
        return false;
    }
    match (&child.fragment_host, &parent.identity) {
        (Some(host), Some(identity)) => host.accepts(&identity.symbolic_id, &identity.version),
        _ => false,
    }
}

/// Pick at most one parent per record.
///
/// Candidates are ranked filename matches first (longest parent stem
/// first), then feature membership, then fragment-host, then by path. A
/// candidate that would close a cycle is skipped in favour of the next one.
pub fn select_parents(set: &ArtifactSet) -> BTreeMap<ArtifactId, ArtifactId> {
    let mut parents: BTreeMap<ArtifactId, ArtifactId> = BTreeMap::new();

    for (child_id, child) in set.iter() {
        let mut candidates: Vec<(Containment, usize, ArtifactId)> = set
            .iter()
            .filter(|(id, _)| *id != child_id)
            .filter_map(|(id, parent)| {
                containment(parent, child).map(|how| (how, parent.stem().len(), id))
            })
            .collect();
        // ArtifactSet is sorted by path, so the id breaks remaining ties by path.
        candidates.sort_by_key(|(how, stem_len, id)| {
            let specificity = match how {
                Containment::Filename => *stem_len,
                Containment::FeatureMember | Containment::FragmentHost => 0,
            };
            (*how, Reverse(specificity), *id)
        });

        let chosen = candidates
            .into_iter()
            .map(|(_, _, id)| id)
            .find(|candidate| !is_ancestor_or_self(&parents, child_id, *candidate));
        if let Some(parent_id) = chosen {
            parents.insert(child_id, parent_id);
        }
    }

    parents
}

/// Whether walking up the parent chain from `start` reaches `target`.
fn is_ancestor_or_self(
    parents: &BTreeMap<ArtifactId, ArtifactId>,
    target: ArtifactId,
    start: ArtifactId,
) -> bool {
    let mut current = Some(start);
    while let Some(id) = current {
        if id == target {
            return true;
        }
        current = parents.get(&id).copied();
    }
    false
}
