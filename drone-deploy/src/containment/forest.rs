//! Forest assembly.

use std::collections::BTreeMap;

use tracing::debug;

use super::policy::ChildPolicy;
use super::relation::select_parents;
use crate::artifact::{ArtifactId, ArtifactSet};

/// Roots of the upload forest plus the containment relation they came from.
///
/// Under [`ChildPolicy::IncludeChildren`] the nesting is stored in each
/// record's `children`. Under the other policies `children` stays empty.
#[derive(Debug, Clone)]
pub struct Forest {
    policy: ChildPolicy,
    roots: Vec<ArtifactId>,
    parents: BTreeMap<ArtifactId, ArtifactId>,
    excluded: Vec<ArtifactId>,
}

impl Forest {
    /// Resolve containment over `set` and assemble the forest for `policy`.
    ///
    /// Roots come out parents-before-children (by containment depth), ties by
    /// path.
    pub fn build(set: &mut ArtifactSet, policy: ChildPolicy) -> Self {
        let parents = select_parents(set);
        for id in set.ids().collect::<Vec<_>>() {
            set.get_mut(id).children.clear();
        }

        let depth = |id: ArtifactId| {
            let mut depth = 0usize;
            let mut current = id;
            while let Some(parent) = parents.get(&current) {
                depth += 1;
                current = *parent;
            }
            depth
        };

        let (mut roots, excluded): (Vec<ArtifactId>, Vec<ArtifactId>) = match policy {
            ChildPolicy::Normal => (set.ids().collect(), Vec::new()),
            ChildPolicy::IncludeChildren => {
                for (child, parent) in &parents {
                    set.get_mut(*parent).children.push(*child);
                }
                (
                    set.ids().filter(|id| !parents.contains_key(id)).collect(),
                    Vec::new(),
                )
            }
            ChildPolicy::ExcludeChildren => set.ids().partition(|id| !parents.contains_key(id)),
        };
        roots.sort_by_key(|id| (depth(*id), *id));

        debug!(
            policy = %policy,
            roots = roots.len(),
            contained = parents.len(),
            excluded = excluded.len(),
            "Built artifact forest"
        );

        Self {
            policy,
            roots,
            parents,
            excluded,
        }
    }

    pub fn policy(&self) -> ChildPolicy {
        self.policy
    }

    /// Records uploaded as roots, in upload order.
    pub fn roots(&self) -> &[ArtifactId] {
        &self.roots
    }

    /// The containing record, whatever the policy.
    pub fn parent_of(&self, id: ArtifactId) -> Option<ArtifactId> {
        self.parents.get(&id).copied()
    }

    /// Records dropped by [`ChildPolicy::ExcludeChildren`].
    pub fn excluded(&self) -> &[ArtifactId] {
        &self.excluded
    }

    /// Pre-order walk of the forest with depths, roots in order.
    pub fn walk(&self, set: &ArtifactSet) -> Vec<(ArtifactId, usize)> {
        let mut out = Vec::with_capacity(set.len());
        for root in &self.roots {
            let mut stack = vec![(*root, 0usize)];
            while let Some((id, depth)) = stack.pop() {
                out.push((id, depth));
                for child in set.get(id).children.iter().rev() {
                    stack.push((*child, depth + 1));
                }
            }
        }
        out
    }
}
