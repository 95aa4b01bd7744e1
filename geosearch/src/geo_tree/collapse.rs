//! Removal-time compaction.
//!
//! When a removal empties a leaf that has a parent, the tree hands the parent
//! to its [`CollapsePolicy`]. Insertion and search never look at the policy.

use serde::{Deserialize, Serialize};

use super::geo_node::{GeoNode, Side};

/// What to do with the parent of a leaf that a removal has emptied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapsePolicy {
    /// Overwrite the parent with the sibling subtree, deleting one level.
    ///
    /// A promoted internal sibling keeps split values chosen for the axis one
    /// level deeper, so its subtree may no longer satisfy the split invariant
    /// at its new depth. Searches can then miss objects stored below it.
    #[default]
    PromoteSibling,
    /// Leave the empty leaf where it is.
    KeepEmptyLeaf,
    /// Promote the sibling only when it is a leaf; otherwise keep the empty
    /// leaf. A leaf has no axis-dependent splits, so the tree stays valid.
    PromoteLeafSibling,
}

impl CollapsePolicy {
    /// Applies the policy to `parent`, whose child on `emptied` just became
    /// an empty leaf. Returns true if the parent was overwritten.
    pub(crate) fn apply<T>(self, parent: &mut GeoNode<'_, T>, emptied: Side) -> bool {
        let sibling_side = emptied.opposite();
        let promote = match self {
            CollapsePolicy::PromoteSibling => true,
            CollapsePolicy::KeepEmptyLeaf => false,
            CollapsePolicy::PromoteLeafSibling => parent
                .child(sibling_side)
                .map(GeoNode::is_leaf)
                .unwrap_or(false),
        };

        if promote {
            let parent_id = parent.id();
            parent.promote_child(sibling_side);
            log::debug!(
                "collapsed node {}: sibling {} promoted into its place",
                parent_id,
                parent.id()
            );
        }
        promote
    }
}
