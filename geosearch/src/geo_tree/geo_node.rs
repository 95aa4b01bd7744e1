//! Tree nodes.
//!
//! A node is either a leaf holding a capped bucket of object references or an
//! internal node holding a split value and two children. Nodes change shape in
//! place: a full leaf becomes an internal node in the same slot, and the
//! collapse step overwrites an internal node with one of its children.

use std::fmt::{self, Display, Write};

use super::geo_constants::DUMP_INDENT;
use super::geo_types::NodeId;
use crate::geometry::{AxisCycle, Locatable};

/// Which child of an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Node types in the tree
#[derive(Debug)]
pub(crate) enum GeoNode<'a, T> {
    /// Leaf node holding stored objects directly
    Leaf {
        id: NodeId,
        bucket: Vec<&'a T>,
        capacity: usize,
    },
    /// Internal node; `left` holds coordinates below `split_value` on the
    /// node's axis, `right` the rest
    Internal {
        id: NodeId,
        split_value: f64,
        left: Box<GeoNode<'a, T>>,
        right: Box<GeoNode<'a, T>>,
    },
}

impl<'a, T> GeoNode<'a, T> {
    /// Creates an empty leaf.
    pub(crate) fn new_leaf(id: NodeId, capacity: usize) -> Self {
        GeoNode::Leaf {
            id,
            bucket: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn id(&self) -> NodeId {
        match self {
            GeoNode::Leaf { id, .. } | GeoNode::Internal { id, .. } => *id,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, GeoNode::Leaf { .. })
    }

    /// Returns true if the leaf bucket is at capacity.
    ///
    /// # Panics
    ///
    /// Panics on an internal node.
    pub(crate) fn is_full(&self) -> bool {
        match self {
            GeoNode::Leaf {
                bucket, capacity, ..
            } => bucket.len() >= *capacity,
            GeoNode::Internal { id, .. } => panic!("is_full called on internal node {}", id),
        }
    }

    /// Number of objects held directly by this node; zero for internal nodes.
    pub(crate) fn population(&self) -> usize {
        match self {
            GeoNode::Leaf { bucket, .. } => bucket.len(),
            GeoNode::Internal { .. } => 0,
        }
    }

    /// Appends an object to the leaf bucket.
    ///
    /// # Panics
    ///
    /// Panics on an internal node or a full leaf.
    pub(crate) fn add_to_leaf(&mut self, object: &'a T) {
        match self {
            GeoNode::Leaf {
                id,
                bucket,
                capacity,
            } => {
                assert!(
                    bucket.len() < *capacity,
                    "leaf {} is full ({} objects); it must be split first",
                    id,
                    capacity
                );
                bucket.push(object);
            }
            GeoNode::Internal { id, .. } => {
                panic!("add_to_leaf called on internal node {}", id)
            }
        }
    }

    /// Removes the object at `index`, keeping the order of the rest.
    ///
    /// # Panics
    ///
    /// Panics on an internal node or an out-of-range index.
    pub(crate) fn remove_from_leaf(&mut self, index: usize) -> &'a T {
        match self {
            GeoNode::Leaf { bucket, .. } => bucket.remove(index),
            GeoNode::Internal { id, .. } => {
                panic!("remove_from_leaf called on internal node {}", id)
            }
        }
    }

    /// Index of `object` in the leaf bucket, compared by identity.
    pub(crate) fn position_of(&self, object: &T) -> Option<usize> {
        match self {
            GeoNode::Leaf { bucket, .. } => {
                bucket.iter().position(|stored| std::ptr::eq(*stored, object))
            }
            GeoNode::Internal { .. } => None,
        }
    }

    /// The side a coordinate on this node's axis descends into.
    pub(crate) fn side_for(&self, coordinate: f64) -> Side {
        match self {
            GeoNode::Internal { split_value, .. } if coordinate < *split_value => Side::Left,
            GeoNode::Internal { .. } => Side::Right,
            GeoNode::Leaf { id, .. } => panic!("side_for called on leaf {}", id),
        }
    }

    /// Mutable access to one child of an internal node.
    ///
    /// # Panics
    ///
    /// Panics on a leaf.
    pub(crate) fn child_mut(&mut self, side: Side) -> &mut GeoNode<'a, T> {
        match self {
            GeoNode::Internal { left, .. } if side == Side::Left => &mut **left,
            GeoNode::Internal { right, .. } => &mut **right,
            GeoNode::Leaf { id, .. } => panic!("child_mut called on leaf {}", id),
        }
    }

    /// Shared access to one child; `None` on a leaf.
    pub(crate) fn child(&self, side: Side) -> Option<&GeoNode<'a, T>> {
        match self {
            GeoNode::Internal { left, right, .. } => Some(match side {
                Side::Left => &**left,
                Side::Right => &**right,
            }),
            GeoNode::Leaf { .. } => None,
        }
    }

    /// Overwrites this internal node with its child on `side`.
    ///
    /// The child's whole state moves up, id included; the other child is
    /// dropped.
    ///
    /// # Panics
    ///
    /// Panics on a leaf.
    pub(crate) fn promote_child(&mut self, side: Side) {
        let placeholder = GeoNode::Leaf {
            id: self.id(),
            bucket: Vec::new(),
            capacity: 0,
        };
        match std::mem::replace(self, placeholder) {
            GeoNode::Internal { left, right, .. } => {
                *self = match side {
                    Side::Left => *left,
                    Side::Right => *right,
                };
            }
            GeoNode::Leaf { id, .. } => panic!("promote_child called on leaf {}", id),
        }
    }
}

impl<'a, T: Locatable> GeoNode<'a, T> {
    /// Single-line summary of this node.
    pub(crate) fn describe(&self) -> String {
        self.to_string()
    }

    /// Multi-line dump of this subtree, depth-first, left before right.
    pub(crate) fn dump_subtree(&self, axis_cycle: AxisCycle) -> String {
        let mut out = String::new();
        self.write_subtree(&mut out, 0, axis_cycle);
        out
    }

    fn write_subtree(&self, out: &mut String, depth: usize, axis_cycle: AxisCycle) {
        let indent = depth * DUMP_INDENT;
        match self {
            GeoNode::Leaf { .. } => {
                let _ = writeln!(out, "{:indent$}{}", "", self, indent = indent);
            }
            GeoNode::Internal {
                id,
                split_value,
                left,
                right,
            } => {
                let axis = axis_cycle.axis_for_depth(depth);
                let _ = writeln!(
                    out,
                    "{:indent$}{} internal {}={} left={} right={}",
                    "",
                    id,
                    axis,
                    split_value,
                    left.id(),
                    right.id(),
                    indent = indent
                );
                left.write_subtree(out, depth + 1, axis_cycle);
                right.write_subtree(out, depth + 1, axis_cycle);
            }
        }
    }
}

impl<T: Locatable> Display for GeoNode<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoNode::Leaf { id, bucket, .. } => {
                write!(f, "{} leaf [", id)?;
                for (i, object) in bucket.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", object.location())?;
                }
                write!(f, "]")
            }
            GeoNode::Internal {
                id,
                split_value,
                left,
                right,
            } => write!(
                f,
                "{} internal split={} left={} right={}",
                id,
                split_value,
                left.id(),
                right.id()
            ),
        }
    }
}
