// Copyright 2025 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the tree model: node identifiers, module tags, placements.

use alloc::vec::Vec;

/// Caller-stable identifier for a node.
///
/// Identifiers survive structural moves: a move changes where a node sits in
/// the layout, never which id refers to it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The synthetic root every tree hangs from.
    pub const ROOT: Self = Self(1);
}

/// Classification of a tree payload.
///
/// Only [`ModuleTag::Root`] and [`ModuleTag::Favorites`] trees participate in
/// drag reordering; every other tree is read-only as far as dragging is
/// concerned. See `coppice_drag` for how the tag gates entry and commit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ModuleTag {
    /// The designated root tree.
    Root,
    /// The designated favorites tree.
    Favorites,
    /// Any other tree kind.
    Other,
}

impl ModuleTag {
    /// Whether trees with this tag may be reordered by dragging at all.
    #[must_use]
    pub const fn is_reorderable(self) -> bool {
        matches!(self, Self::Root | Self::Favorites)
    }
}

/// Where a moved node lands relative to its target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Placement {
    /// Immediate previous sibling of the target.
    Before,
    /// Immediate next sibling of the target.
    After,
    /// Last child of the target.
    Append,
    /// First child of the target.
    Prepend,
}

impl Placement {
    /// Whether this placement inserts next to the target rather than under it.
    #[must_use]
    pub const fn is_sibling(self) -> bool {
        matches!(self, Self::Before | Self::After)
    }
}

/// One node of the caller-owned payload.
///
/// Child ordering is significant and preserved across mutation except where a
/// move explicitly changes it. A node is a *leaf* iff `children` is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    /// Identity, unique within the tree.
    pub id: NodeId,
    /// Whether the node's children are hidden from the flattened layout.
    pub collapsed: bool,
    /// Ordered children.
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a leaf node.
    #[must_use]
    pub const fn new(id: NodeId) -> Self {
        Self {
            id,
            collapsed: false,
            children: Vec::new(),
        }
    }

    /// Creates an expanded node with the given children.
    #[must_use]
    pub fn with_children(id: NodeId, children: Vec<Node>) -> Self {
        Self {
            id,
            collapsed: false,
            children,
        }
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether `id` names this node or any descendant.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.id == id || self.children.iter().any(|child| child.contains(id))
    }

    /// Finds the node with the given id in this subtree.
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub(crate) fn find_mut(&mut self, id: NodeId) -> Option<&mut Self> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Detaches the node with the given id from this subtree.
    ///
    /// Returns `None` if `id` is not a strict descendant. The subtree root
    /// itself is never detached.
    pub(crate) fn detach(&mut self, id: NodeId) -> Option<Self> {
        if let Some(pos) = self.children.iter().position(|child| child.id == id) {
            return Some(self.children.remove(pos));
        }
        self.children.iter_mut().find_map(|child| child.detach(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample() -> Node {
        Node::with_children(
            NodeId::ROOT,
            vec![
                Node::with_children(NodeId(2), vec![Node::new(NodeId(3))]),
                Node::new(NodeId(4)),
            ],
        )
    }

    #[test]
    fn contains_walks_descendants() {
        let root = sample();
        assert!(root.contains(NodeId(3)));
        assert!(root.contains(NodeId::ROOT));
        assert!(!root.contains(NodeId(99)));
    }

    #[test]
    fn detach_removes_exactly_one_node() {
        let mut root = sample();
        let removed = root.detach(NodeId(2)).expect("node 2 is present");
        assert_eq!(removed.id, NodeId(2));
        assert_eq!(removed.children.len(), 1);
        assert!(!root.contains(NodeId(2)));
        assert!(!root.contains(NodeId(3)));
        assert!(root.contains(NodeId(4)));
    }

    #[test]
    fn detach_never_removes_the_subtree_root() {
        let mut root = sample();
        assert!(root.detach(NodeId::ROOT).is_none());
        assert_eq!(root.id, NodeId::ROOT);
    }

    #[test]
    fn leaf_tracks_children() {
        let mut node = Node::new(NodeId(7));
        assert!(node.is_leaf());
        node.children.push(Node::new(NodeId(8)));
        assert!(!node.is_leaf());
    }
}
