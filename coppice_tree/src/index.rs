// Copyright 2025 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The positional index: a flattened, geometrically-addressable view of a tree.

use alloc::vec::Vec;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::types::{Node, NodeId};

/// Derived position of one visible node in the flattened layout.
///
/// Entries are rebuilt wholesale by [`PositionIndex::rebuild`] whenever the
/// tree structurally changes or a collapse toggles; they are never patched in
/// place, so no stale geometry survives a mutation.
///
/// ## Coordinate model
///
/// `top` and `rows` are measured in *row units*: each visible row occupies
/// exactly one unit, `top` is 1-based with the root at 1, and `rows` is the
/// number of visible rows the subtree contributes (1 when the node is a leaf
/// or collapsed). Hosts convert to pixels by multiplying with their row
/// height; see [`RowMetrics`](crate::RowMetrics).
///
/// Nodes hidden inside a collapsed ancestor are excluded from the index
/// entirely, which keeps `top` a contiguous coordinate space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// Identity of the node this entry describes.
    pub id: NodeId,
    /// Parent id; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Previous sibling under the same parent, if any.
    pub prev: Option<NodeId>,
    /// Next sibling under the same parent, if any.
    pub next: Option<NodeId>,
    /// 1-based depth; equals the parent's `left + 1`.
    pub left: usize,
    /// 1-based vertical row, strictly increasing in pre-order.
    pub top: usize,
    /// Visible rows in this node's subtree, including its own.
    pub rows: usize,
    /// Snapshot of the node's collapsed flag at rebuild time.
    pub collapsed: bool,
    /// Whether the node had no children at rebuild time.
    pub leaf: bool,
}

impl IndexEntry {
    /// First row below this node's visible subtree.
    #[must_use]
    pub const fn bottom(&self) -> usize {
        self.top + self.rows
    }
}

/// Flattened ordered view of the visible nodes of a tree.
///
/// The index knows nothing about dragging; it answers "where is this node"
/// and "which node sits at this row" queries in O(1) expected time and is
/// recomputed in O(visible nodes).
#[derive(Clone, Debug, Default)]
pub struct PositionIndex {
    /// Visible entries in pre-order; the entry at slot `i` has `top == i + 1`.
    entries: Vec<IndexEntry>,
    by_id: HashMap<NodeId, usize>,
}

impl PositionIndex {
    /// Creates an empty index. Call [`PositionIndex::rebuild`] before use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic full recomputation from the given root.
    ///
    /// Walks expanded nodes depth-first in pre-order, assigning contiguous
    /// `top` rows and parent/sibling links. Must be called after any
    /// structural mutation or collapse change before the index is trusted.
    pub fn rebuild(&mut self, root: &Node) {
        self.entries.clear();
        self.by_id.clear();
        self.push_subtree(root, None, None, None, 1);
    }

    /// Pushes `node` and (when expanded) its children; returns the visible
    /// row count of the subtree.
    fn push_subtree(
        &mut self,
        node: &Node,
        parent: Option<NodeId>,
        prev: Option<NodeId>,
        next: Option<NodeId>,
        left: usize,
    ) -> usize {
        let slot = self.entries.len();
        self.entries.push(IndexEntry {
            id: node.id,
            parent,
            prev,
            next,
            left,
            top: slot + 1,
            rows: 1,
            collapsed: node.collapsed,
            leaf: node.is_leaf(),
        });
        let prior = self.by_id.insert(node.id, slot);
        debug_assert!(prior.is_none(), "duplicate node id in tree");

        let mut rows = 1;
        if !node.collapsed {
            let ids: SmallVec<[NodeId; 8]> = node.children.iter().map(|c| c.id).collect();
            for (i, child) in node.children.iter().enumerate() {
                let prev = i.checked_sub(1).map(|p| ids[p]);
                let next = ids.get(i + 1).copied();
                rows += self.push_subtree(child, Some(node.id), prev, next, left + 1);
            }
        }
        self.entries[slot].rows = rows;
        rows
    }

    /// Looks up the entry for a node id.
    ///
    /// Returns `None` when the id is absent from the current flattened view,
    /// including when it is hidden inside a collapsed ancestor.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&IndexEntry> {
        self.by_id.get(&id).map(|&slot| &self.entries[slot])
    }

    /// Looks up the entry whose own one-unit band `[top, top + 1)` is the
    /// given row. Rows are 1-based; row 0 and rows past the end yield `None`.
    #[must_use]
    pub fn entry_at_row(&self, top: usize) -> Option<&IndexEntry> {
        self.entries.get(top.checked_sub(1)?)
    }

    /// Visible entries in ascending `top` order.
    pub fn visible(&self) -> impl ExactSizeIterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// Number of visible rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// root(1) → [2 → [3, 4], 5]
    fn sample() -> Node {
        Node::with_children(
            NodeId::ROOT,
            vec![
                Node::with_children(NodeId(2), vec![Node::new(NodeId(3)), Node::new(NodeId(4))]),
                Node::new(NodeId(5)),
            ],
        )
    }

    fn build(root: &Node) -> PositionIndex {
        let mut index = PositionIndex::new();
        index.rebuild(root);
        index
    }

    #[test]
    fn preorder_rows_are_contiguous() {
        let index = build(&sample());
        let tops: Vec<usize> = index.visible().map(|e| e.top).collect();
        assert_eq!(tops, vec![1, 2, 3, 4, 5]);
        let ids: Vec<NodeId> = index.visible().map(|e| e.id).collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4), NodeId(5)]);
    }

    #[test]
    fn depth_is_parent_depth_plus_one() {
        let index = build(&sample());
        for entry in index.visible() {
            match entry.parent {
                None => assert_eq!(entry.left, 1, "root sits at depth 1"),
                Some(parent) => {
                    let parent = index.get(parent).expect("parent is visible");
                    assert_eq!(entry.left, parent.left + 1, "child depth off for {:?}", entry.id);
                }
            }
        }
    }

    #[test]
    fn sibling_links_are_wired() {
        let index = build(&sample());
        let three = index.get(NodeId(3)).unwrap();
        assert_eq!(three.prev, None);
        assert_eq!(three.next, Some(NodeId(4)));
        let four = index.get(NodeId(4)).unwrap();
        assert_eq!(four.prev, Some(NodeId(3)));
        assert_eq!(four.next, None);
        let two = index.get(NodeId(2)).unwrap();
        assert_eq!(two.next, Some(NodeId(5)));
    }

    #[test]
    fn subtree_rows_count_visible_descendants() {
        let index = build(&sample());
        assert_eq!(index.get(NodeId::ROOT).unwrap().rows, 5);
        assert_eq!(index.get(NodeId(2)).unwrap().rows, 3);
        assert_eq!(index.get(NodeId(5)).unwrap().rows, 1);
        assert_eq!(index.get(NodeId(2)).unwrap().bottom(), 5);
    }

    #[test]
    fn collapsed_subtree_contributes_a_single_row() {
        let mut root = sample();
        root.find_mut(NodeId(2)).unwrap().collapsed = true;
        let index = build(&root);
        assert_eq!(index.len(), 3);
        assert!(index.get(NodeId(3)).is_none());
        assert!(index.get(NodeId(4)).is_none());
        let two = index.get(NodeId(2)).unwrap();
        assert_eq!(two.rows, 1);
        assert!(two.collapsed);
        // Node 5 moves up to fill the vacated rows.
        assert_eq!(index.get(NodeId(5)).unwrap().top, 3);
    }

    #[test]
    fn entry_at_row_is_exact() {
        let index = build(&sample());
        assert_eq!(index.entry_at_row(1).unwrap().id, NodeId::ROOT);
        assert_eq!(index.entry_at_row(3).unwrap().id, NodeId(3));
        assert!(index.entry_at_row(0).is_none());
        assert!(index.entry_at_row(6).is_none());
    }

    #[test]
    fn hidden_ids_resolve_again_after_expand() {
        let mut root = sample();
        root.find_mut(NodeId(2)).unwrap().collapsed = true;
        let mut index = build(&root);
        assert!(index.get(NodeId(3)).is_none());

        root.find_mut(NodeId(2)).unwrap().collapsed = false;
        index.rebuild(&root);
        assert_eq!(index.get(NodeId(3)).unwrap().top, 3);
        assert_eq!(index.get(NodeId(4)).unwrap().top, 4);
    }
}
