// Copyright 2025 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree handle: caller payload, module tag, and structural mutation.

use kurbo::{Point, Rect};

use crate::index::{IndexEntry, PositionIndex};
use crate::types::{ModuleTag, Node, NodeId, Placement};

/// A tree payload together with its always-fresh positional index.
///
/// The payload is caller-owned data mutated in place; the index is derived
/// state rebuilt after every structural or visibility change. All mutation
/// goes through [`Tree::move_node`], [`Tree::toggle_collapse`], and
/// [`Tree::set_collapsed`], which keep the two in sync.
///
/// Invalid operations are no-ops returning `None`; nothing here panics in
/// release builds (see the crate docs for the caller contract).
///
/// ```
/// use coppice_tree::{ModuleTag, Node, NodeId, Placement, Tree};
///
/// let root = Node::with_children(
///     NodeId::ROOT,
///     vec![Node::new(NodeId(2)), Node::new(NodeId(3))],
/// );
/// let mut tree = Tree::new(root, ModuleTag::Favorites);
///
/// // Move node 3 before node 2.
/// let entry = tree.move_node(NodeId(3), NodeId(2), Placement::Before).unwrap();
/// assert_eq!(entry.top, 2);
/// assert_eq!(entry.next, Some(NodeId(2)));
///
/// // Moving a node under itself is rejected and leaves the tree unchanged.
/// assert!(tree.move_node(NodeId(2), NodeId(2), Placement::Append).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Tree {
    root: Node,
    module: ModuleTag,
    index: PositionIndex,
}

impl Tree {
    /// Wraps a caller-supplied payload and builds its index.
    ///
    /// The payload must be a well-formed tree: unique ids throughout and
    /// `root.id == NodeId::ROOT`. Malformed payloads are a caller contract
    /// violation; they are caught by `debug_assert!` only.
    #[must_use]
    pub fn new(root: Node, module: ModuleTag) -> Self {
        debug_assert!(root.id == NodeId::ROOT, "the payload root must carry NodeId::ROOT");
        let mut index = PositionIndex::new();
        index.rebuild(&root);
        Self {
            root,
            module,
            index,
        }
    }

    /// The module tag this tree was constructed with.
    #[must_use]
    pub fn module(&self) -> ModuleTag {
        self.module
    }

    /// The caller payload.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The current positional index.
    #[must_use]
    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    /// Shorthand for [`PositionIndex::get`].
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&IndexEntry> {
        self.index.get(id)
    }

    /// Shorthand for [`PositionIndex::entry_at_row`].
    #[must_use]
    pub fn entry_at_row(&self, top: usize) -> Option<&IndexEntry> {
        self.index.entry_at_row(top)
    }

    /// Detaches `id` and reinserts it relative to `target`.
    ///
    /// Rejected as a no-op (returning `None`, graph untouched) when:
    /// - `id == target`, or either id is unknown;
    /// - `id` is the root, or `target` lies inside `id`'s subtree (cycle);
    /// - the placement is `Before`/`After` and `target` is the root, which
    ///   has no siblings.
    ///
    /// On success the index is rebuilt before returning and the returned
    /// entry reflects the node's new position. Repeating an identical call
    /// leaves the graph unchanged.
    pub fn move_node(
        &mut self,
        id: NodeId,
        target: NodeId,
        placement: Placement,
    ) -> Option<&IndexEntry> {
        if id == target || id == NodeId::ROOT {
            return None;
        }
        if placement.is_sibling() && target == NodeId::ROOT {
            return None;
        }
        if self.root.find(id)?.contains(target) {
            return None;
        }
        self.root.find(target)?;

        let node = self.root.detach(id)?;
        match placement {
            Placement::Before | Placement::After => {
                // Checked above: target is present and not the root.
                let parent = parent_of_mut(&mut self.root, target)?;
                let pos = parent.children.iter().position(|c| c.id == target)?;
                let pos = if placement == Placement::After { pos + 1 } else { pos };
                parent.children.insert(pos, node);
            }
            Placement::Append => self.root.find_mut(target)?.children.push(node),
            Placement::Prepend => self.root.find_mut(target)?.children.insert(0, node),
        }

        self.index.rebuild(&self.root);
        self.index.get(id)
    }

    /// Flips a node's collapsed flag and rebuilds the index.
    ///
    /// Returns `false` when the id is unknown. Toggling a node hidden inside
    /// a collapsed ancestor is allowed; it changes what a later expand
    /// reveals.
    pub fn toggle_collapse(&mut self, id: NodeId) -> bool {
        let Some(node) = self.root.find_mut(id) else {
            return false;
        };
        node.collapsed = !node.collapsed;
        self.index.rebuild(&self.root);
        true
    }

    /// Sets a node's collapsed flag, rebuilding the index only on change.
    ///
    /// Used by drag logic to carry a node's pre-move collapsed flag across a
    /// structural move. Returns `false` when the id is unknown.
    pub fn set_collapsed(&mut self, id: NodeId, collapsed: bool) -> bool {
        let Some(node) = self.root.find_mut(id) else {
            return false;
        };
        if node.collapsed != collapsed {
            node.collapsed = collapsed;
            self.index.rebuild(&self.root);
        }
        true
    }
}

/// Finds the node whose child list contains `id`.
fn parent_of_mut(node: &mut Node, id: NodeId) -> Option<&mut Node> {
    if node.children.iter().any(|c| c.id == id) {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find_map(|child| parent_of_mut(child, id))
}

/// Pixel conversion for the row-unit coordinates of [`IndexEntry`].
///
/// `indent_unit` is the horizontal distance of one depth level and
/// `row_height` the nominal height of one visible row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowMetrics {
    /// Pixels per depth level.
    pub indent_unit: f64,
    /// Pixels per visible row.
    pub row_height: f64,
}

impl RowMetrics {
    /// Top-left corner of an entry's row, with the root at the origin.
    #[must_use]
    pub fn origin_of(&self, entry: &IndexEntry) -> Point {
        Point::new(
            (entry.left as f64 - 1.0) * self.indent_unit,
            (entry.top as f64 - 1.0) * self.row_height,
        )
    }

    /// Rectangle of an entry's own row (not its subtree) at the given width.
    #[must_use]
    pub fn rect_of(&self, entry: &IndexEntry, width: f64) -> Rect {
        let origin = self.origin_of(entry);
        Rect::new(origin.x, origin.y, origin.x + width, origin.y + self.row_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    /// root(1) → [2 → [3 → [4], 5], 6]
    fn sample() -> Tree {
        Tree::new(
            Node::with_children(
                NodeId::ROOT,
                vec![
                    Node::with_children(
                        NodeId(2),
                        vec![
                            Node::with_children(NodeId(3), vec![Node::new(NodeId(4))]),
                            Node::new(NodeId(5)),
                        ],
                    ),
                    Node::new(NodeId(6)),
                ],
            ),
            ModuleTag::Root,
        )
    }

    fn all_ids(node: &Node, out: &mut Vec<NodeId>) {
        out.push(node.id);
        for child in &node.children {
            all_ids(child, out);
        }
    }

    /// Every id reachable exactly once from the root.
    fn assert_single_tree(tree: &Tree, expected: &[NodeId]) {
        let mut ids = Vec::new();
        all_ids(tree.root(), &mut ids);
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len(), "duplicate reachable node");
        let mut expected = expected.to_vec();
        expected.sort_unstable();
        assert_eq!(sorted, expected, "orphaned or invented node");
    }

    const ALL: [NodeId; 6] = [
        NodeId(1),
        NodeId(2),
        NodeId(3),
        NodeId(4),
        NodeId(5),
        NodeId(6),
    ];

    #[test]
    fn move_after_reparents_as_sibling() {
        let mut tree = sample();
        // Outdent 5: make it a sibling after its parent 2.
        let entry = tree.move_node(NodeId(5), NodeId(2), Placement::After).unwrap().clone();
        assert_eq!(entry.parent, Some(NodeId::ROOT));
        assert_eq!(entry.prev, Some(NodeId(2)));
        assert_eq!(entry.next, Some(NodeId(6)));
        assert_eq!(entry.left, 2);
        assert_single_tree(&tree, &ALL);
    }

    #[test]
    fn move_append_becomes_last_child() {
        let mut tree = sample();
        let entry = tree.move_node(NodeId(6), NodeId(3), Placement::Append).unwrap().clone();
        assert_eq!(entry.parent, Some(NodeId(3)));
        assert_eq!(entry.prev, Some(NodeId(4)));
        assert_eq!(entry.next, None);
        assert!(!tree.get(NodeId(3)).unwrap().leaf);
        assert_single_tree(&tree, &ALL);
    }

    #[test]
    fn move_prepend_becomes_first_child() {
        let mut tree = sample();
        let entry = tree.move_node(NodeId(6), NodeId(2), Placement::Prepend).unwrap().clone();
        assert_eq!(entry.parent, Some(NodeId(2)));
        assert_eq!(entry.prev, None);
        assert_eq!(entry.next, Some(NodeId(3)));
        assert_single_tree(&tree, &ALL);
    }

    #[test]
    fn move_before_keeps_target_depth() {
        let mut tree = sample();
        let entry = tree.move_node(NodeId(6), NodeId(5), Placement::Before).unwrap().clone();
        assert_eq!(entry.left, tree.get(NodeId(5)).unwrap().left);
        assert_eq!(entry.next, Some(NodeId(5)));
        assert_single_tree(&tree, &ALL);
    }

    #[test]
    fn move_to_self_is_rejected() {
        let mut tree = sample();
        let before = tree.root().clone();
        assert!(tree.move_node(NodeId(3), NodeId(3), Placement::Before).is_none());
        assert_eq!(tree.root(), &before);
    }

    #[test]
    fn move_under_own_descendant_is_rejected() {
        let mut tree = sample();
        let before = tree.root().clone();
        assert!(tree.move_node(NodeId(2), NodeId(4), Placement::Append).is_none());
        assert_eq!(tree.root(), &before);
        assert_single_tree(&tree, &ALL);
    }

    #[test]
    fn root_cannot_be_moved_or_given_siblings() {
        let mut tree = sample();
        let before = tree.root().clone();
        assert!(tree.move_node(NodeId::ROOT, NodeId(6), Placement::After).is_none());
        assert!(tree.move_node(NodeId(6), NodeId::ROOT, Placement::Before).is_none());
        assert_eq!(tree.root(), &before);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut tree = sample();
        assert!(tree.move_node(NodeId(99), NodeId(2), Placement::After).is_none());
        assert!(tree.move_node(NodeId(2), NodeId(99), Placement::After).is_none());
    }

    #[test]
    fn move_is_idempotent() {
        let mut tree = sample();
        tree.move_node(NodeId(6), NodeId(3), Placement::Append).unwrap();
        let once = tree.root().clone();
        tree.move_node(NodeId(6), NodeId(3), Placement::Append).unwrap();
        assert_eq!(tree.root(), &once);
        assert_single_tree(&tree, &ALL);
    }

    #[test]
    fn collapse_hides_subtree_and_restores_order() {
        let mut tree = sample();
        assert!(tree.toggle_collapse(NodeId(2)));
        assert_eq!(tree.index().len(), 3);
        assert!(tree.get(NodeId(3)).is_none());
        assert!(tree.get(NodeId(4)).is_none());
        assert!(tree.get(NodeId(5)).is_none());

        assert!(tree.toggle_collapse(NodeId(2)));
        let ids: Vec<NodeId> = tree.index().visible().map(|e| e.id).collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4), NodeId(5), NodeId(6)]);
    }

    #[test]
    fn toggle_of_unknown_id_is_a_no_op() {
        let mut tree = sample();
        assert!(!tree.toggle_collapse(NodeId(99)));
    }

    #[test]
    fn set_collapsed_only_rebuilds_on_change() {
        let mut tree = sample();
        assert!(tree.set_collapsed(NodeId(3), false));
        assert_eq!(tree.index().len(), 6);
        assert!(tree.set_collapsed(NodeId(3), true));
        assert_eq!(tree.index().len(), 5);
    }

    #[test]
    fn moved_subtree_travels_whole() {
        let mut tree = sample();
        tree.move_node(NodeId(3), NodeId(6), Placement::After).unwrap();
        let three = tree.get(NodeId(3)).unwrap();
        assert_eq!(three.rows, 2, "child 4 travels with 3");
        assert_eq!(tree.get(NodeId(4)).unwrap().parent, Some(NodeId(3)));
        assert_single_tree(&tree, &ALL);
    }

    #[test]
    fn random_walk_preserves_the_structural_invariant() {
        let mut tree = sample();
        let placements = [
            Placement::Before,
            Placement::After,
            Placement::Append,
            Placement::Prepend,
        ];
        // Deterministic pseudo-random walk over ids 1..=6.
        let mut seed = 0x2545_f491_4f6c_dd1d_u64;
        for _ in 0..200 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let id = NodeId(1 + seed % 6);
            let target = NodeId(1 + (seed >> 8) % 6);
            let placement = placements[(seed >> 16) as usize % 4];
            match (seed >> 24) % 4 {
                0 => {
                    tree.toggle_collapse(id);
                }
                _ => {
                    tree.move_node(id, target, placement);
                }
            }
            assert_single_tree(&tree, &ALL);
        }
    }

    #[test]
    fn row_metrics_convert_to_pixels() {
        let tree = sample();
        let metrics = RowMetrics {
            indent_unit: 20.0,
            row_height: 28.0,
        };
        let root = tree.get(NodeId::ROOT).unwrap();
        assert_eq!(metrics.origin_of(root), Point::new(0.0, 0.0));
        let four = tree.get(NodeId(4)).unwrap();
        assert_eq!(metrics.origin_of(four), Point::new(60.0, 84.0));
        let rect = metrics.rect_of(four, 200.0);
        assert_eq!(rect, Rect::new(60.0, 84.0, 260.0, 112.0));
    }
}
