// Copyright 2025 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coppice Tree: a positional index and mutator for drag-to-reorder tree UIs.
//!
//! This crate is the structural half of Coppice. It maps an arbitrary tree of
//! caller-owned nodes to a linear, geometrically-addressable layout and
//! supports the structural mutation a drag-to-reorder widget needs, while
//! knowing nothing about dragging or rendering.
//!
//! - [`Node`]: the caller payload — an id, a collapsed flag, ordered children.
//! - [`PositionIndex`]: the flattened view. Every visible node gets a depth
//!   (`left`), a vertical row (`top`), and a subtree row count (`rows`), all
//!   in row units; see [`IndexEntry`] for the coordinate model.
//! - [`Tree`]: payload plus index, kept in sync through [`Tree::move_node`],
//!   [`Tree::toggle_collapse`], and [`Tree::set_collapsed`].
//! - [`RowMetrics`]: row-unit → pixel conversion for hosts that render the
//!   flattened layout.
//!
//! ## Error model
//!
//! Nothing in this crate uses errors for control flow. Invalid operations —
//! unknown ids, moves that would create a cycle, sibling placement beside the
//! root — are no-ops returning `None`, and callers treat `None` as "abort
//! this step". The payload is assumed well-formed at construction (unique
//! ids, root id [`NodeId::ROOT`]); violations of that contract are caught by
//! `debug_assert!` in debug builds only.
//!
//! ## Example
//!
//! ```
//! use coppice_tree::{ModuleTag, Node, NodeId, Placement, Tree};
//!
//! // root(1) → [2 → [3], 4]
//! let root = Node::with_children(
//!     NodeId::ROOT,
//!     vec![
//!         Node::with_children(NodeId(2), vec![Node::new(NodeId(3))]),
//!         Node::new(NodeId(4)),
//!     ],
//! );
//! let mut tree = Tree::new(root, ModuleTag::Root);
//!
//! // The flattened view assigns contiguous 1-based rows.
//! let rows: Vec<(u64, usize, usize)> = tree
//!     .index()
//!     .visible()
//!     .map(|e| (e.id.0, e.left, e.top))
//!     .collect();
//! assert_eq!(rows, vec![(1, 1, 1), (2, 2, 2), (3, 3, 3), (4, 2, 4)]);
//!
//! // Indent node 4 under node 2; the index is rebuilt before `move_node`
//! // returns.
//! let entry = tree.move_node(NodeId(4), NodeId(2), Placement::Append).unwrap();
//! assert_eq!(entry.parent, Some(NodeId(2)));
//! assert_eq!(entry.top, 4);
//!
//! // Collapsing hides the subtree from the flattened view entirely.
//! tree.toggle_collapse(NodeId(2));
//! assert!(tree.get(NodeId(3)).is_none());
//! assert_eq!(tree.index().len(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod index;
mod tree;
mod types;

pub use index::{IndexEntry, PositionIndex};
pub use tree::{RowMetrics, Tree};
pub use types::{ModuleTag, Node, NodeId, Placement};
