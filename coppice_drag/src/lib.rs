// Copyright 2025 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer-agnostic drag-to-reorder logic for [`coppice_tree`] hierarchies.
//!
//! This crate turns raw pointer events into structural tree edits. It draws
//! nothing and installs no event handlers; the embedding host feeds pointer
//! positions and measured geometry in and receives decided mutations and
//! lifecycle notifications back.
//!
//! ## Architecture
//!
//! - [`DragSession`] is the state machine (`Idle → Armed → Dragging → Idle`).
//!   Each pointer event is one deterministic step: tree in, geometry in,
//!   decision out. Hosts with their own tree ownership story use it directly.
//! - [`DragController`] wraps a session, a [`Tree`](coppice_tree::Tree), and
//!   a [`HostAdapter`] for the common case where one widget instance owns its
//!   payload.
//! - [`DragConfig`] carries per-instance policy: indent unit, activation
//!   delay, disabling [`DragFlags`], anchor exceptions, and which
//!   [`VerticalGeometry`] model measures vertical distance.
//!
//! ## Decision model
//!
//! While dragging, every processed move applies at most one horizontal
//! adjustment (outdent a last child, or indent under an expanded previous
//! sibling) and at most one vertical adjustment (move above the predecessor
//! row, after the next row, or inside it when it is an expanded branch).
//! Distances are measured from the dragged element's rest position, so a
//! motionless pointer decides nothing.
//!
//! ## Minimal embedding
//!
//! ```
//! use coppice_drag::{
//!     DragConfig, DragController, DragEvent, GeometrySnapshot, HostAdapter, PressedNode,
//! };
//! use coppice_tree::{ModuleTag, Node, NodeId, Tree};
//! use kurbo::{Point, Size};
//!
//! struct Host {
//!     changes: usize,
//! }
//!
//! impl HostAdapter for Host {
//!     fn geometry(&mut self) -> GeometrySnapshot {
//!         GeometrySnapshot::empty()
//!     }
//!     fn notify(&mut self, event: DragEvent, _tree: &Tree) {
//!         if event == DragEvent::Changed {
//!             self.changes += 1;
//!         }
//!     }
//! }
//!
//! let root = Node::with_children(
//!     NodeId::ROOT,
//!     vec![Node::new(NodeId(2)), Node::new(NodeId(3))],
//! );
//! let tree = Tree::new(root, ModuleTag::Favorites);
//! let mut controller = DragController::new(tree, DragConfig::default(), Host { changes: 0 });
//!
//! let pressed = PressedNode {
//!     id: NodeId(3),
//!     origin: Point::new(20.0, 56.0),
//!     size: Size::new(200.0, 28.0),
//!     client_top: 56.0,
//! };
//! assert!(controller.pointer_down(&pressed, pressed.origin, 0));
//! controller.pointer_move(Point::new(20.0, 20.0), 16).unwrap();
//! controller.pointer_up();
//!
//! assert_eq!(controller.host_mut().changes, 1);
//! assert_eq!(controller.tree().get(NodeId(3)).unwrap().next, Some(NodeId(2)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod controller;
mod geometry;
mod session;

pub use config::{DragConfig, DragFlags, VerticalGeometry};
pub use controller::{DragController, DragEvent, HostAdapter};
pub use geometry::{GeometrySnapshot, PressedNode};
pub use session::{DragSession, DragState, DragUpdate, DropResult};
