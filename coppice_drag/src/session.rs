// Copyright 2025 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag session: a per-drag state machine turning pointer deltas into
//! structural tree moves.

use core::mem;

use kurbo::{Point, Size};

use coppice_tree::{IndexEntry, ModuleTag, NodeId, Placement, Tree};

use crate::config::{DragConfig, DragFlags, VerticalGeometry};
use crate::geometry::{GeometrySnapshot, PressedNode};

/// Ephemeral state of one drag, owned by the session and destroyed on commit
/// or abort.
#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
    /// Id of the dragged node. Stable across moves; only its position changes.
    pub id: NodeId,
    /// Layout origin of the dragged element at press time.
    pub start: Point,
    /// Pointer position at press time.
    pub grab: Point,
    /// Live overlay position, updated every move.
    pub position: Point,
    /// Rendered size of the dragged element.
    pub size: Size,
    /// Whether the session has processed its first move.
    started: bool,
}

impl DragState {
    /// Whether the session has left `Armed` and the drag is live.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }
}

#[derive(Clone, Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Armed {
        state: DragState,
        down_time: u64,
    },
    Dragging(DragState),
}

/// Outcome of one processed move event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragUpdate {
    /// True exactly once per session, on the first processed move. The host
    /// fires its "drag started" notification when it sees this.
    pub started: bool,
    /// Whether this move applied a structural mutation to the tree.
    pub moved: bool,
    /// Live overlay position for rendering the dragged ghost.
    pub position: Point,
}

/// Outcome of releasing the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DropResult {
    /// Fire the "drag ended" notification (the session reached `Dragging`).
    pub ended: bool,
    /// Fire the "changed" notification with the finalized tree payload.
    pub changed: bool,
}

impl DropResult {
    const REFUSED: Self = Self {
        ended: false,
        changed: false,
    };
}

/// Drag-to-reorder state machine: `Idle → Armed → Dragging → Idle`.
///
/// The session owns no tree and measures no geometry. Each pointer event is
/// handed the tree it operates on and a [`GeometrySnapshot`] captured by the
/// host for that event, so every decision is reproducible from its inputs.
///
/// - [`DragSession::on_down`] arms the session after entry gating.
/// - [`DragSession::on_move`] activates the drag on the first move past the
///   configured delay, then applies at most one horizontal (indent/outdent)
///   and one vertical (above/below/inside) adjustment per event. Every
///   adjustment goes through [`Tree::move_node`], which rebuilds the
///   positional index before returning, so later sub-decisions within the
///   same event never see stale coordinates.
/// - [`DragSession::on_up`] commits, mirroring the entry gating so a session
///   that became invalid mid-flight cannot commit.
///
/// ```
/// use coppice_drag::{DragConfig, DragSession, GeometrySnapshot, PressedNode};
/// use coppice_tree::{ModuleTag, Node, NodeId, Tree};
/// use kurbo::{Point, Size};
///
/// // root(1) → [2, 3]; drag node 3 upward past its own height.
/// let root = Node::with_children(
///     NodeId::ROOT,
///     vec![Node::new(NodeId(2)), Node::new(NodeId(3))],
/// );
/// let mut tree = Tree::new(root, ModuleTag::Favorites);
/// let mut session = DragSession::new(DragConfig::default());
///
/// let pressed = PressedNode {
///     id: NodeId(3),
///     origin: Point::new(20.0, 56.0),
///     size: Size::new(200.0, 28.0),
///     client_top: 56.0,
/// };
/// let snapshot = GeometrySnapshot::empty();
/// assert!(session.on_down(&tree, &pressed, Point::new(30.0, 60.0), &snapshot, 0));
///
/// let update = session
///     .on_move(&mut tree, Point::new(30.0, 20.0), &snapshot, 16)
///     .unwrap();
/// assert!(update.started && update.moved);
/// assert_eq!(tree.get(NodeId(3)).unwrap().next, Some(NodeId(2)));
///
/// let result = session.on_up(&tree);
/// assert!(result.ended && result.changed);
/// ```
#[derive(Clone, Debug)]
pub struct DragSession {
    config: DragConfig,
    phase: Phase,
}

impl DragSession {
    /// Creates an idle session with the given configuration.
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    /// The configuration this session was created with.
    #[must_use]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Whether a press is being tracked (armed or dragging).
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// The live drag state for overlay rendering; `None` until the first
    /// move activates the drag.
    #[must_use]
    pub fn dragged(&self) -> Option<&DragState> {
        match &self.phase {
            Phase::Dragging(state) => Some(state),
            _ => None,
        }
    }

    /// Entry gating, evaluated once per press.
    ///
    /// Arms the session and returns `true` when the press may become a drag.
    /// Refused (the session stays idle) when:
    /// - dragging is globally disabled;
    /// - the target is the root and root dragging is disabled;
    /// - the target is the pinned always-second anchor on a root tree;
    /// - on a root tree, the pointer sits more than one base row height below
    ///   the pressed element's top edge, i.e. inside its expanded children
    ///   region rather than its own header;
    /// - the tree's module tag is not reorderable.
    pub fn on_down(
        &mut self,
        tree: &Tree,
        pressed: &PressedNode,
        pointer: Point,
        snapshot: &GeometrySnapshot,
        timestamp: u64,
    ) -> bool {
        let flags = self.config.flags;
        if flags.contains(DragFlags::DISABLE_DRAG) {
            return false;
        }
        if pressed.id == NodeId::ROOT && flags.contains(DragFlags::DISABLE_ROOT_DRAG) {
            return false;
        }
        if tree.module() == ModuleTag::Root {
            if self.config.is_pinned_second(pressed.id) {
                return false;
            }
            if let Some(base) = snapshot.min_row_height()
                && pointer.y - pressed.client_top > base
            {
                return false;
            }
        }
        if !tree.module().is_reorderable() {
            return false;
        }

        self.phase = Phase::Armed {
            state: DragState {
                id: pressed.id,
                start: pressed.origin,
                grab: pointer,
                position: pressed.origin,
                size: pressed.size,
                started: false,
            },
            down_time: timestamp,
        };
        true
    }

    /// Processes a pointer move, applying at most one horizontal and one
    /// vertical structural adjustment.
    ///
    /// Returns `None` while idle or while the activation delay has not
    /// elapsed. The first processed move reports `started` and transitions
    /// `Armed → Dragging`.
    pub fn on_move(
        &mut self,
        tree: &mut Tree,
        pointer: Point,
        snapshot: &GeometrySnapshot,
        timestamp: u64,
    ) -> Option<DragUpdate> {
        let mut state = match mem::take(&mut self.phase) {
            Phase::Idle => return None,
            Phase::Armed { state, down_time } => {
                if timestamp.saturating_sub(down_time) < self.config.drag_delay_ms {
                    self.phase = Phase::Armed { state, down_time };
                    return None;
                }
                state
            }
            Phase::Dragging(state) => state,
        };
        let started = !state.started;
        state.started = true;

        let delta = pointer - state.grab;
        let dx = if self.config.flags.contains(DragFlags::DISABLE_HORIZONTAL) {
            0.0
        } else {
            delta.x
        };

        let Some(entry) = tree.get(state.id).cloned() else {
            // The node currently has no home in the visible layout. Track the
            // pointer horizontally, freeze vertically, and decide nothing.
            state.position = Point::new(state.start.x + dx, state.start.y);
            let position = state.position;
            self.phase = Phase::Dragging(state);
            return Some(DragUpdate {
                started,
                moved: false,
                position,
            });
        };
        state.position = Point::new(state.start.x + dx, state.start.y + delta.y);

        // A move must not implicitly expand or collapse the moved subtree.
        let carried = entry.collapsed;
        let mut moved = self.horizontal_step(tree, &entry, state.position.x);
        if moved {
            tree.set_collapsed(state.id, carried);
        }

        // Re-resolve after any horizontal move; `move_node` rebuilt the index.
        if let Some(entry) = tree.get(state.id).cloned()
            && !self.config.is_protected(entry.id)
            && self.vertical_step(tree, &entry, state.position.y, state.size.height, snapshot)
        {
            tree.set_collapsed(state.id, carried);
            moved = true;
        }

        let position = state.position;
        self.phase = Phase::Dragging(state);
        Some(DragUpdate {
            started,
            moved,
            position,
        })
    }

    /// Indent/outdent by horizontal offset from the node's natural slot.
    fn horizontal_step(&self, tree: &mut Tree, entry: &IndexEntry, x: f64) -> bool {
        let unit = self.config.indent_unit;
        let diff_x = x - unit / 2.0 - (entry.left as f64 - 2.0) * unit;
        if diff_x < 0.0 {
            // Left of its slot: the last child of a parent outdents to become
            // that parent's next sibling.
            if entry.next.is_none()
                && let Some(parent) = entry.parent
            {
                return tree.move_node(entry.id, parent, Placement::After).is_some();
            }
        } else if diff_x > unit
            && let Some(prev) = entry.prev
        {
            // Right of its slot: indent under an expanded non-leaf previous
            // sibling.
            if tree.get(prev).is_some_and(|p| !p.collapsed && !p.leaf) {
                return tree.move_node(entry.id, prev, Placement::Append).is_some();
            }
        }
        false
    }

    /// Move above/below/inside by vertical offset, using the configured
    /// geometry model.
    fn vertical_step(
        &self,
        tree: &mut Tree,
        entry: &IndexEntry,
        y: f64,
        height: f64,
        snapshot: &GeometrySnapshot,
    ) -> bool {
        let (diff_y, up_threshold, down_threshold) = match self.config.vertical_geometry {
            VerticalGeometry::RootWalk => (
                y - snapshot.height_above(),
                -snapshot.prev_height(),
                snapshot.next_height(),
            ),
            VerticalGeometry::Arithmetic => (
                y - height / 2.0 - (entry.top as f64 - 2.0) * height,
                0.0,
                height,
            ),
        };

        if diff_y < up_threshold {
            // Move before the immediate predecessor row.
            let Some(above) = tree.entry_at_row(entry.top - 1) else {
                return false;
            };
            let above_id = above.id;
            if self.config.is_protected(above_id) {
                return false;
            }
            return tree
                .move_node(entry.id, above_id, Placement::Before)
                .is_some();
        }

        if diff_y > down_threshold {
            let below = match entry.next {
                Some(next) => tree.get(next).cloned(),
                // No next sibling: the row just below the dragged subtree's
                // bottom edge, unless it reads as one of our own.
                None => tree
                    .entry_at_row(entry.bottom())
                    .filter(|below| below.parent != Some(entry.id))
                    .cloned(),
            };
            let Some(below) = below else {
                return false;
            };
            if self.config.is_protected(below.id) {
                return false;
            }
            // Drop inside an expanded branch, otherwise after it.
            let placement = if !below.leaf && !below.collapsed {
                Placement::Prepend
            } else {
                Placement::After
            };
            return tree.move_node(entry.id, below.id, placement).is_some();
        }

        false
    }

    /// Commits the session on pointer-up.
    ///
    /// The commit is refused — the session still resets to idle, but neither
    /// flag is set — when the pinned always-second anchor is being dropped on
    /// a root tree or the tree's module tag is not reorderable. Otherwise
    /// `ended` reports whether the session actually reached `Dragging` and
    /// `changed` is unconditionally true.
    pub fn on_up(&mut self, tree: &Tree) -> DropResult {
        let state = match mem::take(&mut self.phase) {
            Phase::Idle => return DropResult::REFUSED,
            Phase::Armed { state, .. } | Phase::Dragging(state) => state,
        };
        if tree.module() == ModuleTag::Root && self.config.is_pinned_second(state.id) {
            return DropResult::REFUSED;
        }
        if !tree.module().is_reorderable() {
            return DropResult::REFUSED;
        }
        DropResult {
            ended: state.started,
            changed: true,
        }
    }

    /// Aborts any tracked press without committing.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }
}
