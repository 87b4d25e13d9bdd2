// Copyright 2025 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance drag configuration and policy.

use coppice_tree::NodeId;

bitflags::bitflags! {
    /// Flags disabling parts of the drag behavior.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DragFlags: u8 {
        /// Dragging is globally disabled; every press is refused.
        const DISABLE_DRAG = 0b0000_0001;
        /// The synthetic root node may not be dragged.
        const DISABLE_ROOT_DRAG = 0b0000_0010;
        /// Horizontal deltas are zeroed; indent/outdent never triggers.
        const DISABLE_HORIZONTAL = 0b0000_0100;
    }
}

impl Default for DragFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// How vertical drag distance is measured against the rendered layout.
///
/// Two geometry models exist in the wild for this widget family; which one a
/// tree uses is policy, not fixed logic.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum VerticalGeometry {
    /// Walk the rendered sibling list: the drop distance is measured against
    /// the summed heights of the rows above the dragged element, with the
    /// previous/next rendered row heights as thresholds. Requires a
    /// meaningful [`GeometrySnapshot`](crate::GeometrySnapshot) each move.
    RootWalk,
    /// Pure arithmetic on the positional index: the dragged element's own
    /// height stands in for every row. Needs no per-row measurements.
    #[default]
    Arithmetic,
}

/// Static per-instance configuration for a [`DragSession`](crate::DragSession).
#[derive(Clone, Debug, PartialEq)]
pub struct DragConfig {
    /// Horizontal pixels per depth level.
    pub indent_unit: f64,
    /// Milliseconds a press must be held before moves activate the drag.
    pub drag_delay_ms: u64,
    /// Disabling flags.
    pub flags: DragFlags,
    /// Protected anchor: a node id excluded from all reorder decisions.
    pub protected: Option<NodeId>,
    /// The "always-second" anchor that may never be dragged or dropped on a
    /// root tree.
    pub pinned_second: Option<NodeId>,
    /// Vertical geometry model.
    pub vertical_geometry: VerticalGeometry,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            indent_unit: 20.0,
            drag_delay_ms: 0,
            flags: DragFlags::empty(),
            protected: None,
            pinned_second: None,
            vertical_geometry: VerticalGeometry::default(),
        }
    }
}

impl DragConfig {
    /// Configuration with a custom indent unit and everything else default.
    #[must_use]
    pub fn with_indent_unit(indent_unit: f64) -> Self {
        Self {
            indent_unit,
            ..Self::default()
        }
    }

    pub(crate) fn is_protected(&self, id: NodeId) -> bool {
        self.protected == Some(id)
    }

    pub(crate) fn is_pinned_second(&self, id: NodeId) -> bool {
        self.pinned_second == Some(id)
    }
}
