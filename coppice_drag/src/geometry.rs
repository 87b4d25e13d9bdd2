// Copyright 2025 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-measured geometry, captured once per pointer event.
//!
//! The decision algorithm never touches live rendered elements. The host
//! measures whatever it renders with — DOM, retained scene graph, test
//! fixtures — and hands the result in as a plain value, which keeps every
//! decision a pure function of its inputs.

use alloc::vec::Vec;
use kurbo::{Point, Size};

use coppice_tree::NodeId;

/// Rendered heights of the drag container's rows, in render order, plus the
/// slot the dragged element (or its placeholder) currently occupies.
///
/// Consumed by the [`VerticalGeometry::RootWalk`](crate::VerticalGeometry)
/// model and by entry gating. A snapshot is valid for exactly one pointer
/// event; geometry is not re-synchronized within an event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometrySnapshot {
    row_heights: Vec<f64>,
    dragged_slot: Option<usize>,
}

impl GeometrySnapshot {
    /// Creates a snapshot from measured row heights and the dragged slot.
    #[must_use]
    pub fn new(row_heights: Vec<f64>, dragged_slot: Option<usize>) -> Self {
        Self {
            row_heights,
            dragged_slot,
        }
    }

    /// A snapshot with no measurements, for trees that use the arithmetic
    /// geometry model.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Summed heights of the rows above the dragged slot.
    #[must_use]
    pub fn height_above(&self) -> f64 {
        let slot = self.dragged_slot.unwrap_or(0);
        self.row_heights.iter().take(slot).sum()
    }

    /// Height of the rendered row just above the dragged slot, or `0.0`.
    #[must_use]
    pub fn prev_height(&self) -> f64 {
        match self.dragged_slot {
            Some(slot) if slot > 0 => self.row_heights.get(slot - 1).copied().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Height of the rendered row just below the dragged slot, or `0.0`.
    #[must_use]
    pub fn next_height(&self) -> f64 {
        match self.dragged_slot {
            Some(slot) => self.row_heights.get(slot + 1).copied().unwrap_or(0.0),
            None => 0.0,
        }
    }

    /// Minimum non-zero rendered row height.
    ///
    /// Used as a one-row proxy when deciding whether a press landed on a
    /// node's own header or inside its expanded children region. `None` when
    /// nothing measurable was captured.
    #[must_use]
    pub fn min_row_height(&self) -> Option<f64> {
        self.row_heights
            .iter()
            .copied()
            .filter(|&h| h > 0.0)
            .fold(None, |min, h| match min {
                Some(m) if m <= h => Some(m),
                _ => Some(h),
            })
    }
}

/// Geometry of the pressed element, measured by the host at pointer-down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressedNode {
    /// Id of the pressed node.
    pub id: NodeId,
    /// The element's layout origin (offset position within the tree).
    pub origin: Point,
    /// The element's rendered size.
    pub size: Size,
    /// The element's top edge in the same coordinate space as pointer
    /// positions; compared against the pointer to detect presses inside an
    /// expanded children region.
    pub client_top: f64,
}
