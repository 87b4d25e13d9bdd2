// Copyright 2025 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glue between a [`DragSession`] and whatever renders the tree.

use kurbo::Point;

use coppice_tree::{NodeId, Tree};

use crate::geometry::{GeometrySnapshot, PressedNode};
use crate::session::{DragSession, DragUpdate, DropResult};
use crate::DragConfig;

/// Lifecycle notifications delivered to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEvent {
    /// The first move of a session was processed; the drag is now live.
    Started,
    /// A live drag was released. Not delivered for a press that never moved.
    Ended,
    /// The tree payload changed: a drop committed or a branch toggled. The
    /// host persists or re-renders from the tree it is handed.
    Changed,
}

/// What the embedding environment provides and consumes.
///
/// The controller calls [`HostAdapter::geometry`] once per pointer event and
/// never caches the result across events. Pointer capture hooks have empty
/// default bodies for hosts whose input layer captures implicitly.
pub trait HostAdapter {
    /// Measure the rendered rows relevant to the current drag.
    fn geometry(&mut self) -> GeometrySnapshot;

    /// A press was accepted; route subsequent pointer events here.
    fn grab_pointer(&mut self) {}

    /// The session ended or was cancelled; stop routing pointer events.
    fn release_pointer(&mut self) {}

    /// Deliver a lifecycle notification, with the tree as payload.
    fn notify(&mut self, event: DragEvent, tree: &Tree);
}

/// Owns a [`Tree`], a [`DragSession`], and a host, and wires pointer events
/// through all three.
///
/// Hosts that want to drive the session against a tree they own elsewhere can
/// use [`DragSession`] directly; the controller is the common case where one
/// widget instance owns its payload.
#[derive(Debug)]
pub struct DragController<H: HostAdapter> {
    tree: Tree,
    session: DragSession,
    host: H,
}

impl<H: HostAdapter> DragController<H> {
    /// Creates a controller around a tree payload and a host.
    pub fn new(tree: Tree, config: DragConfig, host: H) -> Self {
        Self {
            tree,
            session: DragSession::new(config),
            host,
        }
    }

    /// The current tree payload.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The underlying session, for overlay rendering.
    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// The host, for tests and host-side state.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Routes a pointer press. Captures the pointer when the press is
    /// accepted and returns whether it was.
    pub fn pointer_down(&mut self, pressed: &PressedNode, pointer: Point, timestamp: u64) -> bool {
        let snapshot = self.host.geometry();
        let accepted = self
            .session
            .on_down(&self.tree, pressed, pointer, &snapshot, timestamp);
        if accepted {
            self.host.grab_pointer();
        }
        accepted
    }

    /// Routes a pointer move. Delivers [`DragEvent::Started`] on the first
    /// processed move of a session.
    pub fn pointer_move(&mut self, pointer: Point, timestamp: u64) -> Option<DragUpdate> {
        let snapshot = self.host.geometry();
        let update = self
            .session
            .on_move(&mut self.tree, pointer, &snapshot, timestamp)?;
        if update.started {
            self.host.notify(DragEvent::Started, &self.tree);
        }
        Some(update)
    }

    /// Routes a pointer release: releases capture, then delivers
    /// [`DragEvent::Ended`] and [`DragEvent::Changed`] as the commit demands,
    /// in that order.
    pub fn pointer_up(&mut self) -> DropResult {
        let was_active = self.session.is_active();
        let result = self.session.on_up(&self.tree);
        if was_active {
            self.host.release_pointer();
        }
        if result.ended {
            self.host.notify(DragEvent::Ended, &self.tree);
        }
        if result.changed {
            self.host.notify(DragEvent::Changed, &self.tree);
        }
        result
    }

    /// Aborts any in-flight session without committing or notifying.
    pub fn cancel(&mut self) {
        let was_active = self.session.is_active();
        self.session.cancel();
        if was_active {
            self.host.release_pointer();
        }
    }

    /// Toggles a branch and delivers [`DragEvent::Changed`] when the tree
    /// actually changed.
    pub fn toggle_collapse(&mut self, id: NodeId) -> bool {
        if self.tree.toggle_collapse(id) {
            self.host.notify(DragEvent::Changed, &self.tree);
            true
        } else {
            false
        }
    }
}
