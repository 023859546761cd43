//! Minimize/restore/maximize transition planning.
//!
//! The coordinator never touches pixels. It computes keyframes for the view layer, keeps the
//! store's `is_animating` flag in step with running transitions, and tells the view layer when
//! ordinary CSS transitions must be suppressed (during drag and resize).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geometry::{minimize_transform, rect_transform, Transform};
use crate::model::{WindowId, WindowRect};
use crate::store::WorkspaceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKind {
    Minimize,
    Restore,
    Maximize,
    Unmaximize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub transform: Transform,
    pub opacity: f64,
}

impl Keyframe {
    pub const VISIBLE: Keyframe = Keyframe {
        transform: Transform::IDENTITY,
        opacity: 1.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationPlan {
    pub window_id: WindowId,
    pub kind: AnimationKind,
    pub from: Keyframe,
    pub to: Keyframe,
}

#[derive(Debug, Default)]
pub struct AnimationCoordinator {
    running: BTreeSet<WindowId>,
    transitions_suppressed: bool,
}

impl AnimationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self, window_id: WindowId) -> bool {
        self.running.contains(&window_id)
    }

    pub fn transitions_suppressed(&self) -> bool {
        self.transitions_suppressed
    }

    /// Set while a drag or resize is live so CSS transitions don't fight the pointer.
    pub fn set_transitions_suppressed(&mut self, suppressed: bool) {
        self.transitions_suppressed = suppressed;
    }

    /// Minimizes the window in the store and plans its shrink into `icon`.
    ///
    /// The store update happens regardless of whether the icon could be measured.
    pub fn begin_minimize(
        &mut self,
        store: &mut WorkspaceStore,
        window_id: WindowId,
        icon: Option<WindowRect>,
    ) -> Option<AnimationPlan> {
        let rect = store.window(window_id)?.rect();
        store.minimize_window(window_id);
        self.start(store, window_id);
        Some(AnimationPlan {
            window_id,
            kind: AnimationKind::Minimize,
            from: Keyframe::VISIBLE,
            to: Keyframe {
                transform: minimize_transform(rect, icon),
                opacity: 0.0,
            },
        })
    }

    /// Restores the window in the store and plans its growth out of `icon`.
    pub fn begin_restore(
        &mut self,
        store: &mut WorkspaceStore,
        window_id: WindowId,
        icon: Option<WindowRect>,
    ) -> Option<AnimationPlan> {
        store.window(window_id)?;
        store.restore_window(window_id);
        store.focus_window(window_id);
        let rect = store.window(window_id)?.rect();
        self.start(store, window_id);
        Some(AnimationPlan {
            window_id,
            kind: AnimationKind::Restore,
            from: Keyframe {
                transform: minimize_transform(rect, icon),
                opacity: 0.0,
            },
            to: Keyframe::VISIBLE,
        })
    }

    /// Maximizes the window and plans the transition from its old rectangle.
    ///
    /// Keyframes are relative to the new (maximized) rectangle.
    pub fn begin_maximize(
        &mut self,
        store: &mut WorkspaceStore,
        window_id: WindowId,
    ) -> Option<AnimationPlan> {
        let before = store.window(window_id)?.rect();
        store.maximize_window(window_id);
        store.focus_window(window_id);
        let after = store.window(window_id)?.rect();
        self.start(store, window_id);
        Some(rect_plan(window_id, AnimationKind::Maximize, before, after))
    }

    /// Leaves maximized state and plans the transition back to the saved rectangle.
    pub fn begin_unmaximize(
        &mut self,
        store: &mut WorkspaceStore,
        window_id: WindowId,
    ) -> Option<AnimationPlan> {
        let before = store.window(window_id)?.rect();
        store.restore_window(window_id);
        store.focus_window(window_id);
        let after = store.window(window_id)?.rect();
        self.start(store, window_id);
        Some(rect_plan(window_id, AnimationKind::Unmaximize, before, after))
    }

    /// Transition-end hook: clears `is_animating`. Unknown windows are ignored.
    pub fn finish(&mut self, store: &mut WorkspaceStore, window_id: WindowId) -> bool {
        let was_running = self.running.remove(&window_id);
        store.set_animating(window_id, false);
        was_running
    }

    fn start(&mut self, store: &mut WorkspaceStore, window_id: WindowId) {
        self.running.insert(window_id);
        store.set_animating(window_id, true);
    }
}

fn rect_plan(
    window_id: WindowId,
    kind: AnimationKind,
    before: WindowRect,
    after: WindowRect,
) -> AnimationPlan {
    AnimationPlan {
        window_id,
        kind,
        from: Keyframe {
            transform: rect_transform(after, before),
            opacity: 1.0,
        },
        to: Keyframe::VISIBLE,
    }
}
