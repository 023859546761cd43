//! Reducer actions, view-layer effect intents, and gesture wiring for the window manager.

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationCoordinator, AnimationPlan};
use crate::drag::{DragController, DragOutcome};
use crate::geometry::SnapZoneId;
use crate::model::{
    PointerSample, ResizeHandle, Size, WindowId, WindowRect, WindowSpec, WorkspaceId,
};
use crate::resize::ResizeController;
use crate::snap::SnapEvent;
use crate::store::WorkspaceStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Actions accepted by [`reduce_window_manager`].
pub enum WmAction {
    /// Register a workspace for an external repository reference.
    CreateWorkspace {
        /// Opaque reference to the workspace's content source.
        repository_ref: String,
    },
    /// Make a workspace the visible one, initializing it on first visit.
    SwitchWorkspace {
        /// Workspace to activate.
        workspace_id: WorkspaceId,
    },
    /// Discard a workspace and all its windows.
    RemoveWorkspace {
        /// Workspace to remove.
        workspace_id: WorkspaceId,
    },
    /// Report a new viewport measurement.
    SetViewport {
        /// Viewport size in pixels.
        viewport: Size,
    },
    /// Open a window in the active workspace.
    OpenWindow(WindowSpec),
    /// Close a window.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus and raise a window.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window into its dock icon.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
        /// Measured dock icon rectangle, if the view layer has one.
        icon: Option<WindowRect>,
    },
    /// Maximize a window to the usable area.
    MaximizeWindow {
        /// Window to maximize.
        window_id: WindowId,
    },
    /// Restore a minimized or maximized window.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
        /// Measured dock icon rectangle, used when restoring from minimized.
        icon: Option<WindowRect>,
    },
    /// Title-bar double click: maximize or restore.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Dock icon click: restore if minimized, minimize if focused, focus otherwise.
    ToggleDockWindow {
        /// Window associated with the dock icon.
        window_id: WindowId,
        /// Measured dock icon rectangle.
        icon: Option<WindowRect>,
    },
    /// A minimize/restore/maximize transition ended.
    AnimationFinished {
        /// Window whose transition ended.
        window_id: WindowId,
    },
    /// Pointer down on a title bar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer at drag start.
        pointer: PointerSample,
    },
    /// Pointer move during a drag.
    UpdateMove {
        /// Current pointer.
        pointer: PointerSample,
    },
    /// Pointer up ending a drag.
    EndMove {
        /// Pointer at release.
        pointer: PointerSample,
    },
    /// Drag abandoned (lost capture, escape).
    CancelMove,
    /// Pointer down on a resize handle.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        handle: ResizeHandle,
        /// Pointer at resize start.
        pointer: PointerSample,
    },
    /// Pointer move during a resize.
    UpdateResize {
        /// Current pointer.
        pointer: PointerSample,
    },
    /// Pointer up ending a resize.
    EndResize {
        /// Pointer at release.
        pointer: PointerSample,
    },
    /// Resize abandoned.
    CancelResize,
    /// Timer tick for the snap arm delay.
    SnapArmTick {
        /// Current time on the pointer-event clock.
        timestamp_ms: f64,
    },
}

impl WmAction {
    /// Window an action targets, for actions that name one.
    pub fn target_window(&self) -> Option<WindowId> {
        match self {
            Self::CloseWindow { window_id }
            | Self::FocusWindow { window_id }
            | Self::MinimizeWindow { window_id, .. }
            | Self::MaximizeWindow { window_id }
            | Self::RestoreWindow { window_id, .. }
            | Self::ToggleMaximize { window_id }
            | Self::ToggleDockWindow { window_id, .. }
            | Self::AnimationFinished { window_id }
            | Self::BeginMove { window_id, .. }
            | Self::BeginResize { window_id, .. } => Some(*window_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapPreview {
    pub zone: SnapZoneId,
    pub rect: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Intents emitted by [`reduce_window_manager`] for the view layer to carry out.
pub enum WmEffect {
    /// Move keyboard focus into the window's content.
    FocusWindowContent(WindowId),
    /// Run a transition; report completion with [`WmAction::AnimationFinished`].
    Animate(AnimationPlan),
    /// Dispatch [`WmAction::SnapArmTick`] after the delay.
    ScheduleSnapArm {
        /// Delay in milliseconds.
        delay_ms: u64,
    },
    /// Show (or hide, with `None`) the snap overlay.
    SnapPreview(Option<SnapPreview>),
    /// Geometry to paint during a gesture; the store is only written on commit.
    LiveGeometry {
        /// Window under the gesture.
        window_id: WindowId,
        /// Rectangle to paint.
        rect: WindowRect,
    },
    /// CSS transitions must be off (`true`) or may resume (`false`).
    SuppressTransitions(bool),
}

/// Per-gesture state kept outside the store.
#[derive(Debug)]
pub struct InteractionState {
    pub drag: DragController,
    pub resize: ResizeController,
    pub animation: AnimationCoordinator,
}

impl InteractionState {
    pub fn new(store: &WorkspaceStore) -> Self {
        Self {
            drag: DragController::new(store.config(), store.viewport()),
            resize: ResizeController::new(),
            animation: AnimationCoordinator::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.drag.is_dragging() && !self.resize.is_resizing()
    }

    /// Whether reducing `action` now can only change gesture state, never `store`.
    ///
    /// A drag move is read-only unless it is about to pop a maximized window out.
    pub fn leaves_store_untouched(&self, store: &WorkspaceStore, action: &WmAction) -> bool {
        match action {
            WmAction::UpdateResize { .. }
            | WmAction::SnapArmTick { .. }
            | WmAction::CancelMove
            | WmAction::CancelResize => true,
            WmAction::UpdateMove { .. } => match self.drag.session() {
                Some(session) => {
                    session.popped_out
                        || !store
                            .window(session.window_id)
                            .is_some_and(|window| window.maximized)
                }
                None => true,
            },
            _ => false,
        }
    }

    fn cancel_gestures(&mut self, effects: &mut Vec<WmEffect>) {
        let cancelled_drag = self.drag.cancel();
        let cancelled_resize = self.resize.cancel();
        if cancelled_drag {
            effects.push(WmEffect::SnapPreview(None));
        }
        if cancelled_drag || cancelled_resize {
            self.animation.set_transitions_suppressed(false);
            effects.push(WmEffect::SuppressTransitions(false));
        }
    }
}

/// Applies a [`WmAction`] to the store and gesture state and collects view-layer effects.
///
/// Actions naming a window or workspace that does not exist are no-ops and yield no effects.
pub fn reduce_window_manager(
    store: &mut WorkspaceStore,
    interaction: &mut InteractionState,
    action: WmAction,
) -> Vec<WmEffect> {
    let mut effects = Vec::new();
    match action {
        WmAction::CreateWorkspace { repository_ref } => {
            store.create_workspace(repository_ref);
        }
        WmAction::SwitchWorkspace { workspace_id } => {
            if store.workspace(workspace_id).is_some() {
                interaction.cancel_gestures(&mut effects);
                store.switch_to_workspace(workspace_id);
            }
        }
        WmAction::RemoveWorkspace { workspace_id } => {
            if store.active_workspace_id() == Some(workspace_id) {
                interaction.cancel_gestures(&mut effects);
            }
            store.remove_workspace(workspace_id);
        }
        WmAction::SetViewport { viewport } => {
            let had_zone = interaction.drag.snap().active_zone().is_some();
            store.set_viewport(viewport);
            interaction.drag.set_viewport(viewport);
            if had_zone {
                effects.push(WmEffect::SnapPreview(None));
            }
        }
        WmAction::OpenWindow(spec) => {
            if let Some(window_id) = store.add_window(spec) {
                effects.push(WmEffect::FocusWindowContent(window_id));
            }
        }
        WmAction::CloseWindow { window_id } => {
            if gesture_targets(interaction, window_id) {
                interaction.cancel_gestures(&mut effects);
            }
            interaction.animation.finish(store, window_id);
            if store.remove_window(window_id) {
                if let Some(next) = store.active_workspace().and_then(|ws| ws.active_window_id) {
                    effects.push(WmEffect::FocusWindowContent(next));
                }
            }
        }
        WmAction::FocusWindow { window_id } => {
            if store.focus_window(window_id) {
                effects.push(WmEffect::FocusWindowContent(window_id));
            }
        }
        WmAction::MinimizeWindow { window_id, icon } => {
            minimize(store, interaction, window_id, icon, &mut effects);
        }
        WmAction::MaximizeWindow { window_id } => {
            if let Some(plan) = interaction.animation.begin_maximize(store, window_id) {
                effects.push(WmEffect::Animate(plan));
                effects.push(WmEffect::FocusWindowContent(window_id));
            }
        }
        WmAction::RestoreWindow { window_id, icon } => {
            effects.extend(restore(store, interaction, window_id, icon));
        }
        WmAction::ToggleMaximize { window_id } => {
            let Some(maximized) = store.window(window_id).map(|w| w.maximized) else {
                return effects;
            };
            let plan = if maximized {
                interaction.animation.begin_unmaximize(store, window_id)
            } else {
                interaction.animation.begin_maximize(store, window_id)
            };
            effects.extend(plan.map(WmEffect::Animate));
        }
        WmAction::ToggleDockWindow { window_id, icon } => {
            let Some(window) = store.window(window_id) else {
                return effects;
            };
            let (minimized, focused) = (window.minimized, window.focused);
            if minimized {
                effects.extend(restore(store, interaction, window_id, icon));
            } else if focused {
                minimize(store, interaction, window_id, icon, &mut effects);
            } else if store.focus_window(window_id) {
                effects.push(WmEffect::FocusWindowContent(window_id));
            }
        }
        WmAction::AnimationFinished { window_id } => {
            interaction.animation.finish(store, window_id);
        }
        WmAction::BeginMove { window_id, pointer } => {
            interaction.cancel_gestures(&mut effects);
            if interaction.drag.begin(store, window_id, pointer) {
                interaction.animation.set_transitions_suppressed(true);
                effects.push(WmEffect::SuppressTransitions(true));
            }
        }
        WmAction::UpdateMove { pointer } => {
            let Some(window_id) = interaction.drag.session().map(|s| s.window_id) else {
                return effects;
            };
            let event = interaction.drag.update(store, pointer);
            effects.extend(snap_effects(interaction, event));
            if let Some(rect) = interaction.drag.live_rect() {
                effects.push(WmEffect::LiveGeometry { window_id, rect });
            }
        }
        WmAction::EndMove { pointer } => {
            if !interaction.drag.is_dragging() {
                return effects;
            }
            let outcome = interaction.drag.end(store, pointer);
            interaction.animation.set_transitions_suppressed(false);
            effects.push(WmEffect::SnapPreview(None));
            effects.push(WmEffect::SuppressTransitions(false));
            if let DragOutcome::Snapped { window_id, .. } | DragOutcome::Moved { window_id, .. } =
                outcome
            {
                effects.push(WmEffect::FocusWindowContent(window_id));
            }
        }
        WmAction::CancelMove => {
            if interaction.drag.is_dragging() {
                interaction.cancel_gestures(&mut effects);
            }
        }
        WmAction::BeginResize {
            window_id,
            handle,
            pointer,
        } => {
            interaction.cancel_gestures(&mut effects);
            if interaction.resize.begin(store, window_id, handle, pointer) {
                interaction.animation.set_transitions_suppressed(true);
                effects.push(WmEffect::SuppressTransitions(true));
            }
        }
        WmAction::UpdateResize { pointer } => {
            let Some(window_id) = interaction.resize.session().map(|s| s.window_id) else {
                return effects;
            };
            if let Some(rect) = interaction.resize.update(pointer) {
                effects.push(WmEffect::LiveGeometry { window_id, rect });
            }
        }
        WmAction::EndResize { pointer } => {
            if !interaction.resize.is_resizing() {
                return effects;
            }
            let window_id = interaction.resize.session().map(|s| s.window_id);
            interaction.resize.end(store, pointer);
            interaction.animation.set_transitions_suppressed(false);
            effects.push(WmEffect::SuppressTransitions(false));
            effects.extend(window_id.map(WmEffect::FocusWindowContent));
        }
        WmAction::CancelResize => {
            if interaction.resize.is_resizing() {
                interaction.cancel_gestures(&mut effects);
            }
        }
        WmAction::SnapArmTick { timestamp_ms } => {
            if interaction.drag.is_dragging() && interaction.drag.snap_mut().poll(timestamp_ms) {
                effects.push(WmEffect::SnapPreview(armed_preview(interaction, timestamp_ms)));
            }
        }
    }
    effects
}

fn minimize(
    store: &mut WorkspaceStore,
    interaction: &mut InteractionState,
    window_id: WindowId,
    icon: Option<WindowRect>,
    effects: &mut Vec<WmEffect>,
) {
    if store.window(window_id).is_none() {
        return;
    }
    if gesture_targets(interaction, window_id) {
        interaction.cancel_gestures(effects);
    }
    if let Some(plan) = interaction.animation.begin_minimize(store, window_id, icon) {
        effects.push(WmEffect::Animate(plan));
    }
}

fn gesture_targets(interaction: &InteractionState, window_id: WindowId) -> bool {
    interaction.drag.session().map(|s| s.window_id) == Some(window_id)
        || interaction.resize.session().map(|s| s.window_id) == Some(window_id)
}

fn restore(
    store: &mut WorkspaceStore,
    interaction: &mut InteractionState,
    window_id: WindowId,
    icon: Option<WindowRect>,
) -> Vec<WmEffect> {
    let Some(window) = store.window(window_id) else {
        return Vec::new();
    };
    let plan = if window.minimized {
        interaction.animation.begin_restore(store, window_id, icon)
    } else if window.maximized {
        interaction.animation.begin_unmaximize(store, window_id)
    } else {
        store.restore_window(window_id);
        store.focus_window(window_id);
        None
    };
    let mut effects: Vec<WmEffect> = plan.map(WmEffect::Animate).into_iter().collect();
    effects.push(WmEffect::FocusWindowContent(window_id));
    effects
}

fn armed_preview(interaction: &mut InteractionState, now_ms: f64) -> Option<SnapPreview> {
    let zone = interaction.drag.snap().active_zone()?;
    let rect = interaction.drag.snap_mut().preview(now_ms)?;
    Some(SnapPreview { zone, rect })
}

fn snap_effects(interaction: &mut InteractionState, event: Option<SnapEvent>) -> Vec<WmEffect> {
    let mut effects = Vec::new();
    match event {
        Some(SnapEvent::ZoneChanged { to: Some(_), .. }) => {
            if interaction.drag.snap().is_armed() {
                effects.push(WmEffect::SnapPreview(armed_preview(interaction, f64::MAX)));
            } else {
                effects.push(WmEffect::SnapPreview(None));
                effects.push(WmEffect::ScheduleSnapArm {
                    delay_ms: interaction.drag.snap().arm_delay_ms(),
                });
            }
        }
        Some(SnapEvent::ZoneChanged { to: None, .. }) => {
            effects.push(WmEffect::SnapPreview(None));
        }
        Some(SnapEvent::Armed(_)) => {
            effects.push(WmEffect::SnapPreview(armed_preview(interaction, f64::MAX)));
        }
        None => {}
    }
    effects
}
