//! Reactive context wiring for the window manager.
//!
//! The store lives in a signal so the view layer re-renders on committed changes. Gesture state
//! is kept in a [`StoredValue`]: it changes on every pointer move and only its projections
//! (live geometry, snap preview, transition suppression) are exposed as signals.
#![allow(clippy::clone_on_copy)]

use leptos::*;

use crate::config::WindowManagerConfig;
use crate::model::{WindowId, WindowRect};
use crate::reducer::{reduce_window_manager, InteractionState, SnapPreview, WmAction, WmEffect};
use crate::store::WorkspaceStore;

#[derive(Clone, Copy)]
/// Leptos context for reading window-manager state and dispatching [`WmAction`] values.
pub struct WindowManagerContext {
    /// Committed workspace and window state.
    pub store: RwSignal<WorkspaceStore>,
    /// Drag, resize and animation state.
    pub interaction: StoredValue<InteractionState>,
    /// Geometry of the window under an active gesture.
    pub live_geometry: RwSignal<Option<(WindowId, WindowRect)>>,
    /// Armed snap overlay, if any.
    pub snap_preview: RwSignal<Option<SnapPreview>>,
    /// Whether CSS transitions must be disabled.
    pub transitions_suppressed: RwSignal<bool>,
    /// Effects the view layer still has to carry out (focus, animations).
    pub effects: RwSignal<Vec<WmEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<WmAction>,
}

impl WindowManagerContext {
    /// Dispatches a reducer action through the context callback.
    pub fn dispatch_action(&self, action: WmAction) {
        self.dispatch.call(action);
    }

    /// Takes every queued view-layer effect.
    pub fn drain_effects(&self) -> Vec<WmEffect> {
        let mut drained = Vec::new();
        self.effects.update(|queue| drained = std::mem::take(queue));
        drained
    }
}

#[derive(Clone, Copy)]
struct Handles {
    store: RwSignal<WorkspaceStore>,
    interaction: StoredValue<InteractionState>,
    live_geometry: RwSignal<Option<(WindowId, WindowRect)>>,
    snap_preview: RwSignal<Option<SnapPreview>>,
    transitions_suppressed: RwSignal<bool>,
    effects: RwSignal<Vec<WmEffect>>,
}

fn apply(handles: Handles, action: WmAction) {
    if let Some(window_id) = action.target_window() {
        if !handles.store.with_untracked(|store| store.window(window_id).is_some()) {
            logging::debug_warn!("window manager: ignoring {action:?}, no window {window_id}");
            return;
        }
    }

    let read_only = handles.store.with_untracked(|store| {
        handles
            .interaction
            .with_value(|ui| ui.leaves_store_untouched(store, &action))
    });
    let new_effects = if read_only {
        let mut new_effects = Vec::new();
        handles.store.update_untracked(|store| {
            handles
                .interaction
                .update_value(|ui| new_effects = reduce_window_manager(store, ui, action));
        });
        new_effects
    } else {
        commit(handles, action)
    };

    let mut queued = Vec::new();
    for effect in new_effects {
        match effect {
            WmEffect::LiveGeometry { window_id, rect } => {
                handles.live_geometry.set(Some((window_id, rect)));
            }
            WmEffect::SnapPreview(preview) => handles.snap_preview.set(preview),
            WmEffect::SuppressTransitions(suppressed) => {
                handles.transitions_suppressed.set(suppressed);
                if !suppressed {
                    handles.live_geometry.set(None);
                }
            }
            WmEffect::ScheduleSnapArm { delay_ms } => schedule_snap_arm(handles, delay_ms),
            other => queued.push(other),
        }
    }
    if !queued.is_empty() {
        handles.effects.update(|queue| queue.extend(queued));
    }
}

fn commit(handles: Handles, action: WmAction) -> Vec<WmEffect> {
    let mut store = handles.store.get_untracked();
    let previous = store.clone();

    let mut new_effects = Vec::new();
    handles
        .interaction
        .update_value(|ui| new_effects = reduce_window_manager(&mut store, ui, action));

    if let Some(ws) = store.active_workspace() {
        let newly_initialized = ws.is_initialized
            && previous
                .workspace(ws.id)
                .map_or(true, |before| !before.is_initialized);
        if newly_initialized {
            logging::log!(
                "window manager: initialized workspace {} with {} windows",
                ws.name,
                ws.windows.len()
            );
        }
    }
    if store != previous {
        handles.store.set(store);
    }
    new_effects
}

#[cfg(target_arch = "wasm32")]
fn schedule_snap_arm(handles: Handles, delay_ms: u64) {
    set_timeout(
        move || {
            let timestamp_ms = web_sys::window()
                .and_then(|window| window.performance())
                .map(|performance| performance.now())
                .unwrap_or_default();
            apply(handles, WmAction::SnapArmTick { timestamp_ms });
        },
        std::time::Duration::from_millis(delay_ms),
    );
}

// Off the browser the next pointer move arms the zone.
#[cfg(not(target_arch = "wasm32"))]
fn schedule_snap_arm(_handles: Handles, _delay_ms: u64) {}

/// Creates the window-manager signals and provides [`WindowManagerContext`] to descendants.
pub fn provide_window_manager(config: WindowManagerConfig) -> WindowManagerContext {
    let store = WorkspaceStore::new(config);
    let interaction = store_value(InteractionState::new(&store));
    let handles = Handles {
        store: create_rw_signal(store),
        interaction,
        live_geometry: create_rw_signal(None),
        snap_preview: create_rw_signal(None),
        transitions_suppressed: create_rw_signal(false),
        effects: create_rw_signal(Vec::new()),
    };
    let dispatch = Callback::new(move |action: WmAction| apply(handles, action));

    let context = WindowManagerContext {
        store: handles.store,
        interaction: handles.interaction,
        live_geometry: handles.live_geometry,
        snap_preview: handles.snap_preview,
        transitions_suppressed: handles.transitions_suppressed,
        effects: handles.effects,
        dispatch,
    };
    provide_context(context.clone());
    context
}

/// Like [`provide_window_manager`], parsing the configuration from TOML.
///
/// A configuration that fails to parse or validate is logged and replaced by the defaults.
pub fn provide_window_manager_from_toml(raw: &str) -> WindowManagerContext {
    let config = WindowManagerConfig::from_toml_str(raw).unwrap_or_else(|err| {
        logging::warn!("window manager config rejected: {err}; using defaults");
        WindowManagerConfig::default()
    });
    provide_window_manager(config)
}

#[component]
/// Provides [`WindowManagerContext`] to descendant components.
pub fn WindowManagerProvider(
    /// Window-manager tuning; defaults when omitted.
    #[prop(optional)]
    config: Option<WindowManagerConfig>,
    children: Children,
) -> impl IntoView {
    provide_window_manager(config.unwrap_or_default());
    children().into_view()
}

/// Returns the current [`WindowManagerContext`].
///
/// # Panics
///
/// Panics if called outside [`WindowManagerProvider`] or [`provide_window_manager`].
pub fn use_window_manager() -> WindowManagerContext {
    use_context::<WindowManagerContext>().expect("WindowManagerContext not provided")
}
