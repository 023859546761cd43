//! Authoritative workspace and window state.
//!
//! Every mutator targets the active workspace and treats an unknown id as already satisfied:
//! it returns `false` (or `None`) and changes nothing. Geometry setters do not clamp; the drag
//! and resize controllers enforce constraints before committing.

use crate::config::WindowManagerConfig;
use crate::geometry::{usable_area, ChromeInsets};
use crate::model::{Point, Size, Window, WindowId, WindowRect, WindowSpec, Workspace, WorkspaceId};

/// Viewport assumed until the view layer reports a measurement.
pub const DEFAULT_VIEWPORT: Size = Size::new(1920, 1080);

#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceStore {
    config: WindowManagerConfig,
    viewport: Size,
    workspaces: Vec<Workspace>,
    active_workspace_id: Option<WorkspaceId>,
    next_workspace_id: u64,
    next_window_id: u64,
}

impl Default for WorkspaceStore {
    fn default() -> Self {
        Self::new(WindowManagerConfig::default())
    }
}

impl WorkspaceStore {
    pub fn new(config: WindowManagerConfig) -> Self {
        Self {
            config,
            viewport: DEFAULT_VIEWPORT,
            workspaces: Vec::new(),
            active_workspace_id: None,
            next_workspace_id: 1,
            next_window_id: 1,
        }
    }

    pub fn config(&self) -> &WindowManagerConfig {
        &self.config
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn chrome(&self) -> ChromeInsets {
        ChromeInsets::from_config(&self.config)
    }

    /// Rectangle a maximized window fills.
    pub fn usable_area(&self) -> WindowRect {
        usable_area(self.viewport, self.chrome())
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn workspace(&self, workspace_id: WorkspaceId) -> Option<&Workspace> {
        self.workspaces.iter().find(|ws| ws.id == workspace_id)
    }

    pub fn active_workspace_id(&self) -> Option<WorkspaceId> {
        self.active_workspace_id
    }

    pub fn active_workspace(&self) -> Option<&Workspace> {
        self.active_workspace_id.and_then(|id| self.workspace(id))
    }

    fn active_workspace_mut(&mut self) -> Option<&mut Workspace> {
        let id = self.active_workspace_id?;
        self.workspaces.iter_mut().find(|ws| ws.id == id)
    }

    /// Window in the active workspace.
    pub fn window(&self, window_id: WindowId) -> Option<&Window> {
        self.active_workspace()?.window(window_id)
    }

    fn window_mut(&mut self, window_id: WindowId) -> Option<&mut Window> {
        self.active_workspace_mut()?.window_mut(window_id)
    }

    /// Appends an uninitialized workspace; the first one created becomes active.
    pub fn create_workspace(&mut self, repository_ref: impl Into<String>) -> WorkspaceId {
        let id = WorkspaceId(self.next_workspace_id);
        self.next_workspace_id = self.next_workspace_id.saturating_add(1);
        self.workspaces.push(Workspace::new(id, repository_ref));
        if self.active_workspace_id.is_none() {
            self.active_workspace_id = Some(id);
        }
        id
    }

    /// Discards a workspace and its windows. If it was active, the first remaining workspace
    /// becomes active (and is initialized).
    pub fn remove_workspace(&mut self, workspace_id: WorkspaceId) -> bool {
        let before = self.workspaces.len();
        self.workspaces.retain(|ws| ws.id != workspace_id);
        if self.workspaces.len() == before {
            return false;
        }
        if self.active_workspace_id == Some(workspace_id) {
            self.active_workspace_id = None;
            if let Some(next) = self.workspaces.first().map(|ws| ws.id) {
                self.switch_to_workspace(next);
            }
        }
        true
    }

    /// Makes `workspace_id` active, creating its default windows on the first visit.
    ///
    /// Switching to the already-active workspace still performs the one-time initialization.
    pub fn switch_to_workspace(&mut self, workspace_id: WorkspaceId) -> bool {
        if self.workspace(workspace_id).is_none() {
            return false;
        }
        self.active_workspace_id = Some(workspace_id);
        self.initialize_active_workspace();
        true
    }

    fn initialize_active_workspace(&mut self) {
        let already = self
            .active_workspace()
            .map(|ws| ws.is_initialized)
            .unwrap_or(true);
        if already {
            return;
        }
        if let Some(ws) = self.active_workspace_mut() {
            ws.is_initialized = true;
        }
        let templates = self.config.default_windows.clone();
        for template in &templates {
            self.add_window(template.to_spec());
        }
    }

    /// Creates a focused window on top of the active workspace.
    pub fn add_window(&mut self, spec: WindowSpec) -> Option<WindowId> {
        self.active_workspace_id?;
        let id = WindowId(self.next_window_id);
        self.next_window_id = self.next_window_id.saturating_add(1);

        let min_size = spec
            .min_size
            .unwrap_or_else(|| self.config.min_size_for(&spec.kind));
        let rect = spec.rect.unwrap_or_else(|| self.cascade_rect());
        let size = rect.size().at_least(min_size);
        let title = spec
            .title
            .unwrap_or_else(|| spec.kind.as_str().to_string());

        let ws = self.active_workspace_mut()?;
        let z_index = ws.next_z_index;
        ws.next_z_index = ws.next_z_index.saturating_add(1);
        for window in &mut ws.windows {
            window.focused = false;
        }
        ws.windows.push(Window {
            id,
            kind: spec.kind,
            title,
            position: rect.position(),
            size,
            min_size,
            z_index,
            minimized: false,
            maximized: false,
            focused: true,
            previous_state: None,
            is_animating: false,
            content: spec.content,
        });
        ws.active_window_id = Some(id);
        Some(id)
    }

    fn cascade_rect(&self) -> WindowRect {
        let usable = self.usable_area();
        let count = self
            .active_workspace()
            .map(|ws| ws.windows.len())
            .unwrap_or(0);
        let offset = (count % 8) as i32 * self.config.cascade_step;
        WindowRect::from_parts(
            Point::new(usable.x + 40 + offset, usable.y + 40 + offset),
            self.config.default_window_size,
        )
    }

    pub fn remove_window(&mut self, window_id: WindowId) -> bool {
        let Some(ws) = self.active_workspace_mut() else {
            return false;
        };
        let before = ws.windows.len();
        ws.windows.retain(|w| w.id != window_id);
        if ws.windows.len() == before {
            return false;
        }
        if ws.active_window_id == Some(window_id) {
            ws.active_window_id = None;
            hand_off_focus(ws);
        }
        true
    }

    /// Raises `window_id` above every sibling and gives it exclusive focus.
    pub fn focus_window(&mut self, window_id: WindowId) -> bool {
        let Some(ws) = self.active_workspace_mut() else {
            return false;
        };
        if ws.window(window_id).is_none() {
            return false;
        }
        let top = ws.max_z_index().unwrap_or(0);
        let z_index = top.saturating_add(1);
        for window in &mut ws.windows {
            if window.id == window_id {
                window.z_index = z_index;
                window.focused = true;
                window.minimized = false;
            } else {
                window.focused = false;
            }
        }
        ws.next_z_index = ws.next_z_index.max(z_index.saturating_add(1));
        ws.active_window_id = Some(window_id);
        true
    }

    /// Minimizes a window; focus passes to the top-most remaining visible window.
    pub fn minimize_window(&mut self, window_id: WindowId) -> bool {
        let Some(ws) = self.active_workspace_mut() else {
            return false;
        };
        let Some(window) = ws.window_mut(window_id) else {
            return false;
        };
        window.minimized = true;
        let was_focused = std::mem::replace(&mut window.focused, false);
        if was_focused || ws.active_window_id == Some(window_id) {
            ws.active_window_id = None;
            hand_off_focus(ws);
        }
        true
    }

    /// Saves the current geometry and fills the usable area. Already-maximized windows keep
    /// their saved geometry.
    pub fn maximize_window(&mut self, window_id: WindowId) -> bool {
        let usable = self.usable_area();
        let Some(window) = self.window_mut(window_id) else {
            return false;
        };
        if !window.maximized {
            window.previous_state = Some(window.rect());
            window.maximized = true;
        }
        window.position = usable.position();
        window.size = usable.size();
        true
    }

    /// Writes saved geometry back, if any, and clears the minimized and maximized flags.
    pub fn restore_window(&mut self, window_id: WindowId) -> bool {
        let Some(window) = self.window_mut(window_id) else {
            return false;
        };
        if let Some(previous) = window.previous_state.take() {
            window.position = previous.position();
            window.size = previous.size();
        }
        window.minimized = false;
        window.maximized = false;
        true
    }

    pub fn move_window(&mut self, window_id: WindowId, x: i32, y: i32) -> bool {
        let Some(window) = self.window_mut(window_id) else {
            return false;
        };
        window.position = Point::new(x, y);
        true
    }

    pub fn resize_window(&mut self, window_id: WindowId, width: i32, height: i32) -> bool {
        let Some(window) = self.window_mut(window_id) else {
            return false;
        };
        window.size = Size::new(width, height);
        true
    }

    /// Commits position and size in one update and leaves any maximized state.
    pub fn set_window_geometry(&mut self, window_id: WindowId, rect: WindowRect) -> bool {
        let Some(window) = self.window_mut(window_id) else {
            return false;
        };
        window.position = rect.position();
        window.size = rect.size();
        window.maximized = false;
        window.previous_state = None;
        true
    }

    pub fn set_animating(&mut self, window_id: WindowId, animating: bool) -> bool {
        let Some(window) = self.window_mut(window_id) else {
            return false;
        };
        window.is_animating = animating;
        true
    }
}

/// Focuses the top-most visible window without raising it further.
fn hand_off_focus(ws: &mut Workspace) {
    for window in &mut ws.windows {
        window.focused = false;
    }
    let Some(next) = ws.topmost_visible().map(|w| w.id) else {
        return;
    };
    if let Some(window) = ws.window_mut(next) {
        window.focused = true;
    }
    ws.active_window_id = Some(next);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::config::WindowTemplate;
    use crate::model::WindowKind;

    fn bare_config() -> WindowManagerConfig {
        WindowManagerConfig {
            default_windows: Vec::new(),
            ..WindowManagerConfig::default()
        }
    }

    fn store_with_workspace() -> WorkspaceStore {
        let mut store = WorkspaceStore::new(bare_config());
        let ws = store.create_workspace("acme/api");
        store.switch_to_workspace(ws);
        store
    }

    fn assert_focus_invariants(store: &WorkspaceStore) {
        for ws in store.workspaces() {
            let focused: Vec<_> = ws.windows.iter().filter(|w| w.focused).collect();
            assert!(focused.len() <= 1, "more than one focused window");
            assert!(focused.iter().all(|w| !w.minimized));
            if let Some(active) = ws.active_window_id {
                assert!(ws.window(active).is_some(), "dangling active window");
            }
        }
    }

    #[test]
    fn first_workspace_becomes_active_uninitialized() {
        let mut store = WorkspaceStore::default();
        let first = store.create_workspace("acme/api");
        let second = store.create_workspace("acme/web");
        assert_eq!(store.active_workspace_id(), Some(first));
        assert!(!store.workspace(first).unwrap().is_initialized);
        assert!(!store.workspace(second).unwrap().is_initialized);
    }

    #[test]
    fn switching_initializes_default_windows_once() {
        let mut store = WorkspaceStore::default();
        let ws = store.create_workspace("acme/api");
        assert!(store.switch_to_workspace(ws));
        let count = store.active_workspace().unwrap().windows.len();
        assert_eq!(count, 3);
        assert!(store.switch_to_workspace(ws));
        assert_eq!(store.active_workspace().unwrap().windows.len(), count);

        let kinds: Vec<_> = store
            .active_workspace()
            .unwrap()
            .windows
            .iter()
            .map(|w| w.kind.as_str().to_string())
            .collect();
        assert_eq!(kinds, vec!["editor", "terminal", "assistant"]);
        assert_focus_invariants(&store);
    }

    #[test]
    fn switching_to_unknown_workspace_is_noop() {
        let mut store = store_with_workspace();
        let active = store.active_workspace_id();
        assert!(!store.switch_to_workspace(WorkspaceId(999)));
        assert_eq!(store.active_workspace_id(), active);
    }

    #[test]
    fn windows_are_scoped_to_their_workspace() {
        let mut store = store_with_workspace();
        let first_ws = store.active_workspace_id().unwrap();
        let win = store.add_window(WindowSpec::new("terminal")).unwrap();
        let second_ws = store.create_workspace("acme/web");
        store.switch_to_workspace(second_ws);

        assert!(store.window(win).is_none());
        assert!(!store.focus_window(win));
        assert!(!store.remove_window(win));
        assert_eq!(store.workspace(first_ws).unwrap().windows.len(), 1);
    }

    #[test]
    fn add_window_focuses_new_window_and_bumps_z_index() {
        let mut store = store_with_workspace();
        let first = store.add_window(WindowSpec::new("terminal")).unwrap();
        let second = store.add_window(WindowSpec::new("terminal")).unwrap();

        let a = store.window(first).unwrap();
        let b = store.window(second).unwrap();
        assert_eq!(b.z_index, a.z_index + 1);
        assert!(b.focused);
        assert!(!a.focused);
        assert_eq!(store.active_workspace().unwrap().active_window_id, Some(second));
    }

    #[test]
    fn add_window_without_active_workspace_is_noop() {
        let mut store = WorkspaceStore::default();
        assert_eq!(store.add_window(WindowSpec::new("terminal")), None);
    }

    #[test]
    fn add_window_enforces_kind_minimum() {
        let mut config = bare_config();
        config
            .min_size_overrides
            .insert(WindowKind::from("assistant"), Size::new(360, 300));
        let mut store = WorkspaceStore::new(config);
        let ws = store.create_workspace("acme/api");
        store.switch_to_workspace(ws);

        let id = store
            .add_window(
                WindowSpec::new("assistant").with_rect(WindowRect::new(10, 10, 100, 100)),
            )
            .unwrap();
        let window = store.window(id).unwrap();
        assert_eq!(window.size, Size::new(360, 300));
        assert_eq!(window.min_size, Size::new(360, 300));
    }

    #[test]
    fn focus_raises_above_all_siblings() {
        let mut store = store_with_workspace();
        let a = store.add_window(WindowSpec::new("editor")).unwrap();
        let b = store.add_window(WindowSpec::new("terminal")).unwrap();
        let c = store.add_window(WindowSpec::new("assistant")).unwrap();

        assert!(store.focus_window(a));
        let top = store.window(a).unwrap().z_index;
        assert!(top > store.window(b).unwrap().z_index);
        assert!(top > store.window(c).unwrap().z_index);
        assert!(store.active_workspace().unwrap().next_z_index > top);

        let d = store.add_window(WindowSpec::new("settings")).unwrap();
        assert!(store.window(d).unwrap().z_index > top);
    }

    #[test]
    fn remove_window_clears_active_and_hands_off_focus() {
        let mut store = store_with_workspace();
        let a = store.add_window(WindowSpec::new("editor")).unwrap();
        let b = store.add_window(WindowSpec::new("terminal")).unwrap();

        assert!(store.remove_window(b));
        let ws = store.active_workspace().unwrap();
        assert_eq!(ws.active_window_id, Some(a));
        assert!(ws.window(a).unwrap().focused);

        assert!(store.remove_window(a));
        assert_eq!(store.active_workspace().unwrap().active_window_id, None);
        assert!(!store.remove_window(a));
    }

    #[test]
    fn minimize_unfocuses_and_focus_unminimizes() {
        let mut store = store_with_workspace();
        let a = store.add_window(WindowSpec::new("editor")).unwrap();
        let b = store.add_window(WindowSpec::new("terminal")).unwrap();

        assert!(store.minimize_window(b));
        let window = store.window(b).unwrap();
        assert!(window.minimized && !window.focused);
        assert!(store.window(a).unwrap().focused);

        assert!(store.focus_window(b));
        let window = store.window(b).unwrap();
        assert!(!window.minimized && window.focused);
        assert_focus_invariants(&store);
    }

    #[test]
    fn maximize_then_restore_round_trips_geometry() {
        let mut store = store_with_workspace();
        let id = store
            .add_window(WindowSpec::new("editor").with_rect(WindowRect::new(100, 100, 400, 300)))
            .unwrap();

        assert!(store.maximize_window(id));
        let window = store.window(id).unwrap();
        assert!(window.maximized);
        assert_eq!(window.rect(), store.usable_area());
        assert_eq!(window.previous_state, Some(WindowRect::new(100, 100, 400, 300)));

        assert!(store.maximize_window(id));
        assert_eq!(
            store.window(id).unwrap().previous_state,
            Some(WindowRect::new(100, 100, 400, 300))
        );

        assert!(store.restore_window(id));
        let window = store.window(id).unwrap();
        assert_eq!(window.rect(), WindowRect::new(100, 100, 400, 300));
        assert!(!window.maximized);
        assert_eq!(window.previous_state, None);
    }

    #[test]
    fn restore_without_saved_geometry_only_clears_flags() {
        let mut store = store_with_workspace();
        let id = store
            .add_window(WindowSpec::new("editor").with_rect(WindowRect::new(10, 20, 300, 250)))
            .unwrap();
        store.minimize_window(id);
        assert!(store.restore_window(id));
        let window = store.window(id).unwrap();
        assert!(!window.minimized);
        assert_eq!(window.rect(), WindowRect::new(10, 20, 300, 250));
    }

    #[test]
    fn setters_do_not_clamp() {
        let mut store = store_with_workspace();
        let id = store.add_window(WindowSpec::new("editor")).unwrap();
        assert!(store.move_window(id, -5, -5));
        assert!(store.resize_window(id, 10, 10));
        assert_eq!(store.window(id).unwrap().rect(), WindowRect::new(-5, -5, 10, 10));
    }

    #[test]
    fn removing_active_workspace_activates_and_initializes_next() {
        let mut config = bare_config();
        config.default_windows = vec![WindowTemplate {
            kind: WindowKind::from("terminal"),
            title: "Terminal".to_string(),
            rect: None,
        }];
        let mut store = WorkspaceStore::new(config);
        let first = store.create_workspace("acme/api");
        let second = store.create_workspace("acme/web");
        store.switch_to_workspace(first);

        assert!(store.remove_workspace(first));
        assert_eq!(store.active_workspace_id(), Some(second));
        assert_eq!(store.active_workspace().unwrap().windows.len(), 1);
        assert!(!store.remove_workspace(first));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        Focus(usize),
        Minimize(usize),
        Remove(usize),
        Maximize(usize),
        Restore(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Add),
            (0usize..8).prop_map(Op::Focus),
            (0usize..8).prop_map(Op::Minimize),
            (0usize..8).prop_map(Op::Remove),
            (0usize..8).prop_map(Op::Maximize),
            (0usize..8).prop_map(Op::Restore),
        ]
    }

    fn pick(ids: &[WindowId], i: usize) -> Option<WindowId> {
        ids.get(i % ids.len().max(1)).copied()
    }

    proptest! {
        #[test]
        fn focus_stays_exclusive_and_latest_focus_is_on_top(
            ops in prop::collection::vec(op_strategy(), 1..60),
        ) {
            let mut store = store_with_workspace();
            let mut ids: Vec<WindowId> = Vec::new();
            for op in ops {
                let raised = match op {
                    Op::Add => {
                        let id = store.add_window(WindowSpec::new("terminal")).unwrap();
                        ids.push(id);
                        Some(id)
                    }
                    Op::Focus(i) => pick(&ids, i).filter(|id| store.focus_window(*id)),
                    Op::Minimize(i) => {
                        if let Some(id) = pick(&ids, i) {
                            store.minimize_window(id);
                        }
                        None
                    }
                    Op::Remove(i) => {
                        if let Some(id) = pick(&ids, i) {
                            store.remove_window(id);
                            ids.retain(|w| *w != id);
                        }
                        None
                    }
                    Op::Maximize(i) => {
                        if let Some(id) = pick(&ids, i) {
                            store.maximize_window(id);
                        }
                        None
                    }
                    Op::Restore(i) => {
                        if let Some(id) = pick(&ids, i) {
                            store.restore_window(id);
                        }
                        None
                    }
                };

                let ws = store.active_workspace().unwrap();
                prop_assert!(ws.windows.iter().filter(|w| w.focused).count() <= 1);
                prop_assert!(ws.windows.iter().all(|w| !(w.focused && w.minimized)));
                if let Some(active) = ws.active_window_id {
                    prop_assert!(ws.window(active).is_some());
                }
                if let Some(id) = raised {
                    let top = ws.window(id).unwrap().z_index;
                    prop_assert!(ws.windows.iter().filter(|w| w.id != id).all(|w| w.z_index < top));
                    prop_assert!(ws.window(id).unwrap().focused);
                }
            }
        }

        #[test]
        fn maximize_restore_round_trip(
            x in 0i32..4000,
            y in 0i32..4000,
            w in 250i32..4000,
            h in 200i32..4000,
        ) {
            let mut store = store_with_workspace();
            let rect = WindowRect::new(x, y, w, h);
            let id = store.add_window(WindowSpec::new("editor").with_rect(rect)).unwrap();
            store.maximize_window(id);
            store.restore_window(id);
            prop_assert_eq!(store.window(id).unwrap().rect(), rect);
        }
    }
}
