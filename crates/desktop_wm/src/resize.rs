//! Border/corner resize gesture: `Idle -> Resizing -> Idle`.

use crate::geometry::resize_rect;
use crate::model::{Point, PointerSample, ResizeHandle, Size, WindowId, WindowRect};
use crate::store::WorkspaceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub handle: ResizeHandle,
    pub pointer_start: Point,
    pub rect_start: WindowRect,
    pub min_size: Size,
    /// Geometry tracked during the gesture; committed once on end.
    pub live: WindowRect,
}

#[derive(Debug, Default)]
pub struct ResizeController {
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    pub fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    pub fn live_rect(&self) -> Option<WindowRect> {
        self.session.map(|session| session.live)
    }

    /// Starts a resize from `handle`. Maximized, minimized and unknown windows are refused.
    pub fn begin(
        &mut self,
        store: &mut WorkspaceStore,
        window_id: WindowId,
        handle: ResizeHandle,
        pointer: PointerSample,
    ) -> bool {
        self.cancel();
        let Some(window) = store.window(window_id) else {
            return false;
        };
        if window.maximized || window.minimized {
            return false;
        }
        let rect = window.rect();
        self.session = Some(ResizeSession {
            window_id,
            handle,
            pointer_start: pointer.point(),
            rect_start: rect,
            min_size: window.min_size,
            live: rect,
        });
        store.focus_window(window_id);
        true
    }

    /// Recomputes the live rectangle from the total delta since the gesture started.
    pub fn update(&mut self, pointer: PointerSample) -> Option<WindowRect> {
        let session = self.session.as_mut()?;
        let dx = pointer.x - session.pointer_start.x;
        let dy = pointer.y - session.pointer_start.y;
        session.live = resize_rect(session.rect_start, session.handle, dx, dy, session.min_size);
        Some(session.live)
    }

    /// Commits the final geometry in one store update.
    pub fn end(
        &mut self,
        store: &mut WorkspaceStore,
        pointer: PointerSample,
    ) -> Option<WindowRect> {
        self.update(pointer)?;
        let session = self.session.take()?;
        store
            .set_window_geometry(session.window_id, session.live)
            .then_some(session.live)
    }

    /// Abandons the gesture; the window keeps its pre-gesture geometry.
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }
}
