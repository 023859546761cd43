//! Title-bar drag gesture: `Idle -> Dragging -> Idle`.
//!
//! Pointer deltas accumulate in the session and are written to the store once, on a well-formed
//! end event. Cancelling or abandoning the gesture leaves the last committed geometry in place.

use serde::{Deserialize, Serialize};

use crate::config::WindowManagerConfig;
use crate::geometry::{clamp_position, ChromeInsets, SnapZoneId};
use crate::model::{Point, PointerSample, Size, WindowId, WindowRect};
use crate::snap::{SnapEvent, SnapZoneDetector};
use crate::store::WorkspaceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    /// Committed origin the offset is applied to.
    pub origin: Point,
    pub size: Size,
    pub offset: Point,
    pub last_pointer: Point,
    /// Set once a maximized window has been popped out under the pointer.
    pub popped_out: bool,
    pub started_maximized: bool,
}

impl DragSession {
    /// Where the window would land if the gesture ended now without a snap.
    pub fn live_rect(&self) -> WindowRect {
        let position = clamp_position(Point::new(
            self.origin.x + self.offset.x,
            self.origin.y + self.offset.y,
        ));
        WindowRect::from_parts(position, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragOutcome {
    /// Committed via a plain move to `position`.
    Moved {
        window_id: WindowId,
        position: Point,
    },
    /// Dropped onto a snap zone and given its preview rectangle.
    Snapped {
        window_id: WindowId,
        zone: SnapZoneId,
        rect: WindowRect,
    },
    /// Nothing was committed.
    Ignored,
}

#[derive(Debug)]
pub struct DragController {
    title_bar_height: i32,
    snap: SnapZoneDetector,
    session: Option<DragSession>,
}

impl DragController {
    pub fn new(config: &WindowManagerConfig, viewport: Size) -> Self {
        Self {
            title_bar_height: config.title_bar_height,
            snap: SnapZoneDetector::new(
                config.snap.clone(),
                ChromeInsets::from_config(config),
                viewport,
            ),
            session: None,
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.snap.set_viewport(viewport);
    }

    pub fn snap(&self) -> &SnapZoneDetector {
        &self.snap
    }

    pub fn snap_mut(&mut self) -> &mut SnapZoneDetector {
        &mut self.snap
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn live_rect(&self) -> Option<WindowRect> {
        self.session.as_ref().map(DragSession::live_rect)
    }

    /// Starts dragging `window_id`, focusing it so it rises above its siblings.
    ///
    /// Returns `false` for unknown or minimized windows. A gesture already in flight is abandoned.
    pub fn begin(
        &mut self,
        store: &mut WorkspaceStore,
        window_id: WindowId,
        pointer: PointerSample,
    ) -> bool {
        self.cancel();
        let Some(window) = store.window(window_id) else {
            return false;
        };
        if window.minimized {
            return false;
        }
        let session = DragSession {
            window_id,
            origin: window.position,
            size: window.size,
            offset: Point::default(),
            last_pointer: pointer.point(),
            popped_out: false,
            started_maximized: window.maximized,
        };
        store.focus_window(window_id);
        self.session = Some(session);
        true
    }

    /// Applies one pointer move and forwards it to the snap detector.
    pub fn update(
        &mut self,
        store: &mut WorkspaceStore,
        pointer: PointerSample,
    ) -> Option<SnapEvent> {
        let session = self.session.as_mut()?;
        let Some(window) = store.window(session.window_id) else {
            self.cancel();
            return None;
        };

        if window.maximized && !session.popped_out {
            let restored = window
                .previous_state
                .map(WindowRect::size)
                .unwrap_or(window.size);
            let position = clamp_position(Point::new(
                pointer.x - restored.width / 2,
                pointer.y - self.title_bar_height,
            ));
            store.restore_window(session.window_id);
            store.move_window(session.window_id, position.x, position.y);
            session.origin = position;
            session.size = restored;
            session.offset = Point::default();
            session.popped_out = true;
        } else {
            session.offset.x += pointer.x - session.last_pointer.x;
            session.offset.y += pointer.y - session.last_pointer.y;
        }
        session.last_pointer = pointer.point();

        self.snap.update(pointer.point(), pointer.timestamp_ms)
    }

    /// Finishes the gesture at `pointer` and commits the result.
    pub fn end(&mut self, store: &mut WorkspaceStore, pointer: PointerSample) -> DragOutcome {
        let Some(mut session) = self.session.take() else {
            return DragOutcome::Ignored;
        };
        if store.window(session.window_id).is_none() {
            self.snap.reset();
            return DragOutcome::Ignored;
        }
        if session.started_maximized && !session.popped_out {
            self.snap.reset();
            return DragOutcome::Ignored;
        }

        session.offset.x += pointer.x - session.last_pointer.x;
        session.offset.y += pointer.y - session.last_pointer.y;

        let window_id = session.window_id;
        if let Some(zone) = self.snap.handle_drag_end(pointer.x, pointer.y) {
            if zone.id.maximizes() {
                store.maximize_window(window_id);
            } else {
                store.set_window_geometry(window_id, zone.preview);
            }
            return DragOutcome::Snapped {
                window_id,
                zone: zone.id,
                rect: zone.preview,
            };
        }

        let position = session.live_rect().position();
        store.move_window(window_id, position.x, position.y);
        DragOutcome::Moved {
            window_id,
            position,
        }
    }

    /// Abandons the gesture without committing. Returns `true` if one was active.
    pub fn cancel(&mut self) -> bool {
        self.snap.reset();
        self.session.take().is_some()
    }
}
