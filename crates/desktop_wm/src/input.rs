//! DOM event adapters for window chrome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

use crate::model::{PointerSample, ResizeHandle, UnknownResizeHandle};

/// Attribute carrying a handle's compass code on resize-handle elements.
pub const RESIZE_HANDLE_ATTR: &str = "data-resize-handle";

/// Client coordinates plus `Event.timeStamp`, the clock the snap arm delay runs on.
///
/// ```no_run
/// use desktop_wm::input::pointer_sample_from_event;
/// use desktop_wm::{use_window_manager, WmAction};
///
/// fn on_title_bar_pointer_move(ev: web_sys::PointerEvent) {
///     let wm = use_window_manager();
///     wm.dispatch_action(WmAction::UpdateMove {
///         pointer: pointer_sample_from_event(&ev),
///     });
/// }
/// ```
pub fn pointer_sample_from_event(ev: &web_sys::PointerEvent) -> PointerSample {
    PointerSample::new(ev.client_x(), ev.client_y(), ev.time_stamp())
}

pub fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

#[cfg(target_arch = "wasm32")]
pub fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

/// Reads the handle of a resize-handle element from [`RESIZE_HANDLE_ATTR`].
#[cfg(target_arch = "wasm32")]
pub fn resize_handle_from_event(
    ev: &web_sys::PointerEvent,
) -> Result<Option<ResizeHandle>, UnknownResizeHandle> {
    let value = ev
        .current_target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|element| element.get_attribute(RESIZE_HANDLE_ATTR));
    parse_resize_handle_attr(value.as_deref())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn resize_handle_from_event(
    _: &web_sys::PointerEvent,
) -> Result<Option<ResizeHandle>, UnknownResizeHandle> {
    Ok(None)
}

/// An absent attribute is `Ok(None)`; a present but unrecognized one is an error.
pub fn parse_resize_handle_attr(
    value: Option<&str>,
) -> Result<Option<ResizeHandle>, UnknownResizeHandle> {
    value.map(str::parse).transpose()
}

/// CSS class for a handle element, paired with [`RESIZE_HANDLE_ATTR`].
pub fn resize_handle_class(handle: ResizeHandle) -> &'static str {
    match handle {
        ResizeHandle::North => "edge-n",
        ResizeHandle::South => "edge-s",
        ResizeHandle::East => "edge-e",
        ResizeHandle::West => "edge-w",
        ResizeHandle::NorthEast => "edge-ne",
        ResizeHandle::NorthWest => "edge-nw",
        ResizeHandle::SouthEast => "edge-se",
        ResizeHandle::SouthWest => "edge-sw",
    }
}
