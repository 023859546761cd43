//! Window-management core for a browser workspace desktop.
//!
//! [`store::WorkspaceStore`] owns workspaces and their windows. Pointer gestures run through
//! [`drag::DragController`] and [`resize::ResizeController`], and everything is driven from the
//! view layer by dispatching [`reducer::WmAction`] values, either directly through
//! [`reduce_window_manager`] or through the Leptos context in [`runtime_context`].

pub mod animation;
pub mod config;
pub mod drag;
pub mod geometry;
pub mod input;
pub mod model;
pub mod reducer;
pub mod resize;
pub mod runtime_context;
pub mod snap;
pub mod store;

pub use config::{ConfigError, WindowManagerConfig};
pub use model::*;
pub use reducer::{reduce_window_manager, InteractionState, WmAction, WmEffect};
pub use runtime_context::{
    provide_window_manager, use_window_manager, WindowManagerContext, WindowManagerProvider,
};
pub use store::WorkspaceStore;
