use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkspaceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "workspace-{}", self.0)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// Opaque content-type tag supplied by content providers.
///
/// The window manager only uses it to look up a per-kind minimum size and to report it back to
/// the view layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowKind(pub String);

impl WindowKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowKind {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum, used to enforce minimum sizes.
    pub fn at_least(self, min: Size) -> Self {
        Self {
            width: self.width.max(min.width),
            height: self.height.max(min.height),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_parts(position: Point, size: Size) -> Self {
        Self {
            x: position.x,
            y: position.y,
            w: size.width,
            h: size.height,
        }
    }

    pub fn position(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn right(self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(self) -> i32 {
        self.y + self.h
    }

    /// Center in fractional pixels.
    pub fn center(self) -> (f64, f64) {
        (
            f64::from(self.x) + f64::from(self.w) / 2.0,
            f64::from(self.y) + f64::from(self.h) / 2.0,
        )
    }

    /// Half-open containment: the right and bottom edges are outside the rectangle.
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    pub fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// One pointer event as seen by the gesture controllers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: i32,
    pub y: i32,
    /// Event timestamp in milliseconds (`Event.timeStamp` in the browser).
    pub timestamp_ms: f64,
}

impl PointerSample {
    pub const fn new(x: i32, y: i32, timestamp_ms: f64) -> Self {
        Self { x, y, timestamp_ms }
    }

    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Resize handle on a window frame: four edges and four corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    pub fn north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    pub fn south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    pub fn east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    /// Short compass code used by the view layer (`"n"`, `"se"`, ...).
    pub fn code(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::South => "s",
            Self::East => "e",
            Self::West => "w",
            Self::NorthEast => "ne",
            Self::NorthWest => "nw",
            Self::SouthEast => "se",
            Self::SouthWest => "sw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resize handle `{0}`")]
pub struct UnknownResizeHandle(pub String);

impl FromStr for ResizeHandle {
    type Err = UnknownResizeHandle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|handle| handle.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownResizeHandle(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    pub kind: WindowKind,
    pub title: String,
    pub position: Point,
    pub size: Size,
    pub min_size: Size,
    pub z_index: u32,
    pub minimized: bool,
    pub maximized: bool,
    pub focused: bool,
    /// Geometry to return to on restore; present only while maximized.
    pub previous_state: Option<WindowRect>,
    pub is_animating: bool,
    /// Opaque content-provider payload.
    pub content: Value,
}

impl Window {
    pub fn rect(&self) -> WindowRect {
        WindowRect::from_parts(self.position, self.size)
    }

    pub fn is_visible(&self) -> bool {
        !self.minimized
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub repository_ref: String,
    pub windows: Vec<Window>,
    pub next_z_index: u32,
    pub active_window_id: Option<WindowId>,
    pub is_initialized: bool,
}

impl Workspace {
    pub fn new(id: WorkspaceId, repository_ref: impl Into<String>) -> Self {
        let repository_ref = repository_ref.into();
        Self {
            id,
            name: workspace_name(&repository_ref),
            repository_ref,
            windows: Vec::new(),
            next_z_index: 1,
            active_window_id: None,
            is_initialized: false,
        }
    }

    pub fn window(&self, window_id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn window_mut(&mut self, window_id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id == window_id)
    }

    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.focused).map(|w| w.id)
    }

    pub fn max_z_index(&self) -> Option<u32> {
        self.windows.iter().map(|w| w.z_index).max()
    }

    /// Windows in paint order (ascending z-index).
    pub fn stacking_order(&self) -> Vec<&Window> {
        let mut windows: Vec<&Window> = self.windows.iter().collect();
        windows.sort_by_key(|w| w.z_index);
        windows
    }

    /// Top-most window that is not minimized.
    pub fn topmost_visible(&self) -> Option<&Window> {
        self.windows
            .iter()
            .filter(|w| w.is_visible())
            .max_by_key(|w| w.z_index)
    }
}

fn workspace_name(repository_ref: &str) -> String {
    repository_ref
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(repository_ref)
        .to_string()
}

/// Request to create a window in the active workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub kind: WindowKind,
    pub title: Option<String>,
    pub rect: Option<WindowRect>,
    pub min_size: Option<Size>,
    pub content: Value,
}

impl WindowSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: WindowKind::new(kind),
            title: None,
            rect: None,
            min_size: None,
            content: Value::Null,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_rect(mut self, rect: WindowRect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_min_size(mut self, min_size: Size) -> Self {
        self.min_size = Some(min_size);
        self
    }

    pub fn with_content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn workspace_name_uses_last_repository_segment() {
        assert_eq!(Workspace::new(WorkspaceId(1), "acme/widgets").name, "widgets");
        assert_eq!(Workspace::new(WorkspaceId(1), "acme/widgets/").name, "widgets");
        assert_eq!(Workspace::new(WorkspaceId(1), "solo").name, "solo");
    }

    #[test]
    fn resize_handles_parse_from_compass_codes() {
        assert_eq!("ne".parse::<ResizeHandle>(), Ok(ResizeHandle::NorthEast));
        assert_eq!(" SW ".parse::<ResizeHandle>(), Ok(ResizeHandle::SouthWest));
        assert!("up".parse::<ResizeHandle>().is_err());
        for handle in ResizeHandle::ALL {
            assert_eq!(handle.code().parse::<ResizeHandle>(), Ok(handle));
        }
    }

    #[test]
    fn corner_handles_activate_two_edges() {
        let ne = ResizeHandle::NorthEast;
        assert!(ne.north() && ne.east());
        assert!(!ne.south() && !ne.west());
        assert!(ResizeHandle::West.west());
        assert!(!ResizeHandle::West.north());
    }

    #[test]
    fn rect_containment_is_half_open() {
        let rect = WindowRect::new(0, 0, 50, 100);
        assert!(rect.contains(Point::new(0, 0)));
        assert!(rect.contains(Point::new(49, 99)));
        assert!(!rect.contains(Point::new(50, 10)));
        assert!(!rect.contains(Point::new(10, 100)));
    }
}
