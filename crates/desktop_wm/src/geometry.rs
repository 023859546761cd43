//! Pure geometry helpers shared by the controllers, the store and the animation coordinator.

use serde::{Deserialize, Serialize};

use crate::config::{SnapConfig, WindowManagerConfig};
use crate::model::{Point, ResizeHandle, Size, WindowRect};

/// Screen-edge region a dragged window can be dropped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapZoneId {
    Left,
    Right,
    Top,
}

impl SnapZoneId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
        }
    }

    /// `true` for the zone that maximizes instead of tiling.
    pub fn maximizes(self) -> bool {
        matches!(self, Self::Top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapZone {
    pub id: SnapZoneId,
    /// Activation band tested against the pointer.
    pub bounds: WindowRect,
    /// Rectangle the window occupies when dropped here.
    pub preview: WindowRect,
}

/// Chrome reserved around the usable workspace area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeInsets {
    pub top: i32,
    pub bottom: i32,
}

impl ChromeInsets {
    pub fn from_config(config: &WindowManagerConfig) -> Self {
        Self {
            top: config.reserved_top,
            bottom: config.reserved_bottom,
        }
    }
}

/// Clamps a window origin so neither coordinate is negative.
///
/// There is no upper bound: windows may hang off the right or bottom edge.
pub fn clamp_position(position: Point) -> Point {
    Point::new(position.x.max(0), position.y.max(0))
}

/// Viewport minus reserved chrome; this is what a maximized window fills.
pub fn usable_area(viewport: Size, chrome: ChromeInsets) -> WindowRect {
    let top = chrome.top.clamp(0, viewport.height.max(0));
    let height = (viewport.height - top - chrome.bottom).max(0);
    WindowRect::new(0, top, viewport.width.max(0), height)
}

/// Computes the three snap zones for a viewport.
///
/// The left and right bands span the usable height. The top band spans the width between them,
/// so a pointer in a corner resolves to exactly one zone. Bands are half-open like every
/// [`WindowRect`]: the default left band covers `0 <= x < 50`, so `x = 50` is outside it.
pub fn snap_zones(viewport: Size, chrome: ChromeInsets, snap: &SnapConfig) -> [SnapZone; 3] {
    let usable = usable_area(viewport, chrome);
    let edge = snap.edge_width.min(usable.w / 2).max(0);
    let half = usable.w / 2;

    [
        SnapZone {
            id: SnapZoneId::Left,
            bounds: WindowRect::new(0, usable.y, edge, usable.h),
            preview: WindowRect::new(0, usable.y, half, usable.h),
        },
        SnapZone {
            id: SnapZoneId::Right,
            bounds: WindowRect::new(usable.w - edge, usable.y, edge, usable.h),
            preview: WindowRect::new(usable.w - half, usable.y, half, usable.h),
        },
        SnapZone {
            id: SnapZoneId::Top,
            bounds: WindowRect::new(edge, 0, (usable.w - 2 * edge).max(0), snap.top_height),
            preview: usable,
        },
    ]
}

/// Returns the first zone whose band contains `point`.
pub fn hit_test<'a>(point: Point, zones: &'a [SnapZone]) -> Option<&'a SnapZone> {
    zones.iter().find(|zone| zone.bounds.contains(point))
}

/// Visual transform relative to a window's own rectangle, with the origin at its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    };

    pub const COLLAPSED: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale_x: 0.0,
        scale_y: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// CSS `transform` value; pair with `transform-origin: center`.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({}, {})",
            self.translate_x, self.translate_y, self.scale_x, self.scale_y
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Transform that maps `from` onto `to`: center-to-center translation plus per-axis scale.
///
/// Falls back to identity when `from` has no area, so no `NaN` reaches the view layer.
pub fn rect_transform(from: WindowRect, to: WindowRect) -> Transform {
    if from.is_empty() {
        return Transform::IDENTITY;
    }
    let (from_cx, from_cy) = from.center();
    let (to_cx, to_cy) = to.center();
    let transform = Transform {
        translate_x: to_cx - from_cx,
        translate_y: to_cy - from_cy,
        scale_x: f64::from(to.w.max(0)) / f64::from(from.w),
        scale_y: f64::from(to.h.max(0)) / f64::from(from.h),
    };
    if [
        transform.translate_x,
        transform.translate_y,
        transform.scale_x,
        transform.scale_y,
    ]
    .iter()
    .all(|v| v.is_finite())
    {
        transform
    } else {
        Transform::IDENTITY
    }
}

/// Shrink transform from a window rectangle into its dock icon.
///
/// An unresolved icon collapses the window in place.
pub fn minimize_transform(window: WindowRect, icon: Option<WindowRect>) -> Transform {
    if window.is_empty() {
        return Transform::IDENTITY;
    }
    match icon {
        Some(icon) => rect_transform(window, icon),
        None => Transform::COLLAPSED,
    }
}

/// Applies a pointer delta to a start rectangle for the given handle, enforcing `min`.
///
/// North/west edges move the origin as `origin + (old_size - new_size)` so the opposite edge
/// stays put, including when the size is clamped at the minimum. Growth on those edges stops at
/// the viewport origin: the origin never goes negative.
pub fn resize_rect(
    start: WindowRect,
    handle: ResizeHandle,
    dx: i32,
    dy: i32,
    min: Size,
) -> WindowRect {
    let mut rect = start;

    if handle.east() {
        rect.w = (start.w + dx).max(min.width);
    } else if handle.west() {
        let right = start.x + start.w;
        rect.w = (start.w - dx).max(min.width).min(right.max(min.width));
        rect.x = (right - rect.w).max(0);
    }

    if handle.south() {
        rect.h = (start.h + dy).max(min.height);
    } else if handle.north() {
        let bottom = start.y + start.h;
        rect.h = (start.h - dy).max(min.height).min(bottom.max(min.height));
        rect.y = (bottom - rect.h).max(0);
    }

    rect
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn zones_1080p() -> [SnapZone; 3] {
        snap_zones(
            Size::new(1920, 1080),
            ChromeInsets { top: 0, bottom: 0 },
            &SnapConfig::default(),
        )
    }

    #[test]
    fn clamp_position_only_floors_at_zero() {
        assert_eq!(clamp_position(Point::new(-40, 12)), Point::new(0, 12));
        assert_eq!(clamp_position(Point::new(5000, -1)), Point::new(5000, 0));
    }

    #[test]
    fn left_band_covers_first_fifty_pixels() {
        let zones = zones_1080p();
        assert_eq!(zones[0].bounds, WindowRect::new(0, 0, 50, 1080));
        assert_eq!(
            hit_test(Point::new(25, 500), &zones).map(|z| z.id),
            Some(SnapZoneId::Left)
        );
        assert_eq!(
            hit_test(Point::new(1900, 500), &zones).map(|z| z.id),
            Some(SnapZoneId::Right)
        );
        assert_eq!(
            hit_test(Point::new(960, 10), &zones).map(|z| z.id),
            Some(SnapZoneId::Top)
        );
        assert_eq!(hit_test(Point::new(960, 500), &zones), None);
    }

    #[test]
    fn corners_resolve_to_exactly_one_zone() {
        let zones = zones_1080p();
        for point in [
            Point::new(0, 0),
            Point::new(49, 29),
            Point::new(1919, 0),
            Point::new(1870, 29),
        ] {
            let hits = zones.iter().filter(|z| z.bounds.contains(point)).count();
            assert_eq!(hits, 1, "point {point:?}");
        }
    }

    #[test]
    fn previews_fill_halves_and_usable_area() {
        let zones = snap_zones(
            Size::new(1000, 800),
            ChromeInsets { top: 20, bottom: 80 },
            &SnapConfig::default(),
        );
        assert_eq!(zones[0].preview, WindowRect::new(0, 20, 500, 700));
        assert_eq!(zones[1].preview, WindowRect::new(500, 20, 500, 700));
        assert_eq!(zones[2].preview, WindowRect::new(0, 20, 1000, 700));
    }

    #[test]
    fn tiny_viewport_produces_degenerate_but_valid_zones() {
        let zones = snap_zones(Size::new(0, 0), ChromeInsets::default(), &SnapConfig::default());
        for zone in zones {
            assert!(zone.bounds.w >= 0 && zone.bounds.h >= 0);
            assert!(zone.preview.w >= 0 && zone.preview.h >= 0);
        }
    }

    #[test]
    fn minimize_transform_scales_and_translates_between_centers() {
        let window = WindowRect::new(100, 100, 400, 300);
        let icon = WindowRect::new(280, 1000, 40, 30);
        let t = minimize_transform(window, Some(icon));
        assert_eq!(t.scale_x, 0.1);
        assert_eq!(t.scale_y, 0.1);
        assert_eq!(t.translate_x, 0.0);
        assert_eq!(t.translate_y, 765.0);
    }

    #[test]
    fn minimize_without_icon_collapses_in_place() {
        let t = minimize_transform(WindowRect::new(10, 10, 300, 200), None);
        assert_eq!(t, Transform::COLLAPSED);
    }

    #[test]
    fn zero_sized_window_never_produces_nan() {
        let t = minimize_transform(
            WindowRect::new(10, 10, 0, 200),
            Some(WindowRect::new(0, 0, 40, 40)),
        );
        assert_eq!(t, Transform::IDENTITY);
        let t = rect_transform(WindowRect::new(0, 0, 0, 0), WindowRect::new(0, 0, 10, 10));
        assert!(t.is_identity());
    }

    #[test]
    fn west_resize_below_minimum_keeps_east_edge_fixed() {
        let start = WindowRect::new(100, 100, 400, 300);
        let rect = resize_rect(start, ResizeHandle::West, 300, 0, Size::new(250, 200));
        assert_eq!(rect, WindowRect::new(250, 100, 250, 300));
        assert_eq!(rect.right(), start.right());
    }

    #[test]
    fn north_west_growth_stops_at_viewport_origin() {
        let start = WindowRect::new(100, 50, 400, 300);
        let rect = resize_rect(start, ResizeHandle::NorthWest, -300, -200, Size::new(250, 200));
        assert_eq!(rect, WindowRect::new(0, 0, 500, 350));
        assert_eq!(rect.right(), start.right());
        assert_eq!(rect.bottom(), start.bottom());
    }

    #[test]
    fn left_band_excludes_its_right_boundary() {
        let zones = zones_1080p();
        assert_eq!(hit_test(Point::new(49, 500), &zones).map(|z| z.id), Some(SnapZoneId::Left));
        assert_eq!(hit_test(Point::new(50, 500), &zones), None);
    }

    #[test]
    fn north_east_resize_moves_top_and_grows_right() {
        let start = WindowRect::new(100, 100, 400, 300);
        let rect = resize_rect(start, ResizeHandle::NorthEast, 50, -20, Size::new(250, 200));
        assert_eq!(rect, WindowRect::new(100, 80, 450, 320));
    }

    #[test]
    fn transform_css_renders_translate_then_scale() {
        let t = Transform {
            translate_x: 12.5,
            translate_y: -4.0,
            scale_x: 0.5,
            scale_y: 0.25,
        };
        assert_eq!(t.to_css(), "translate(12.5px, -4px) scale(0.5, 0.25)");
    }

    proptest! {
        #[test]
        fn zones_are_deterministic_and_disjoint(
            width in 0i32..5000,
            height in 0i32..3000,
            px in -100i32..5100,
            py in -100i32..3100,
        ) {
            let viewport = Size::new(width, height);
            let chrome = ChromeInsets { top: 28, bottom: 80 };
            let zones = snap_zones(viewport, chrome, &SnapConfig::default());
            prop_assert_eq!(zones, snap_zones(viewport, chrome, &SnapConfig::default()));

            let point = Point::new(px, py);
            let hits = zones.iter().filter(|z| z.bounds.contains(point)).count();
            prop_assert!(hits <= 1);
        }
    }
}
