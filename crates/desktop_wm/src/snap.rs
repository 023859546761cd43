//! Snap-zone tracking during an active window drag.
//!
//! The detector hit-tests live pointer positions against the screen-edge bands from
//! [`crate::geometry::snap_zones`]. Entering a band starts an arm delay; only an armed zone
//! exposes its preview rectangle, so a pointer skimming past an edge never flashes the overlay.
//! The drop itself ([`SnapZoneDetector::handle_drag_end`]) hit-tests the release position and
//! ignores arming.

use crate::config::SnapConfig;
use crate::geometry::{hit_test, snap_zones, ChromeInsets, SnapZone, SnapZoneId};
use crate::model::{Point, Size, WindowRect};

/// Notification delivered to zone listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapEvent {
    /// The pointer moved into a different zone, or out of every zone.
    ZoneChanged {
        from: Option<SnapZoneId>,
        to: Option<SnapZoneId>,
    },
    /// The arm delay for the current zone elapsed; its preview is now visible.
    Armed(SnapZoneId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&SnapEvent)>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveZone {
    zone: SnapZone,
    entered_at_ms: f64,
    armed: bool,
}

pub struct SnapZoneDetector {
    config: SnapConfig,
    chrome: ChromeInsets,
    zones: [SnapZone; 3],
    active: Option<ActiveZone>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl std::fmt::Debug for SnapZoneDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapZoneDetector")
            .field("config", &self.config)
            .field("zones", &self.zones)
            .field("active", &self.active)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SnapZoneDetector {
    pub fn new(config: SnapConfig, chrome: ChromeInsets, viewport: Size) -> Self {
        let zones = snap_zones(viewport, chrome, &config);
        Self {
            config,
            chrome,
            zones,
            active: None,
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }

    /// Recomputes the zones for a new viewport; an in-flight zone is dropped.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.zones = snap_zones(viewport, self.chrome, &self.config);
        self.set_active(None, 0.0);
    }

    pub fn get_snap_zones(&self) -> [SnapZone; 3] {
        self.zones
    }

    pub fn arm_delay_ms(&self) -> u64 {
        self.config.arm_delay_ms
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&SnapEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Zone under the pointer as of the last update, armed or not.
    pub fn active_zone(&self) -> Option<SnapZoneId> {
        self.active.map(|active| active.zone.id)
    }

    pub fn is_armed(&self) -> bool {
        self.active.map(|active| active.armed).unwrap_or(false)
    }

    /// Preview rectangle for the overlay, once the active zone is armed at `now_ms`.
    pub fn preview(&mut self, now_ms: f64) -> Option<WindowRect> {
        self.poll(now_ms);
        self.active
            .filter(|active| active.armed)
            .map(|active| active.zone.preview)
    }

    /// Feeds a live pointer position.
    ///
    /// Returns the zone change if there was one, otherwise [`SnapEvent::Armed`] when this move
    /// is what armed the current zone.
    pub fn update(&mut self, pointer: Point, now_ms: f64) -> Option<SnapEvent> {
        let hit = hit_test(pointer, &self.zones).copied();
        let event = self.set_active(hit, now_ms);
        let armed = self.poll(now_ms);
        match event {
            None if armed => self.active_zone().map(SnapEvent::Armed),
            event => event,
        }
    }

    /// Arms the active zone once its delay has elapsed. Returns `true` on the arming transition.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let delay = self.config.arm_delay_ms as f64;
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.armed || now_ms - active.entered_at_ms < delay {
            return false;
        }
        active.armed = true;
        let zone = active.zone.id;
        self.notify(&SnapEvent::Armed(zone));
        true
    }

    /// Resolves the drop target at the release position and resets tracking.
    ///
    /// Does not mutate any window.
    pub fn handle_drag_end(&mut self, x: i32, y: i32) -> Option<SnapZone> {
        let zone = hit_test(Point::new(x, y), &self.zones).copied();
        self.set_active(None, 0.0);
        zone
    }

    /// Drops tracking without resolving a zone.
    pub fn reset(&mut self) {
        self.set_active(None, 0.0);
    }

    fn set_active(&mut self, zone: Option<SnapZone>, now_ms: f64) -> Option<SnapEvent> {
        let from = self.active_zone();
        let to = zone.map(|z| z.id);
        if from == to {
            return None;
        }
        self.active = zone.map(|zone| ActiveZone {
            zone,
            entered_at_ms: now_ms,
            armed: false,
        });
        let event = SnapEvent::ZoneChanged { from, to };
        self.notify(&event);
        Some(event)
    }

    fn notify(&mut self, event: &SnapEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}
