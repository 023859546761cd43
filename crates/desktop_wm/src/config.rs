//! Window-manager tunables: minimum sizes, chrome reservations, snap bands and the default
//! windows created when a workspace is first shown.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Size, WindowKind, WindowRect, WindowSpec};

pub const DEFAULT_MIN_WINDOW_WIDTH: i32 = 250;
pub const DEFAULT_MIN_WINDOW_HEIGHT: i32 = 200;
pub const DEFAULT_SNAP_EDGE_WIDTH: i32 = 50;
pub const DEFAULT_SNAP_TOP_HEIGHT: i32 = 30;
pub const DEFAULT_SNAP_ARM_DELAY_MS: u64 = 100;

#[derive(Debug, Error)]
/// Errors raised while loading a [`WindowManagerConfig`].
pub enum ConfigError {
    /// The TOML document could not be parsed into the config schema.
    #[error("invalid window manager config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field parsed but holds an unusable value.
    #[error("invalid window manager config field `{field}`: {reason}")]
    Invalid {
        /// Dotted field path.
        field: String,
        /// Human-readable reason.
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Width of the left/right activation bands.
    pub edge_width: i32,
    /// Height of the top activation band.
    pub top_height: i32,
    /// Debounce before an entered zone shows its preview.
    pub arm_delay_ms: u64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            edge_width: DEFAULT_SNAP_EDGE_WIDTH,
            top_height: DEFAULT_SNAP_TOP_HEIGHT,
            arm_delay_ms: DEFAULT_SNAP_ARM_DELAY_MS,
        }
    }
}

/// A window created automatically the first time a workspace becomes active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowTemplate {
    pub kind: WindowKind,
    pub title: String,
    #[serde(default)]
    pub rect: Option<WindowRect>,
}

impl WindowTemplate {
    pub fn to_spec(&self) -> WindowSpec {
        let mut spec = WindowSpec::new(self.kind.as_str()).with_title(self.title.clone());
        spec.rect = self.rect;
        spec
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowManagerConfig {
    pub min_window_size: Size,
    pub min_size_overrides: BTreeMap<WindowKind, Size>,
    pub default_window_size: Size,
    /// Offset between successive auto-placed windows.
    pub cascade_step: i32,
    pub title_bar_height: i32,
    /// Chrome reserved above the usable workspace area (menu bar).
    pub reserved_top: i32,
    /// Chrome reserved below the usable workspace area (dock).
    pub reserved_bottom: i32,
    pub snap: SnapConfig,
    pub default_windows: Vec<WindowTemplate>,
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            min_window_size: Size::new(DEFAULT_MIN_WINDOW_WIDTH, DEFAULT_MIN_WINDOW_HEIGHT),
            min_size_overrides: BTreeMap::new(),
            default_window_size: Size::new(640, 420),
            cascade_step: 24,
            title_bar_height: 32,
            reserved_top: 28,
            reserved_bottom: 80,
            snap: SnapConfig::default(),
            default_windows: vec![
                WindowTemplate {
                    kind: WindowKind::from("editor"),
                    title: "Editor".to_string(),
                    rect: Some(WindowRect::new(40, 60, 900, 620)),
                },
                WindowTemplate {
                    kind: WindowKind::from("terminal"),
                    title: "Terminal".to_string(),
                    rect: Some(WindowRect::new(960, 60, 640, 400)),
                },
                WindowTemplate {
                    kind: WindowKind::from("assistant"),
                    title: "Assistant".to_string(),
                    rect: Some(WindowRect::new(960, 480, 640, 360)),
                },
            ],
        }
    }
}

impl WindowManagerConfig {
    /// Parses and validates a TOML document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and [`ConfigError::Invalid`] when a value
    /// fails validation.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every size and band is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive_size("min_window_size", self.min_window_size)?;
        for (kind, size) in &self.min_size_overrides {
            ensure_positive_size(&format!("min_size_overrides.{}", kind.as_str()), *size)?;
        }
        if self.default_window_size.width < self.min_window_size.width
            || self.default_window_size.height < self.min_window_size.height
        {
            return Err(ConfigError::Invalid {
                field: "default_window_size".to_string(),
                reason: "must not be smaller than min_window_size",
            });
        }
        if self.snap.edge_width <= 0 {
            return Err(ConfigError::Invalid {
                field: "snap.edge_width".to_string(),
                reason: "must be positive",
            });
        }
        if self.snap.top_height <= 0 {
            return Err(ConfigError::Invalid {
                field: "snap.top_height".to_string(),
                reason: "must be positive",
            });
        }
        if self.title_bar_height < 0 || self.reserved_top < 0 || self.reserved_bottom < 0 {
            return Err(ConfigError::Invalid {
                field: "chrome".to_string(),
                reason: "title bar and reserved chrome must not be negative",
            });
        }
        Ok(())
    }

    /// Minimum size for a window of `kind`, falling back to the global minimum.
    pub fn min_size_for(&self, kind: &WindowKind) -> Size {
        self.min_size_overrides
            .get(kind)
            .copied()
            .unwrap_or(self.min_window_size)
    }
}

fn ensure_positive_size(field: &str, size: Size) -> Result<(), ConfigError> {
    if size.width <= 0 || size.height <= 0 {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: "width and height must be positive",
        });
    }
    Ok(())
}
