//! Game settings
//!
//! Read from LocalStorage as JSON on the web; defaults elsewhere.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque `u_fill` value
    pub fn to_fill(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Perimeter segments per blob fan
    pub fan_segments: u32,

    // === Local player ===
    pub player_name: String,
    pub player_color: Rgb,
    /// Spawn point in device pixels
    pub spawn_position: (f64, f64),
    pub start_size: f64,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fan_segments: DEFAULT_FAN_SEGMENTS,

            player_name: "Matt".to_string(),
            player_color: Rgb::new(0, 128, 0),
            spawn_position: START_POSITION,
            start_size: START_SIZE,

            show_fps: true,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str::<Self>(json)?.sanitized())
    }

    /// Clamp out-of-range values into something playable
    pub fn sanitized(mut self) -> Self {
        let segments = self.fan_segments.clamp(MIN_FAN_SEGMENTS, MAX_FAN_SEGMENTS);
        if segments != self.fan_segments {
            log::warn!("fan_segments {} out of range, using {}", self.fan_segments, segments);
            self.fan_segments = segments;
        }
        if !(self.start_size.is_finite() && self.start_size > 0.0) {
            log::warn!("start_size {} must be positive, using {}", self.start_size, START_SIZE);
            self.start_size = START_SIZE;
        }
        let (x, y) = self.spawn_position;
        if !(x.is_finite() && y.is_finite()) {
            self.spawn_position = START_POSITION;
        }
        self
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "blob_arena_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{"player_name": "Ada", "fan_segments": 18}"#).unwrap();
        assert_eq!(s.player_name, "Ada");
        assert_eq!(s.fan_segments, 18);
        assert_eq!(s.start_size, START_SIZE);
        assert_eq!(s.player_color, Rgb::new(0, 128, 0));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let s = Settings::from_json(r#"{"fan_segments": 1, "start_size": -4.0}"#).unwrap();
        assert_eq!(s.fan_segments, MIN_FAN_SEGMENTS);
        assert_eq!(s.start_size, START_SIZE);

        let s = Settings::from_json(r#"{"fan_segments": 4096}"#).unwrap();
        assert_eq!(s.fan_segments, MAX_FAN_SEGMENTS);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_fill_color() {
        assert_eq!(Rgb::new(255, 0, 0).to_fill(), [1.0, 0.0, 0.0, 1.0]);
    }
}
