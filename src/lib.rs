//! Blob Arena - a cell-growth arena client
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (vectors, blobs, players, game loop)
//! - `renderer`: Triangle-fan meshes and the WebGPU draw pipeline
//! - `platform`: Browser/native helpers (FPS meter, pointer scaling)
//! - `settings`: Runtime configuration

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{RenderError, SettingsError, SimError};
pub use settings::{Rgb, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const TIMESTEP_MS: f64 = 1000.0 / 60.0;
    /// Largest frame delta fed to the accumulator; longer stalls are dropped
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;
    /// Slack when comparing the accumulator against a whole timestep
    pub const ACCUMULATOR_EPSILON_MS: f64 = 0.005;

    /// Scales a blob's abstract size into the area its radius is derived from
    pub const AREA_MULTIPLIER: f64 = 50.0;
    /// Fraction of the seek displacement applied to velocity per second of dt
    pub const SEEK_GAIN: f64 = 0.5;
    /// Velocity magnitude cap (units per millisecond)
    pub const MAX_SPEED: f64 = 30.0;
    /// Blobs smaller than this refuse to split (children would drop below 1.0)
    pub const MIN_SPLIT_SIZE: f64 = 2.0;

    /// Perimeter segments per blob fan
    pub const DEFAULT_FAN_SEGMENTS: u32 = 26;
    pub const MIN_FAN_SEGMENTS: u32 = 3;
    pub const MAX_FAN_SEGMENTS: u32 = 64;

    /// Initial player defaults
    pub const START_SIZE: f64 = 500.0;
    pub const START_POSITION: (f64, f64) = (500.0, 500.0);
}

/// Radius of a circle with the given area
#[inline]
pub fn circle_area_to_radius(area: f64) -> f64 {
    (area / std::f64::consts::PI).sqrt()
}
