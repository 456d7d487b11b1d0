//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Stable iteration order (players and blobs in insertion order)
//! - No GPU or platform dependencies

pub mod blob;
pub mod clock;
pub mod player;
pub mod vector;
pub mod world;

pub use blob::{Blob, PlayerId};
pub use clock::{ClockState, FixedTimestep};
pub use player::Player;
pub use vector::Vector2;
pub use world::{FrameReport, Simulation};
