//! Simulation: the single world instance driven by the frame loop

use super::blob::PlayerId;
use super::clock::{ClockState, FixedTimestep};
use super::player::Player;
use super::vector::Vector2;
use crate::consts::{MAX_FAN_SEGMENTS, MIN_FAN_SEGMENTS};
use crate::renderer::MeshSink;
use crate::settings::{Rgb, Settings};

/// Outcome of one display frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Fixed updates run this frame
    pub steps: u32,
    /// Blobs submitted for drawing
    pub draws: usize,
}

/// Owns the players, the pointer target and the fixed-step clock
#[derive(Debug, Clone)]
pub struct Simulation {
    players: Vec<Player>,
    /// Last pointer position written by input (last writer wins)
    pointer: Vector2,
    /// One-shot split request, consumed by the next update
    split_requested: bool,
    clock: FixedTimestep,
    fan_segments: u32,
    time_ticks: u64,
    next_id: u32,
}

impl Simulation {
    /// Empty world with no players
    ///
    /// `fan_segments` is clamped to the range the renderer's index buffer covers.
    pub fn new(fan_segments: u32) -> Self {
        let fan_segments = fan_segments.clamp(MIN_FAN_SEGMENTS, MAX_FAN_SEGMENTS);
        Self {
            players: Vec::new(),
            pointer: Vector2::ZERO,
            split_requested: false,
            clock: FixedTimestep::default(),
            fan_segments,
            time_ticks: 0,
            next_id: 0,
        }
    }

    /// World seeded with the local player described by `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        let mut sim = Self::new(settings.fan_segments);
        let (x, y) = settings.spawn_position;
        let spawn = Vector2::new(x, y);
        sim.spawn_player(
            settings.player_name.clone(),
            settings.player_color,
            spawn,
            settings.start_size,
        );
        // Seek the spawn point until the pointer first moves
        sim.pointer = spawn;
        sim
    }

    pub fn spawn_player(&mut self, name: String, color: Rgb, position: Vector2, size: f64) -> PlayerId {
        let id = PlayerId(self.next_id);
        self.next_id += 1;
        log::info!("Spawned player {} ({:?}) at ({:.0}, {:.0})", name, id, position.x, position.y);
        self.players.push(Player::new(id, name, color, position, size));
        id
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn pointer(&self) -> Vector2 {
        self.pointer
    }

    pub fn set_pointer(&mut self, pointer: Vector2) {
        self.pointer = pointer;
    }

    pub fn request_split(&mut self) {
        self.split_requested = true;
    }

    pub fn clock_state(&self) -> ClockState {
        self.clock.state()
    }

    /// Record the starting wall-clock time
    pub fn start(&mut self, now_ms: f64) {
        self.clock.start(now_ms);
    }

    /// One fixed update of `dt` milliseconds
    pub fn step(&mut self, dt: f64) {
        if std::mem::take(&mut self.split_requested) {
            for player in &mut self.players {
                let split = player.split();
                log::info!("{} split {} blob(s), now {}", player.name, split, player.blobs().len());
            }
        }

        let target = self.pointer;
        for player in &mut self.players {
            player.update(dt, target);
        }
        self.time_ticks += 1;
    }

    /// Draw every player in order
    pub fn draw(&self, sink: &mut impl MeshSink) -> usize {
        let mut draws = 0;
        for player in &self.players {
            player.draw(sink, self.fan_segments);
            draws += player.blobs().len();
        }
        draws
    }

    /// Run the fixed updates owed at `now_ms`, then draw once
    pub fn frame(&mut self, now_ms: f64, sink: &mut impl MeshSink) -> FrameReport {
        let steps = self.clock.advance(now_ms);
        let dt = self.clock.step_ms();
        for _ in 0..steps {
            self.step(dt);
        }
        let draws = self.draw(sink);
        FrameReport { steps, draws }
    }
}
