//! Toroid Rocks - an asteroid field on a wrap-around plane
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, collisions, world tick)
//! - `render`: Read-only snapshots handed to the render collaborator
//! - `tuning`: Data-driven game balance
//! - `error`: Fatal error taxonomy

pub mod error;
pub mod render;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Half-width of the square play field; positions live in [-L, L]
    pub const BOUNDARY_LIMIT: f32 = 1000.0;
    /// Asteroids spawn this far inside the corners
    pub const SPAWN_CORNER_INSET: f32 = 1.0;

    /// Ship speed cap (units per tick)
    pub const MAX_VELOCITY: f32 = 5.0;
    /// Thrust acceleration along the heading (units/s²)
    pub const ACCELERATION: f32 = 3.0;
    /// Heading change per turn event (20 degrees)
    pub const TURN_RATE: f32 = 20.0 * std::f32::consts::PI / 180.0;
    /// Velocity lost to friction each tick, ship only
    pub const SHIP_DRAG: f32 = 0.005;
    /// Tiny initial drift given to a fresh ship
    pub const SHIP_SPAWN_DRIFT: f32 = 0.001;
    pub const SHIP_LIVES: u8 = 3;

    pub const BULLET_VELOCITY: f32 = 8.0;
    /// Bullets expire after wrapping this many times
    pub const BULLET_LIVES: u8 = 2;

    pub const ASTEROID_VELOCITY: f32 = 2.0;
    pub const ASTEROID_MAX_TIER: u8 = 3;
    /// Split children move this much faster than the base speed
    pub const SPLIT_SPEED_FACTOR: f32 = 1.1;
    /// Candidate heading offsets for split children (degrees)
    pub const SPLIT_OFFSETS_DEG: [f32; 3] = [25.0, 45.0, 65.0];

    /// Milliseconds between asteroid spawns
    pub const SPAWN_INTERVAL_MS: u64 = 5000;
    pub const SCORE_PER_HIT: u32 = 10;

    /// Input ring buffer capacity
    pub const INPUT_QUEUE_CAPACITY: usize = 100;
    /// Maximum input events consumed per tick
    pub const EVENTS_PER_TICK: usize = 10;

    /// Collision radii
    pub const SHIP_RADIUS: f32 = 0.015 * BOUNDARY_LIMIT;
    pub const BULLET_RADIUS: f32 = 0.005 * BOUNDARY_LIMIT;
    pub const ASTEROID_RADIUS_LARGE: f32 = 0.15 * BOUNDARY_LIMIT * 0.7;
    pub const ASTEROID_RADIUS_MEDIUM: f32 = 0.075 * BOUNDARY_LIMIT * 0.8;
    pub const ASTEROID_RADIUS_SMALL: f32 = 0.0375 * BOUNDARY_LIMIT * 0.8;
    /// Radius for an asteroid whose tier is out of range
    pub const FALLBACK_RADIUS: f32 = 0.05 * BOUNDARY_LIMIT;
}

/// Unit vector for a heading in radians
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Wrap a coordinate once across a symmetric boundary.
///
/// Returns the new coordinate and whether it crossed the edge. A single
/// correction is applied, matching per-tick motion that never exceeds the
/// field width.
#[inline]
pub fn wrap_coordinate(value: f32, limit: f32) -> (f32, bool) {
    if value > limit {
        (value - 2.0 * limit, true)
    } else if value < -limit {
        (value + 2.0 * limit, true)
    } else {
        (value, false)
    }
}
