//! Entity data and kind-specific factories

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::heading;
use crate::tuning::Tuning;

/// What an entity is; drives physics and collision rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Bullet,
    Asteroid,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Ship => "ship",
            EntityKind::Bullet => "bullet",
            EntityKind::Asteroid => "asteroid",
        }
    }
}

/// Opaque geometry/texture handle owned by the render side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeometryHandle(pub u32);

/// A physics body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    /// Force accumulator, cleared after every integration
    pub accel: Vec2,
    /// Heading in radians
    pub angle: f32,
    /// Lives; for asteroids this is also the size tier (3 = large)
    pub health: u8,
    /// Timestamp of the last integration (ms)
    pub last_update_ms: u64,
    /// Ship only: fire key was pressed since the last bullet
    pub fire_requested: bool,
    /// `None` when no asset was available; the entity still simulates
    #[serde(skip)]
    pub geometry: Option<GeometryHandle>,
}

impl Entity {
    /// A fresh player ship at the origin
    pub fn ship(tuning: &Tuning, now_ms: u64) -> Self {
        Self {
            kind: EntityKind::Ship,
            pos: Vec2::ZERO,
            vel: Vec2::splat(tuning.ship_spawn_drift),
            accel: Vec2::ZERO,
            angle: 0.0,
            health: tuning.ship_lives,
            last_update_ms: now_ms,
            fire_requested: false,
            geometry: None,
        }
    }

    /// A bullet leaving `shooter` along its heading
    pub fn bullet(shooter: &Entity, tuning: &Tuning, now_ms: u64) -> Self {
        Self {
            kind: EntityKind::Bullet,
            pos: shooter.pos,
            vel: heading(shooter.angle) * tuning.bullet_velocity,
            accel: Vec2::ZERO,
            angle: shooter.angle,
            health: tuning.bullet_lives,
            last_update_ms: now_ms,
            fire_requested: false,
            geometry: None,
        }
    }

    /// An asteroid of `tier` moving along `angle` at `speed`
    pub fn asteroid(tier: u8, pos: Vec2, angle: f32, speed: f32, now_ms: u64) -> Self {
        Self {
            kind: EntityKind::Asteroid,
            pos,
            vel: heading(angle) * speed,
            accel: Vec2::ZERO,
            angle,
            health: tier,
            last_update_ms: now_ms,
            fire_requested: false,
            geometry: None,
        }
    }

    /// The two children of a split asteroid, headings `angle ± offset`.
    ///
    /// Returns `None` for a tier-1 (or already dead) parent.
    pub fn split_children(
        &self,
        offset: f32,
        tuning: &Tuning,
        now_ms: u64,
    ) -> Option<[Entity; 2]> {
        let tier = self.tier()?;
        if tier <= 1 {
            return None;
        }
        let child_tier = tier - 1;
        let speed = tuning.asteroid_speed(child_tier) * tuning.split_speed_factor;
        Some([
            Entity::asteroid(child_tier, self.pos, self.angle + offset, speed, now_ms),
            Entity::asteroid(child_tier, self.pos, self.angle - offset, speed, now_ms),
        ])
    }

    /// Size tier for asteroids
    pub fn tier(&self) -> Option<u8> {
        match self.kind {
            EntityKind::Asteroid => Some(self.health),
            _ => None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Remove one life, never going below zero
    pub fn lose_life(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    pub fn kill(&mut self) {
        self.health = 0;
    }

    /// Thrust along the current heading
    pub fn thrust(&mut self, acceleration: f32) {
        self.accel += heading(self.angle) * acceleration;
    }

    /// Snap back to the origin at rest (ship hit by an asteroid)
    pub fn reset_motion(&mut self) {
        self.pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
        self.angle = 0.0;
    }
}
