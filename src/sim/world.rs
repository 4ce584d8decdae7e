//! World state: entity ownership, lifecycle and collaborator hooks
//!
//! The world owns every entity. Creation goes through [`World::spawn`] and
//! destruction through [`World::remove`], which always hands the geometry
//! handle back to the [`GeometrySource`] before dropping the entity.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::{EntityArena, EntityId};
use super::entity::{Entity, EntityKind, GeometryHandle};
use crate::consts::ASTEROID_MAX_TIER;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Render-side owner of per-entity geometry
pub trait GeometrySource: std::fmt::Debug {
    /// Handle for a new entity, or `None` if the asset is unavailable
    fn acquire(&mut self, kind: EntityKind, tier: Option<u8>) -> Option<GeometryHandle>;
    /// Give a handle back when its entity is destroyed
    fn release(&mut self, handle: GeometryHandle);
}

/// One shared handle per (kind, tier), with a live count
#[derive(Debug, Default)]
pub struct StaticGeometry {
    live: HashMap<GeometryHandle, usize>,
}

impl StaticGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle used for a kind/tier
    pub fn handle_for(kind: EntityKind, tier: Option<u8>) -> GeometryHandle {
        match (kind, tier) {
            (EntityKind::Ship, _) => GeometryHandle(0),
            (EntityKind::Bullet, _) => GeometryHandle(1),
            (EntityKind::Asteroid, tier) => GeometryHandle(1 + u32::from(tier.unwrap_or(1))),
        }
    }

    /// Handles currently held by live entities
    pub fn live_handles(&self) -> usize {
        self.live.values().sum()
    }
}

impl GeometrySource for StaticGeometry {
    fn acquire(&mut self, kind: EntityKind, tier: Option<u8>) -> Option<GeometryHandle> {
        let handle = Self::handle_for(kind, tier);
        *self.live.entry(handle).or_default() += 1;
        Some(handle)
    }

    fn release(&mut self, handle: GeometryHandle) {
        if let Some(count) = self.live.get_mut(&handle) {
            *count = count.saturating_sub(1);
        }
    }
}

/// Receives the score and remaining lives once per tick
pub trait Hud {
    fn publish(&mut self, score: u32, lives: u8);
}

/// Hud that just remembers what it was shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudState {
    pub score: u32,
    pub lives: u8,
    pub updates: u64,
}

impl Hud for HudState {
    fn publish(&mut self, score: u32, lives: u8) {
        self.score = score;
        self.lives = lives;
        self.updates += 1;
    }
}

// Asteroid weight tables. Destruction and removal use different tables and
// do not cancel out; nothing in the simulation reads the counter.
const WEIGHT_LARGE: i32 = 4;
const WEIGHT_MEDIUM: i32 = 2;
const WEIGHT_SMALL: i32 = 1;

/// Weight added when a bullet destroys an asteroid of `tier`
pub fn weight_on_destroy(tier: u8) -> i32 {
    match tier {
        3 => 2 * WEIGHT_MEDIUM,
        2 => 2 * WEIGHT_LARGE,
        _ => 0,
    }
}

/// Weight subtracted when an asteroid with `health` leaves the world
pub fn weight_on_remove(health: u8) -> i32 {
    match health {
        3 => WEIGHT_LARGE,
        2 => WEIGHT_MEDIUM,
        1 => WEIGHT_SMALL,
        _ => 0,
    }
}

/// The simulation world
#[derive(Debug)]
pub struct World {
    pub(super) tuning: Tuning,
    pub(super) entities: EntityArena,
    /// The player; always present except mid-restart
    pub(super) ship: EntityId,
    pub(super) score: u32,
    pub(super) last_spawn_ms: u64,
    pub(super) entity_weight: i32,
    pub(super) rng: Pcg32,
    pub(super) geometry: Box<dyn GeometrySource>,
    pub(super) time_ticks: u64,
}

impl World {
    /// Default tuning and geometry, RNG seeded from `seed`
    pub fn new(seed: u64, now_ms: u64) -> Result<Self, SimError> {
        Self::with_parts(
            Tuning::default(),
            Pcg32::seed_from_u64(seed),
            Box::new(StaticGeometry::new()),
            now_ms,
        )
    }

    /// Build a world from injected tuning, RNG and geometry source
    pub fn with_parts(
        tuning: Tuning,
        rng: Pcg32,
        mut geometry: Box<dyn GeometrySource>,
        now_ms: u64,
    ) -> Result<Self, SimError> {
        tuning.validate()?;

        let mut entities = EntityArena::new();
        let ship = Entity::ship(&tuning, now_ms);
        let ship = insert_with_geometry(&mut entities, geometry.as_mut(), ship)?;

        log::info!("World created ({} entity)", entities.len());
        Ok(Self {
            tuning,
            entities,
            ship,
            score: 0,
            last_spawn_ms: now_ms,
            entity_weight: 0,
            rng,
            geometry,
            time_ticks: 0,
        })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Advisory asteroid-weight counter
    pub fn entity_weight(&self) -> i32 {
        self.entity_weight
    }

    /// Ticks run since creation (not reset on restart)
    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn ship_id(&self) -> EntityId {
        self.ship
    }

    pub fn ship(&self) -> Result<&Entity, SimError> {
        self.entities.get(self.ship).ok_or(SimError::MissingShip)
    }

    pub(crate) fn ship_mut(&mut self) -> Result<&mut Entity, SimError> {
        self.entities.get_mut(self.ship).ok_or(SimError::MissingShip)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Live entities in storage order, read-only
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of live entities of one kind
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|(_, e)| e.kind == kind).count()
    }

    /// Add an entity, attaching geometry if the source has any
    pub fn spawn(&mut self, entity: Entity) -> Result<EntityId, SimError> {
        insert_with_geometry(&mut self.entities, self.geometry.as_mut(), entity)
    }

    /// The single removal path: weight bookkeeping, release geometry, drop
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        if entity.kind == EntityKind::Asteroid {
            self.entity_weight -= weight_on_remove(entity.health);
        }
        if let Some(handle) = entity.geometry {
            self.geometry.release(handle);
        }
        Some(entity)
    }

    /// Remove every dead entity except the ship. Returns how many went.
    ///
    /// A dead ship stays until the restart at the start of the next tick.
    pub fn prune(&mut self) -> usize {
        let dead: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(id, e)| *id != self.ship && !e.is_alive())
            .map(|(id, _)| id)
            .collect();
        for &id in &dead {
            self.remove(id);
        }
        dead.len()
    }

    /// Discard everything and start over with a fresh ship
    pub fn restart(&mut self, now_ms: u64) -> Result<(), SimError> {
        for id in self.entities.ids() {
            self.remove(id);
        }
        self.score = 0;
        self.last_spawn_ms = now_ms;
        self.entity_weight = 0;

        let ship = Entity::ship(&self.tuning, now_ms);
        self.ship = self.spawn(ship)?;
        log::info!("The world has been restarted");
        Ok(())
    }

    /// Fire a bullet if the ship asked for one. Returns whether it did.
    pub fn fire(&mut self, now_ms: u64) -> Result<bool, SimError> {
        let ship = self
            .entities
            .get_mut(self.ship)
            .ok_or(SimError::MissingShip)?;
        if !ship.fire_requested {
            return Ok(false);
        }
        ship.fire_requested = false;
        let bullet = Entity::bullet(ship, &self.tuning, now_ms);
        self.spawn(bullet)?;
        Ok(true)
    }

    /// New large asteroid at a random corner with a random heading
    pub fn spawn_asteroid(&mut self, now_ms: u64) -> Result<EntityId, SimError> {
        let corner = self.tuning.spawn_corner();
        let x = if self.rng.random_bool(0.5) { corner } else { -corner };
        let y = if self.rng.random_bool(0.5) { corner } else { -corner };
        let angle = self.rng.random::<f32>() * TAU;
        let speed = self.tuning.asteroid_speed(ASTEROID_MAX_TIER);

        let asteroid = Entity::asteroid(ASTEROID_MAX_TIER, Vec2::new(x, y), angle, speed, now_ms);
        let id = self.spawn(asteroid)?;
        self.last_spawn_ms = now_ms;
        log::debug!(
            "Spawned asteroid at ({}, {}) heading {:.2} rad",
            x,
            y,
            angle
        );
        Ok(id)
    }
}

fn insert_with_geometry(
    entities: &mut EntityArena,
    geometry: &mut dyn GeometrySource,
    mut entity: Entity,
) -> Result<EntityId, SimError> {
    entity.geometry = geometry.acquire(entity.kind, entity.tier());
    if entity.geometry.is_none() {
        log::warn!(
            "No geometry for new {}; it will simulate but not render",
            entity.kind.as_str()
        );
    }
    entities.insert(entity)
}
