//! Per-tick simulation pipeline
//!
//! Order: drain input, restart if the ship is dead, publish the HUD, fire,
//! integrate and prune, spawn, collide and prune.

use super::collision;
use super::controls::apply_input;
use super::input::InputQueue;
use super::physics::integrate;
use super::world::{Hud, World};
use crate::error::SimError;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub events_consumed: usize,
    pub restarted: bool,
    pub fired: bool,
    pub spawned_asteroid: bool,
    pub asteroids_destroyed: u32,
    pub split_children: usize,
    pub ship_hits: u32,
    /// Entities removed by both prune passes
    pub pruned: usize,
}

/// Advance the world to `now_ms`
pub fn tick(
    world: &mut World,
    input: &mut InputQueue,
    hud: &mut dyn Hud,
    now_ms: u64,
) -> Result<TickReport, SimError> {
    let mut report = TickReport::default();

    // Input goes to whichever ship is current, even a dead one
    {
        let ship = world
            .entities
            .get_mut(world.ship)
            .ok_or(SimError::MissingShip)?;
        report.events_consumed = apply_input(input, ship, &world.tuning);
    }

    if !world.ship()?.is_alive() {
        world.restart(now_ms)?;
        report.restarted = true;
    }

    hud.publish(world.score, world.ship()?.health);

    report.fired = world.fire(now_ms)?;

    let ship_id = world.ship;
    let ship_drag = world.tuning.ship_drag;
    for (id, entity) in world.entities.iter_mut() {
        let drag = if id == ship_id { ship_drag } else { 0.0 };
        integrate(entity, drag, now_ms, &world.tuning);
    }
    report.pruned += world.prune();

    if now_ms.saturating_sub(world.last_spawn_ms) > world.tuning.spawn_interval_ms {
        world.spawn_asteroid(now_ms)?;
        report.spawned_asteroid = true;
    }

    let outcome = collision::scan(&mut world.entities, &mut world.rng, &world.tuning, now_ms);
    world.score = world.score.saturating_add(outcome.score);
    world.entity_weight += outcome.weight;
    report.asteroids_destroyed = outcome.asteroids_destroyed;
    report.ship_hits = outcome.ship_hits;
    report.split_children = outcome.spawned.len();
    for child in outcome.spawned {
        world.spawn(child)?;
    }
    report.pruned += world.prune();

    world.time_ticks += 1;
    Ok(report)
}
