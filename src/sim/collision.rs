//! Circle overlap tests and the pairwise collision pass
//!
//! Every unordered pair of live entities is tested once, in arena order.
//! Outcomes are applied immediately, so a ship reset or a destroyed asteroid
//! is visible to the pairs tested after it. Split children are returned to
//! the caller and inserted after the pass.

use rand::Rng;

use super::arena::EntityArena;
use super::entity::{Entity, EntityKind};
use super::world::weight_on_destroy;
use crate::tuning::Tuning;

/// Pair types that have a collision rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Destroys both, scores, may split the asteroid
    BulletAsteroid,
    /// Costs the ship a life and sends it back to the origin
    ShipAsteroid,
}

impl Contact {
    /// Rule for a pair of kinds, independent of order
    pub fn classify(a: EntityKind, b: EntityKind) -> Option<Contact> {
        use EntityKind::*;
        match (a, b) {
            (Bullet, Asteroid) | (Asteroid, Bullet) => Some(Contact::BulletAsteroid),
            (Ship, Asteroid) | (Asteroid, Ship) => Some(Contact::ShipAsteroid),
            _ => None,
        }
    }
}

/// Collision radius by kind and, for asteroids, tier
pub fn bounding_radius(entity: &Entity, tuning: &Tuning) -> f32 {
    match entity.kind {
        EntityKind::Ship => tuning.ship_radius,
        EntityKind::Bullet => tuning.bullet_radius,
        EntityKind::Asteroid => tuning.asteroid_radius(entity.health),
    }
}

/// Circle overlap on squared distances (touching counts)
pub fn collides(a: &Entity, b: &Entity, tuning: &Tuning) -> bool {
    let reach = bounding_radius(a, tuning) + bounding_radius(b, tuning);
    a.pos.distance_squared(b.pos) <= reach * reach
}

/// Everything the pass produced besides in-place mutations
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub score: u32,
    /// Advisory asteroid-weight bookkeeping
    pub weight: i32,
    /// Split children waiting to be inserted
    pub spawned: Vec<Entity>,
    pub asteroids_destroyed: u32,
    pub ship_hits: u32,
}

/// Run the pairwise pass over every live entity
pub fn scan<R: Rng + ?Sized>(
    arena: &mut EntityArena,
    rng: &mut R,
    tuning: &Tuning,
    now_ms: u64,
) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    let ids = arena.ids();

    for (i, &a_id) in ids.iter().enumerate() {
        for &b_id in &ids[i + 1..] {
            let Some((a, b)) = arena.pair_mut(a_id, b_id) else {
                continue;
            };
            // A destroyed entity takes no further part in this pass
            if !a.is_alive() {
                break;
            }
            if !b.is_alive() {
                continue;
            }
            let Some(contact) = Contact::classify(a.kind, b.kind) else {
                continue;
            };
            if !collides(a, b, tuning) {
                continue;
            }

            match contact {
                Contact::BulletAsteroid => {
                    let (bullet, asteroid) = if a.kind == EntityKind::Bullet {
                        (a, b)
                    } else {
                        (b, a)
                    };
                    bullet_hits_asteroid(bullet, asteroid, rng, tuning, now_ms, &mut outcome);
                }
                Contact::ShipAsteroid => {
                    let ship = if a.kind == EntityKind::Ship { a } else { b };
                    ship.lose_life();
                    ship.reset_motion();
                    outcome.ship_hits += 1;
                    log::debug!("Ship hit by asteroid, {} lives left", ship.health);
                }
            }
        }
    }

    outcome
}

fn bullet_hits_asteroid<R: Rng + ?Sized>(
    bullet: &mut Entity,
    asteroid: &mut Entity,
    rng: &mut R,
    tuning: &Tuning,
    now_ms: u64,
    outcome: &mut ScanOutcome,
) {
    let tier = asteroid.health;
    outcome.score = outcome.score.saturating_add(tuning.score_per_hit);
    outcome.weight += weight_on_destroy(tier);
    outcome.asteroids_destroyed += 1;

    let offset = pick_split_offset(rng, tuning);
    if let Some(children) = asteroid.split_children(offset, tuning, now_ms) {
        log::debug!(
            "Asteroid tier {} split at ({:.1}, {:.1}), offset {:.2} rad",
            tier,
            asteroid.pos.x,
            asteroid.pos.y,
            offset
        );
        outcome.spawned.extend(children);
    }

    bullet.kill();
    asteroid.kill();
}

/// One of the configured split offsets, in radians
fn pick_split_offset<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> f32 {
    let offsets = &tuning.split_offsets_deg;
    let degrees = match offsets.len() {
        0 => 0.0,
        n => offsets[rng.random_range(0..n)],
    };
    degrees.to_radians()
}
