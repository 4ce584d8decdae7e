//! Per-entity kinematics for one tick
//!
//! Velocity is integrated against wall-clock `dt`, but position advances by
//! the raw per-tick velocity. Tuning values (max speed, thrust) are expressed
//! in that mixed model, so do not scale the position step by `dt`.

use super::entity::{Entity, EntityKind};
use crate::tuning::Tuning;
use crate::wrap_coordinate;

/// Advance `entity` to `now_ms`. Returns true if it wrapped across an edge.
pub fn integrate(entity: &mut Entity, drag_loss: f32, now_ms: u64, tuning: &Tuning) -> bool {
    let dt = now_ms.saturating_sub(entity.last_update_ms) as f32 / 1000.0;
    entity.last_update_ms = now_ms;

    entity.vel += entity.accel * dt;

    if entity.kind == EntityKind::Ship {
        clamp_speed(entity, tuning.max_velocity);
    }

    entity.pos += entity.vel;

    let wrapped = wrap_position(entity, tuning.boundary_limit);
    if wrapped && entity.kind == EntityKind::Bullet {
        entity.lose_life();
    }

    entity.vel *= 1.0 - drag_loss;
    entity.accel = glam::Vec2::ZERO;

    wrapped
}

/// Rescale velocity down to `max_speed`, keeping its direction
fn clamp_speed(entity: &mut Entity, max_speed: f32) {
    let speed = entity.vel.length();
    if speed > max_speed {
        entity.vel = entity.vel / speed * max_speed;
    }
}

/// Toroidal wrap on both axes
fn wrap_position(entity: &mut Entity, limit: f32) -> bool {
    let (x, wrapped_x) = wrap_coordinate(entity.pos.x, limit);
    let (y, wrapped_y) = wrap_coordinate(entity.pos.y, limit);
    entity.pos.x = x;
    entity.pos.y = y;
    wrapped_x || wrapped_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn at_rest(kind: EntityKind, pos: Vec2) -> Entity {
        let tuning = Tuning::default();
        let mut e = match kind {
            EntityKind::Ship => Entity::ship(&tuning, 0),
            EntityKind::Bullet => Entity::bullet(&Entity::ship(&tuning, 0), &tuning, 0),
            EntityKind::Asteroid => Entity::asteroid(3, Vec2::ZERO, 0.0, 0.0, 0),
        };
        e.pos = pos;
        e.vel = Vec2::ZERO;
        e
    }

    #[test]
    fn test_wrap_positive_x() {
        let tuning = Tuning::default();
        let mut e = at_rest(EntityKind::Asteroid, Vec2::new(1001.0, 0.0));
        assert!(integrate(&mut e, 0.0, 0, &tuning));
        assert!((e.pos.x - (1.0 - 1000.0)).abs() < 1e-3);
        assert_eq!(e.pos.y, 0.0);
    }

    #[test]
    fn test_wrap_negative_y() {
        let tuning = Tuning::default();
        let mut e = at_rest(EntityKind::Ship, Vec2::new(0.0, -1001.0));
        assert!(integrate(&mut e, 0.0, 0, &tuning));
        assert!((e.pos.y - 999.0).abs() < 1e-3);
    }

    #[test]
    fn test_bullet_expires_after_two_wraps() {
        let tuning = Tuning::default();
        let mut bullet = at_rest(EntityKind::Bullet, Vec2::new(999.0, 0.0));
        bullet.vel = Vec2::new(8.0, 0.0);

        integrate(&mut bullet, 0.0, 0, &tuning);
        assert_eq!(bullet.health, 1);

        bullet.pos.x = 999.0;
        integrate(&mut bullet, 0.0, 0, &tuning);
        assert_eq!(bullet.health, 0);

        // Further wraps cannot underflow
        bullet.pos.x = 999.0;
        integrate(&mut bullet, 0.0, 0, &tuning);
        assert_eq!(bullet.health, 0);
    }

    #[test]
    fn test_diagonal_wrap_costs_one_life() {
        let tuning = Tuning::default();
        let mut bullet = at_rest(EntityKind::Bullet, Vec2::new(1005.0, -1005.0));
        integrate(&mut bullet, 0.0, 0, &tuning);
        assert_eq!(bullet.health, 1);
    }

    #[test]
    fn test_asteroid_wrap_keeps_health() {
        let tuning = Tuning::default();
        let mut rock = at_rest(EntityKind::Asteroid, Vec2::new(-1001.0, 0.0));
        integrate(&mut rock, 0.0, 0, &tuning);
        assert_eq!(rock.health, 3);
    }

    #[test]
    fn test_acceleration_scaled_by_dt_position_not() {
        let tuning = Tuning::default();
        let mut rock = at_rest(EntityKind::Asteroid, Vec2::ZERO);
        rock.last_update_ms = 1000;
        rock.accel = Vec2::new(3.0, 0.0);

        // 500 ms later: vel = 3 * 0.5, pos += vel (no dt)
        integrate(&mut rock, 0.0, 1500, &tuning);
        assert!((rock.vel.x - 1.5).abs() < 1e-5);
        assert!((rock.pos.x - 1.5).abs() < 1e-5);
        assert_eq!(rock.accel, Vec2::ZERO);
        assert_eq!(rock.last_update_ms, 1500);
    }

    #[test]
    fn test_clock_going_backwards_is_zero_dt() {
        let tuning = Tuning::default();
        let mut rock = at_rest(EntityKind::Asteroid, Vec2::ZERO);
        rock.last_update_ms = 2000;
        rock.accel = Vec2::new(100.0, 0.0);
        integrate(&mut rock, 0.0, 1000, &tuning);
        assert_eq!(rock.vel, Vec2::ZERO);
    }

    #[test]
    fn test_drag_applied_after_move() {
        let tuning = Tuning::default();
        let mut ship = at_rest(EntityKind::Ship, Vec2::ZERO);
        ship.vel = Vec2::new(2.0, 0.0);
        integrate(&mut ship, 0.5, 0, &tuning);
        assert!((ship.pos.x - 2.0).abs() < 1e-6);
        assert!((ship.vel.x - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_ship_speed_clamped(
            speed in 5.01f32..500.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let tuning = Tuning::default();
            let mut ship = at_rest(EntityKind::Ship, Vec2::ZERO);
            let dir = Vec2::new(angle.cos(), angle.sin());
            ship.vel = dir * speed;

            integrate(&mut ship, 0.0, 0, &tuning);

            prop_assert!((ship.vel.length() - tuning.max_velocity).abs() < 1e-3);
            prop_assert!(ship.vel.normalize().dot(dir) > 0.9999);
        }

        #[test]
        fn prop_other_kinds_never_clamped(speed in 5.01f32..500.0) {
            let tuning = Tuning::default();
            for kind in [EntityKind::Bullet, EntityKind::Asteroid] {
                let mut e = at_rest(kind, Vec2::ZERO);
                e.vel = Vec2::new(0.0, speed);
                integrate(&mut e, 0.0, 0, &tuning);
                prop_assert!((e.vel.length() - speed).abs() < 1e-3);
            }
        }

        #[test]
        fn prop_position_stays_in_field(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
        ) {
            let tuning = Tuning::default();
            let mut rock = at_rest(EntityKind::Asteroid, Vec2::new(x, y));
            rock.vel = Vec2::new(vx, vy);
            integrate(&mut rock, 0.0, 0, &tuning);
            prop_assert!(rock.pos.x.abs() <= tuning.boundary_limit);
            prop_assert!(rock.pos.y.abs() <= tuning.boundary_limit);
        }
    }
}
