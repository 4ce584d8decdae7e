//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so a session can
//! be replayed with different numbers. Defaults come from [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Simulation tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    /// Half-width of the toroidal field
    pub boundary_limit: f32,
    /// Distance of spawn points from the corners
    pub spawn_corner_inset: f32,

    // === Ship ===
    pub max_velocity: f32,
    pub acceleration: f32,
    /// Radians per turn event
    pub turn_rate: f32,
    pub ship_drag: f32,
    pub ship_spawn_drift: f32,
    pub ship_lives: u8,
    pub ship_radius: f32,

    // === Bullets ===
    pub bullet_velocity: f32,
    pub bullet_lives: u8,
    pub bullet_radius: f32,

    // === Asteroids ===
    pub asteroid_velocity: f32,
    pub split_speed_factor: f32,
    /// Degrees; one is drawn per split
    pub split_offsets_deg: Vec<f32>,
    /// Radius per tier, index 0 = tier 1
    pub asteroid_radii: [f32; 3],
    pub fallback_radius: f32,
    pub spawn_interval_ms: u64,
    pub score_per_hit: u32,

    // === Input ===
    pub input_queue_capacity: usize,
    pub events_per_tick: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            boundary_limit: BOUNDARY_LIMIT,
            spawn_corner_inset: SPAWN_CORNER_INSET,

            max_velocity: MAX_VELOCITY,
            acceleration: ACCELERATION,
            turn_rate: TURN_RATE,
            ship_drag: SHIP_DRAG,
            ship_spawn_drift: SHIP_SPAWN_DRIFT,
            ship_lives: SHIP_LIVES,
            ship_radius: SHIP_RADIUS,

            bullet_velocity: BULLET_VELOCITY,
            bullet_lives: BULLET_LIVES,
            bullet_radius: BULLET_RADIUS,

            asteroid_velocity: ASTEROID_VELOCITY,
            split_speed_factor: SPLIT_SPEED_FACTOR,
            split_offsets_deg: SPLIT_OFFSETS_DEG.to_vec(),
            asteroid_radii: [
                ASTEROID_RADIUS_SMALL,
                ASTEROID_RADIUS_MEDIUM,
                ASTEROID_RADIUS_LARGE,
            ],
            fallback_radius: FALLBACK_RADIUS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            score_per_hit: SCORE_PER_HIT,

            input_queue_capacity: INPUT_QUEUE_CAPACITY,
            events_per_tick: EVENTS_PER_TICK,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starting tuning file)
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), SimError> {
        fn invalid(msg: &str) -> Result<(), SimError> {
            Err(SimError::InvalidTuning(msg.to_string()))
        }

        if !(self.boundary_limit.is_finite() && self.boundary_limit > 0.0) {
            return invalid("boundary_limit must be positive");
        }
        if !(0.0..self.boundary_limit).contains(&self.spawn_corner_inset) {
            return invalid("spawn_corner_inset must lie inside the field");
        }
        if !(self.max_velocity > 0.0) {
            return invalid("max_velocity must be positive");
        }
        if !(0.0..1.0).contains(&self.ship_drag) {
            return invalid("ship_drag must be in [0, 1)");
        }
        if self.ship_lives == 0 {
            return invalid("ship_lives must be at least 1");
        }
        if self.bullet_lives == 0 {
            return invalid("bullet_lives must be at least 1");
        }
        if self.split_offsets_deg.is_empty() {
            return invalid("split_offsets_deg must not be empty");
        }
        let radii = [self.ship_radius, self.bullet_radius, self.fallback_radius];
        if radii
            .iter()
            .chain(self.asteroid_radii.iter())
            .any(|r| !(*r >= 0.0))
        {
            return invalid("radii must be non-negative");
        }
        if self.input_queue_capacity == 0 {
            return invalid("input_queue_capacity must be at least 1");
        }
        if self.events_per_tick == 0 {
            return invalid("events_per_tick must be at least 1");
        }
        Ok(())
    }

    /// Collision radius of an asteroid of the given tier
    pub fn asteroid_radius(&self, tier: u8) -> f32 {
        match tier {
            1..=3 => self.asteroid_radii[usize::from(tier) - 1],
            _ => self.fallback_radius,
        }
    }

    /// Base speed of an asteroid of the given tier (uniform across tiers)
    pub fn asteroid_speed(&self, _tier: u8) -> f32 {
        self.asteroid_velocity
    }

    /// Coordinate of the spawn corners on each axis
    pub fn spawn_corner(&self) -> f32 {
        self.boundary_limit - self.spawn_corner_inset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn_interval_ms": 1000 }"#).unwrap();
        assert_eq!(tuning.spawn_interval_ms, 1000);
        assert_eq!(tuning.boundary_limit, BOUNDARY_LIMIT);
        assert_eq!(tuning.split_offsets_deg, vec![25.0, 45.0, 65.0]);
    }

    #[test]
    fn test_written_defaults_load_back() {
        let json = Tuning::default().to_json().unwrap();
        assert!(json.contains("\"spawn_interval_ms\": 5000"));
        let tuning = Tuning::from_json(&json).unwrap();
        assert_eq!(tuning.input_queue_capacity, INPUT_QUEUE_CAPACITY);
        assert_eq!(tuning.ship_lives, SHIP_LIVES);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = Tuning::from_json(r#"{ "input_queue_capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_bad_drag_and_boundary() {
        let tuning = Tuning {
            ship_drag: 1.5,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());

        let tuning = Tuning {
            boundary_limit: -1.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::TuningParse(_)));
    }

    #[test]
    fn test_asteroid_radius_lookup() {
        let tuning = Tuning::default();
        assert!((tuning.asteroid_radius(3) - 105.0).abs() < 1e-3);
        assert!((tuning.asteroid_radius(2) - 60.0).abs() < 1e-3);
        assert!((tuning.asteroid_radius(1) - 30.0).abs() < 1e-3);
        assert_eq!(tuning.asteroid_radius(0), tuning.fallback_radius);
        assert_eq!(tuning.asteroid_radius(7), tuning.fallback_radius);
    }
}
