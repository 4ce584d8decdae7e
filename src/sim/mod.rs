//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Time comes in as explicit millisecond timestamps
//! - Seeded RNG only
//! - Stable iteration order (arena slot order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod controls;
pub mod entity;
pub mod input;
pub mod physics;
pub mod tick;
pub mod world;

pub use arena::{EntityArena, EntityId};
pub use collision::{Contact, ScanOutcome, bounding_radius, collides};
pub use controls::{Action, apply_input};
pub use entity::{Entity, EntityKind, GeometryHandle};
pub use input::{InputEvent, InputQueue, SharedInputQueue};
pub use physics::integrate;
pub use tick::{TickReport, tick};
pub use world::{GeometrySource, Hud, HudState, StaticGeometry, World};
