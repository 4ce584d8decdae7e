//! Maps queued input events onto the player ship

use super::entity::Entity;
use super::input::{InputEvent, InputQueue};
use crate::tuning::Tuning;

pub const KEY_THRUST: &str = "w";
pub const KEY_TURN_LEFT: &str = "a";
pub const KEY_TURN_RIGHT: &str = "d";
pub const KEY_FIRE: &str = " ";

/// A recognized player action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Thrust,
    TurnLeft,
    TurnRight,
    Fire,
}

impl Action {
    /// Action bound to a key press; releases and unknown keys map to nothing
    pub fn from_event(event: &InputEvent) -> Option<Action> {
        match event {
            InputEvent::Keyboard { key, pressed: true } => match key.as_str() {
                KEY_THRUST => Some(Action::Thrust),
                KEY_TURN_LEFT => Some(Action::TurnLeft),
                KEY_TURN_RIGHT => Some(Action::TurnRight),
                KEY_FIRE => Some(Action::Fire),
                _ => None,
            },
            InputEvent::Keyboard { pressed: false, .. } => None,
            // Captured for completeness, nothing is bound to the pointer
            InputEvent::Pointer { .. } => None,
        }
    }

    /// Mutate the ship for this action
    pub fn apply(self, ship: &mut Entity, tuning: &Tuning) {
        match self {
            Action::Thrust => ship.thrust(tuning.acceleration),
            // Per event, not per second: turn speed follows the key repeat rate
            Action::TurnLeft => ship.angle += tuning.turn_rate,
            Action::TurnRight => ship.angle -= tuning.turn_rate,
            Action::Fire => ship.fire_requested = true,
        }
    }
}

/// Drain up to `tuning.events_per_tick` events into `ship`.
///
/// Returns the number of events consumed, mapped or not.
pub fn apply_input(queue: &mut InputQueue, ship: &mut Entity, tuning: &Tuning) -> usize {
    let mut consumed = 0;
    while consumed < tuning.events_per_tick {
        let Some(event) = queue.pop() else {
            break;
        };
        consumed += 1;

        match Action::from_event(&event) {
            Some(action) => action.apply(ship, tuning),
            None => log::trace!("Ignoring unmapped input {:?}", event),
        }
    }
    consumed
}
