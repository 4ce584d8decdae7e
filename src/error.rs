//! Fatal simulation errors
//!
//! Advisory problems (a missing geometry asset) are logged and never surface
//! here; anything in this enum means the simulation cannot continue.

/// Errors that stop the simulation
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    /// Tuning values that would break an invariant
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// Tuning file could not be read
    #[error("tuning IO error: {0}")]
    TuningIo(#[from] std::io::Error),

    /// Tuning file is not valid JSON for [`crate::Tuning`]
    #[error("tuning parse error: {0}")]
    TuningParse(#[from] serde_json::Error),

    /// The player entity vanished from the world
    #[error("player ship is missing from the world")]
    MissingShip,

    /// No addressable arena slot is left
    #[error("entity arena is full ({0} slots)")]
    ArenaFull(usize),

    /// The free list names a slot that is not vacant
    #[error("entity arena free list is corrupt at slot {0}")]
    CorruptArena(u32),
}
