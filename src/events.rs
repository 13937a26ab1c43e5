//! Outbound simulation events, consumed by the scoring/sound/animation
//! collaborators outside this crate.

use bevy_ecs::event::Event;
use glam::IVec2;

use crate::systems::components::GhostKind;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The player consumed a regular pellet.
    PelletEaten { tile: IVec2 },
    /// The player consumed a power pellet.
    PowerPelletEaten { tile: IVec2 },
    /// A frightened ghost was caught. `combo` counts captures within the
    /// current fright, starting at zero.
    GhostCaught { ghost: GhostKind, combo: u32 },
    /// A hostile ghost reached the player's tile.
    PlayerCaught,
    /// The last pellet was consumed.
    LevelCleared,
}
