//! The simulation systems and their fixed execution order.

pub mod collision;
pub mod components;
pub mod ghost;
pub mod mode;
pub mod movement;
pub mod pen;
pub mod player;
pub mod target;

use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule};

/// Builds the per-tick schedule. The chain order is load-bearing: mode
/// and pen react to last tick's events before anyone moves, ghosts move
/// before the player so a fresh fright reversal is visible the same
/// tick, and collisions are judged on final positions.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            mode::mode_system,
            pen::pen_system,
            ghost::ghost_system,
            player::player_system,
            collision::collision_system,
        )
            .chain(),
    );
    schedule
}
