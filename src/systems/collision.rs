//! Player/ghost contact resolution.
//!
//! Contact is tile coincidence, matching the arcade's forgiving
//! hitboxes. Eyes pass straight through the player; a frightened ghost
//! is captured and sent home; anything else costs a life.

use bevy_ecs::event::EventWriter;
use bevy_ecs::prelude::{Query, ResMut, With, Without};
use tracing::debug;

use crate::constants::PEN_DOORWAY_TILE;
use crate::events::GameEvent;
use crate::systems::components::{
    GhostKind, GhostMode, GhostNav, PenPhase, PlayerControlled, PlayerDown,
};
use crate::systems::mode::ModeController;
use crate::systems::movement::Mover;

pub fn collision_system(
    mut controller: ResMut<ModeController>,
    mut down: ResMut<PlayerDown>,
    mut events: EventWriter<GameEvent>,
    player: Query<&Mover, (With<PlayerControlled>, Without<GhostKind>)>,
    mut ghosts: Query<
        (&GhostKind, &Mover, &mut GhostMode, &mut PenPhase, &mut GhostNav),
        Without<PlayerControlled>,
    >,
) {
    let Ok(player) = player.single() else {
        return;
    };

    for (kind, mover, mut mode, mut phase, mut nav) in ghosts.iter_mut() {
        if *phase != PenPhase::Free || mover.tile != player.tile {
            continue;
        }
        match *mode {
            GhostMode::Eyes => {}
            GhostMode::Frightened { .. } => {
                let combo = controller.claim_combo().unwrap_or(0);
                debug!(ghost = ?kind, combo, "frightened ghost captured");
                events.write(GameEvent::GhostCaught {
                    ghost: *kind,
                    combo,
                });
                *mode = GhostMode::Eyes;
                *nav = GhostNav::default();
                // A capture right on the doorway starts the entry path
                // without a detour.
                if mover.tile == PEN_DOORWAY_TILE {
                    *phase = PenPhase::Entering { step: 0 };
                }
            }
            GhostMode::Scatter | GhostMode::Chase => {
                // Latched: the event fires once per life, not once per
                // tick of overlap.
                if !down.0 {
                    down.0 = true;
                    events.write(GameEvent::PlayerCaught);
                }
            }
        }
    }
}
