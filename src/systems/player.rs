//! Player steering, speed, and pellet consumption.

use bevy_ecs::event::EventWriter;
use bevy_ecs::prelude::{Query, Res, ResMut, With};
use tracing::debug;

use crate::constants::{EAT_SLOWDOWN_SECONDS, FULL_SPEED};
use crate::events::GameEvent;
use crate::level::{level_params, LevelParams};
use crate::map::builder::{Map, PelletKind};
use crate::systems::components::{
    CurrentLevel, DeltaTime, PelletField, Player, PlayerControlled, PlayerInput,
};
use crate::systems::mode::ModeController;
use crate::systems::movement::Mover;

/// The player's speed rating for the current fright/eating combination.
fn player_speed_rating(params: &LevelParams, fright: bool, eating: bool) -> f32 {
    match (fright, eating) {
        (false, false) => params.player_speed,
        (false, true) => params.player_eat_speed,
        (true, false) => params.player_fright_speed,
        (true, true) => params.player_fright_eat_speed,
    }
}

pub fn player_system(
    dt: Res<DeltaTime>,
    level: Res<CurrentLevel>,
    map: Res<Map>,
    input: Res<PlayerInput>,
    controller: Res<ModeController>,
    mut pellets: ResMut<PelletField>,
    mut events: EventWriter<GameEvent>,
    mut query: Query<(&mut Mover, &mut Player), With<PlayerControlled>>,
) {
    let Ok((mut mover, mut player)) = query.single_mut() else {
        return;
    };
    let params = level_params(level.0);

    if let Some(direction) = input.0 {
        mover.attempt_turn(&map, direction);
    }

    player.eat_timer = (player.eat_timer - dt.seconds).max(0.0);
    let rating = player_speed_rating(
        params,
        controller.is_fright_active(),
        player.eat_timer > 0.0,
    );
    mover.advance(&map, rating * FULL_SPEED * dt.seconds);

    if mover.centered {
        // Retry the buffered turn, then park on the center if the way
        // ahead is solid.
        mover.commit_pending(&map);
        let blocked = map
            .step(mover.tile, mover.direction)
            .is_none_or(|next| !map.is_walkable(next));
        if blocked {
            mover.snap_to_center();
        }
    }

    if let Some(kind) = pellets.take(mover.tile) {
        player.eat_timer = EAT_SLOWDOWN_SECONDS;
        let tile = mover.tile;
        match kind {
            PelletKind::Pellet => {
                events.write(GameEvent::PelletEaten { tile });
            }
            PelletKind::PowerPellet => {
                debug!(?tile, "power pellet eaten");
                events.write(GameEvent::PowerPelletEaten { tile });
            }
        }
        if pellets.remaining() == 0 {
            events.write(GameEvent::LevelCleared);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_speed_rating_selection() {
        let params = level_params(1);
        assert_eq!(player_speed_rating(params, false, false), 0.80);
        assert_eq!(player_speed_rating(params, false, true), 0.71);
        assert_eq!(player_speed_rating(params, true, false), 0.90);
        assert_eq!(player_speed_rating(params, true, true), 0.79);
    }
}
