//! Per-ghost chase targeting.
//!
//! Each ghost steers toward a target tile that is recomputed at every
//! decision point. The target may lie inside a wall or off the board;
//! it only ever feeds distance comparisons, so an unreachable target is
//! perfectly serviceable.

use glam::IVec2;

use crate::constants::CLYDE_SHYNESS_TILES;
use crate::map::direction::Direction;
use crate::systems::components::GhostKind;

/// A snapshot of the positions that targeting reads.
#[derive(Debug, Clone, Copy)]
pub struct TargetContext {
    pub player_tile: IVec2,
    pub player_direction: Direction,
    pub blinky_tile: IVec2,
}

/// Offsets a tile along a direction, reproducing the arcade's overflow:
/// an Up offset also shifts the same amount leftward.
fn project(tile: IVec2, direction: Direction, tiles: i32) -> IVec2 {
    let mut target = tile + IVec2::from(direction) * tiles;
    if direction == Direction::Up {
        target.x -= tiles;
    }
    target
}

/// Computes a ghost's chase-mode target tile.
pub fn chase_target(kind: GhostKind, ghost_tile: IVec2, ctx: &TargetContext) -> IVec2 {
    match kind {
        GhostKind::Blinky => ctx.player_tile,
        GhostKind::Pinky => project(ctx.player_tile, ctx.player_direction, 4),
        GhostKind::Inky => {
            let pivot = project(ctx.player_tile, ctx.player_direction, 2);
            2 * pivot - ctx.blinky_tile
        }
        GhostKind::Clyde => {
            let shyness = CLYDE_SHYNESS_TILES * CLYDE_SHYNESS_TILES;
            if ghost_tile.distance_squared(ctx.player_tile) > shyness {
                ctx.player_tile
            } else {
                kind.scatter_target()
            }
        }
    }
}
