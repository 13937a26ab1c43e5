//! Ghost steering: pen choreography, intersection decisions, and speed.
//!
//! Free ghosts never path-plan. Each one greedily picks an exit at every
//! decision point: when a ghost crosses into a tile and the tile ahead is
//! an intersection, it chooses that intersection's exit immediately and
//! commits the turn when it passes the intersection's center. Corridor
//! bends need no plan; the forced-decision fallback at a blocked center
//! handles them. Reversals are forbidden at decision points and happen
//! only through mode-switch broadcasts.

use bevy_ecs::prelude::{Query, Res, ResMut, With, Without};
use glam::{IVec2, Vec2};
use rand::rngs::SmallRng;
use rand::Rng;
use smallvec::SmallVec;
use tracing::trace;

use crate::constants::{EYES_SPEED_FACTOR, FULL_SPEED, PEN_DOORWAY_TILE, PEN_MOUTH, PEN_PATH_SPEED};
use crate::level::{level_params, LevelParams};
use crate::map::builder::Map;
use crate::map::direction::{Direction, DIRECTIONS};
use crate::systems::components::{
    CurrentLevel, DeltaTime, FrightRng, GhostKind, GhostMode, GhostNav, PelletField, PenPhase,
    PlayerControlled, Speed, TargetTile,
};
use crate::systems::mode::ModeController;
use crate::systems::movement::Mover;
use crate::systems::pen::PenController;
use crate::systems::target::{chase_target, TargetContext};

/// Picks the exit a ghost takes out of `tile`, scanning candidates in
/// the fixed Up, Left, Down, Right order. Reversal is excluded; among
/// survivors a frightened ghost picks uniformly at random, everyone else
/// takes the exit whose next tile minimizes squared Euclidean distance
/// to `target`, the scan order breaking ties.
///
/// Panics if the tile has no non-reversal exit: the turn table
/// guarantees that never happens on a well-formed board.
pub fn choose_exit(
    map: &Map,
    tile: IVec2,
    travel: Direction,
    frightened: bool,
    target: IVec2,
    rng: &mut SmallRng,
) -> Direction {
    let exits = map.exits(tile);
    let reverse = travel.opposite();
    let mut candidates: SmallVec<[(Direction, IVec2); 4]> = SmallVec::new();
    for dir in DIRECTIONS {
        if dir == reverse || !exits.has(dir) {
            continue;
        }
        if let Some(next) = map.step(tile, dir) {
            candidates.push((dir, next));
        }
    }

    match candidates.len() {
        0 => panic!("ghost cornered at {tile} with no exit"),
        1 => candidates[0].0,
        n if frightened => candidates[rng.random_range(0..n)].0,
        _ => {
            let mut best = candidates[0].0;
            let mut best_distance = candidates[0].1.distance_squared(target);
            for (dir, next) in &candidates[1..] {
                let distance = next.distance_squared(target);
                // Strict comparison keeps the earliest direction on ties.
                if distance < best_distance {
                    best = *dir;
                    best_distance = distance;
                }
            }
            best
        }
    }
}

/// Cruise Elroy stage for the current pellet count: 0 inactive, 1 or 2.
pub fn elroy_stage(params: &LevelParams, pellets_remaining: u32) -> u32 {
    if pellets_remaining <= params.elroy2_dots {
        2
    } else if pellets_remaining <= params.elroy1_dots {
        1
    } else {
        0
    }
}

/// Resolves a free ghost's speed for the tile it just entered.
pub fn ghost_speed(
    kind: GhostKind,
    mode: GhostMode,
    tile: IVec2,
    map: &Map,
    params: &LevelParams,
    elroy: u32,
) -> f32 {
    let rating = match mode {
        GhostMode::Eyes => return EYES_SPEED_FACTOR * FULL_SPEED,
        GhostMode::Frightened { .. } => params.ghost_fright_speed,
        _ if kind == GhostKind::Blinky && elroy == 2 => params.elroy2_speed,
        _ if kind == GhostKind::Blinky && elroy == 1 => params.elroy1_speed,
        _ if map.is_tunnel(tile) => params.ghost_tunnel_speed,
        _ => params.ghost_speed,
    };
    rating * FULL_SPEED
}

/// The tile this ghost steers toward right now. Frightened ghosts have
/// no target; callers must branch to random selection instead.
fn select_target(
    kind: GhostKind,
    mode: GhostMode,
    ghost_tile: IVec2,
    ctx: &TargetContext,
    elroy: u32,
) -> IVec2 {
    match mode {
        GhostMode::Eyes => PEN_DOORWAY_TILE,
        GhostMode::Chase => chase_target(kind, ghost_tile, ctx),
        // Elroy abandons the scatter corner and hounds the player.
        GhostMode::Scatter if kind == GhostKind::Blinky && elroy > 0 => ctx.player_tile,
        _ => kind.scatter_target(),
    }
}

/// Moves a pen ghost along scripted waypoints, consuming leftover
/// distance across waypoint boundaries. Returns the next step index and
/// whether the path is finished.
fn follow_waypoints(mover: &mut Mover, path: &[Vec2], step: usize, distance: f32) -> (usize, bool) {
    let mut step = step;
    let mut remaining = distance;
    while remaining > 0.0 && step < path.len() {
        let to = path[step] - mover.pixel;
        let length = to.length();
        if length <= remaining {
            mover.pixel = path[step];
            remaining -= length;
            step += 1;
        } else {
            mover.pixel += to / length * remaining;
            remaining = 0.0;
        }
    }
    (step, step >= path.len())
}

pub fn ghost_system(
    dt: Res<DeltaTime>,
    level: Res<CurrentLevel>,
    map: Res<Map>,
    controller: Res<ModeController>,
    mut pen: ResMut<PenController>,
    mut rng: ResMut<FrightRng>,
    pellets: Res<PelletField>,
    player: Query<&Mover, (With<PlayerControlled>, Without<GhostKind>)>,
    mut ghosts: Query<
        (
            &GhostKind,
            &mut Mover,
            &mut GhostMode,
            &mut PenPhase,
            &mut GhostNav,
            &mut TargetTile,
            &mut Speed,
        ),
        Without<PlayerControlled>,
    >,
) {
    let Ok(player) = player.single() else {
        return;
    };
    let params = level_params(level.0);
    let elroy = elroy_stage(params, pellets.remaining());
    let Some(blinky_tile) = ghosts
        .iter()
        .find(|(kind, ..)| **kind == GhostKind::Blinky)
        .map(|(_, mover, ..)| mover.tile)
    else {
        return;
    };
    let ctx = TargetContext {
        player_tile: player.tile,
        player_direction: player.direction,
        blinky_tile,
    };

    for (kind, mut mover, mut mode, mut phase, mut nav, mut target, mut speed) in ghosts.iter_mut()
    {
        match *phase {
            PenPhase::Waiting => {}
            PenPhase::Exiting { step } => {
                let path = kind.pen_exit_path();
                let (step, done) =
                    follow_waypoints(&mut mover, path, step, PEN_PATH_SPEED * dt.seconds);
                if done {
                    trace!(ghost = ?kind, "pen exit complete");
                    mover.warp(PEN_MOUTH, Direction::Left);
                    *phase = PenPhase::Free;
                    *nav = GhostNav::default();
                    speed.0 = ghost_speed(*kind, *mode, mover.tile, &map, params, elroy);
                } else {
                    *phase = PenPhase::Exiting { step };
                }
            }
            PenPhase::Entering { step } => {
                let path: SmallVec<[Vec2; 3]> =
                    kind.pen_exit_path().iter().rev().copied().collect();
                let (step, done) =
                    follow_waypoints(&mut mover, &path, step, PEN_PATH_SPEED * dt.seconds);
                if done {
                    trace!(ghost = ?kind, "pen entry complete");
                    mover.warp(kind.pen_seat(), Direction::Up);
                    *mode = controller.global_mode();
                    *nav = GhostNav::default();
                    if *kind == GhostKind::Blinky {
                        // Blinky never waits; it turns straight around.
                        *phase = PenPhase::Exiting { step: 1 };
                    } else {
                        *phase = PenPhase::Waiting;
                        pen.enqueue(*kind);
                    }
                } else {
                    *phase = PenPhase::Entering { step };
                }
            }
            PenPhase::Free => {
                let adv = mover.advance(&map, speed.0 * dt.seconds);

                if adv.crossed {
                    if *mode == GhostMode::Eyes && mover.tile == PEN_DOORWAY_TILE {
                        trace!(ghost = ?kind, "eyes reached the doorway");
                        *phase = PenPhase::Entering { step: 0 };
                        *nav = GhostNav::default();
                        continue;
                    }
                    speed.0 = ghost_speed(*kind, *mode, mover.tile, &map, params, elroy);

                    // Look one tile ahead and decide that intersection's
                    // exit now. The slot is busy while an earlier turn is
                    // still waiting to commit.
                    if !nav.reverse_pending && nav.planned.is_none() {
                        if let Some(next) = map.step(mover.tile, mover.direction) {
                            if map.is_intersection(next) {
                                let frightened = mode.is_frightened();
                                target.0 = select_target(*kind, *mode, next, &ctx, elroy);
                                let dir = choose_exit(
                                    &map,
                                    next,
                                    mover.direction,
                                    frightened,
                                    target.0,
                                    &mut rng.0,
                                );
                                nav.planned = Some((next, dir));
                            }
                        }
                    }
                }

                if adv.passed_center {
                    if nav.reverse_pending {
                        nav.reverse_pending = false;
                        nav.planned = None;
                        mover.snap_to_center();
                        mover.direction = mover.direction.opposite();
                    } else if let Some((tile, dir)) = nav.planned {
                        if tile == mover.tile {
                            nav.planned = None;
                            if dir != mover.direction {
                                mover.snap_to_center();
                                mover.direction = dir;
                            }
                        }
                    } else {
                        let blocked = map
                            .step(mover.tile, mover.direction)
                            .is_none_or(|next| !map.is_walkable(next));
                        if blocked {
                            // Corridor bend (or a late mode change left
                            // us planless): decide on the spot.
                            let frightened = mode.is_frightened();
                            target.0 = select_target(*kind, *mode, mover.tile, &ctx, elroy);
                            let dir = choose_exit(
                                &map,
                                mover.tile,
                                mover.direction,
                                frightened,
                                target.0,
                                &mut rng.0,
                            );
                            mover.snap_to_center();
                            mover.direction = dir;
                        }
                    }
                }
            }
        }
    }
}
