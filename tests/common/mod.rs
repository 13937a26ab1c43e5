//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::sync::Once;

use bevy_ecs::event::Events;
use bevy_ecs::prelude::With;
use glam::{IVec2, Vec2};

use pacman_sim::systems::components::PlayerControlled;
use pacman_sim::systems::movement::Mover;
use pacman_sim::{Direction, Game, GameEvent, GhostKind, GhostMode};

pub const TICK: f32 = 1.0 / 60.0;

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A level-one game with a fixed seed.
pub fn game() -> Game {
    init_tracing();
    Game::with_seed(1, 42).expect("standard board builds")
}

pub fn run(game: &mut Game, seconds: f32) {
    run_with(game, seconds, None);
}

pub fn run_with(game: &mut Game, seconds: f32, input: Option<Direction>) {
    let ticks = (seconds / TICK).ceil() as u32;
    for _ in 0..ticks {
        game.tick(TICK, input);
    }
}

pub fn ghost(game: &mut Game, kind: GhostKind) -> pacman_sim::GhostView {
    game.ghosts()
        .into_iter()
        .find(|view| view.kind == kind)
        .expect("all four ghosts exist")
}

/// Faces the player into the wall above its spawn so it stays put.
pub fn park_player(game: &mut Game) {
    let mut query = game
        .world
        .query_filtered::<&mut Mover, With<PlayerControlled>>();
    let mut mover = query.single_mut(&mut game.world).expect("player exists");
    mover.direction = Direction::Up;
}

pub fn set_ghost_mode(game: &mut Game, kind: GhostKind, mode: GhostMode) {
    let mut query = game.world.query::<(&GhostKind, &mut GhostMode)>();
    for (k, mut m) in query.iter_mut(&mut game.world) {
        if *k == kind {
            *m = mode;
        }
    }
}

pub fn teleport_ghost(game: &mut Game, kind: GhostKind, pixel: Vec2, direction: Direction) {
    let mut query = game.world.query::<(&GhostKind, &mut Mover)>();
    for (k, mut mover) in query.iter_mut(&mut game.world) {
        if *k == kind {
            mover.warp(pixel, direction);
        }
    }
}

/// Feeds a power-pellet event into the world as if the player had just
/// eaten one; the mode and pen systems pick it up on the next tick.
pub fn inject_power_pellet(game: &mut Game) {
    game.world
        .resource_mut::<Events<GameEvent>>()
        .send(GameEvent::PowerPelletEaten {
            tile: IVec2::new(1, 3),
        });
}
