//! The embedding surface: a self-contained, tick-driven simulation.
//!
//! A [`Game`] owns the ECS world and schedule. Callers drive it with
//! [`Game::tick`], drain [`GameEvent`]s with [`Game::poll_events`], and
//! read actor snapshots for rendering. Two identically seeded games fed
//! the same tick sequence stay bit-identical.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{EventCursor, EventRegistry, Events};
use bevy_ecs::prelude::With;
use bevy_ecs::schedule::Schedule;
use bevy_ecs::world::World;
use glam::{IVec2, Vec2};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use strum::IntoEnumIterator;
use tracing::info;

use crate::constants::{FULL_SPEED, MAX_TICK_SECONDS, PEN_MOUTH, RAW_BOARD};
use crate::error::GameResult;
use crate::events::GameEvent;
use crate::level::level_params;
use crate::map::builder::{tile_center, Map};
use crate::map::direction::Direction;
use crate::systems::build_schedule;
use crate::systems::components::{
    CurrentLevel, DeltaTime, FrightRng, GhostKind, GhostMode, GhostNav, PelletField, PenPhase,
    Player, PlayerControlled, PlayerDown, PlayerInput, Speed, TargetTile,
};
use crate::systems::mode::ModeController;
use crate::systems::movement::Mover;
use crate::systems::pen::{PenController, PenPolicy};

/// A rendering-oriented snapshot of one ghost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostView {
    pub kind: GhostKind,
    pub pixel: Vec2,
    pub tile: IVec2,
    pub direction: Direction,
    pub mode: GhostMode,
    pub pen_phase: PenPhase,
    pub target: IVec2,
}

/// A rendering-oriented snapshot of the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub pixel: Vec2,
    pub tile: IVec2,
    pub direction: Direction,
}

pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    cursor: EventCursor<GameEvent>,
    seed: u64,
}

impl Game {
    /// Builds a game on the standard board with an arbitrary seed.
    pub fn new(level: u32) -> GameResult<Self> {
        Self::with_seed(level, rand::random())
    }

    /// Builds a game whose frightened-ghost randomness is reproducible.
    pub fn with_seed(level: u32, seed: u64) -> GameResult<Self> {
        let mut world = World::new();
        EventRegistry::register_event::<GameEvent>(&mut world);

        let map = Map::new(RAW_BOARD)?;
        let pellets = PelletField::from_map(&map);
        world.insert_resource(map);
        world.insert_resource(pellets);
        world.insert_resource(CurrentLevel(level));
        world.insert_resource(DeltaTime::default());
        world.insert_resource(PlayerInput::default());
        world.insert_resource(PlayerDown::default());
        world.insert_resource(ModeController::default());
        world.insert_resource(level_start_pen(PenPolicy::PerGhost));
        world.insert_resource(FrightRng(SmallRng::seed_from_u64(seed)));

        spawn_actors(&mut world);

        let cursor = world.resource::<Events<GameEvent>>().get_cursor();
        info!(level, seed, "game ready");
        Ok(Game {
            world,
            schedule: build_schedule(),
            cursor,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn level(&self) -> u32 {
        self.world.resource::<CurrentLevel>().0
    }

    pub fn pellets_remaining(&self) -> u32 {
        self.world.resource::<PelletField>().remaining()
    }

    /// Advances the simulation by one tick. `dt` is clamped so a long
    /// stall can never step an actor across a full tile.
    pub fn tick(&mut self, dt: f32, input: Option<Direction>) {
        let dt = dt.clamp(0.0, MAX_TICK_SECONDS);
        self.world.resource_mut::<DeltaTime>().seconds = dt;
        self.world.resource_mut::<PlayerInput>().0 = input;
        // One swap per tick: events written during tick N stay readable
        // by the systems through tick N + 1.
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.schedule.run(&mut self.world);
    }

    /// Drains every event emitted since the previous call.
    pub fn poll_events(&mut self) -> Vec<GameEvent> {
        let events = self.world.resource::<Events<GameEvent>>();
        self.cursor.read(events).copied().collect()
    }

    pub fn player(&mut self) -> PlayerView {
        let mut query = self
            .world
            .query_filtered::<&Mover, With<PlayerControlled>>();
        let mover = query.single(&self.world).expect("player exists");
        PlayerView {
            pixel: mover.pixel,
            tile: mover.tile,
            direction: mover.direction,
        }
    }

    /// Snapshots all four ghosts, ordered by ghost id.
    pub fn ghosts(&mut self) -> Vec<GhostView> {
        let mut query = self.world.query::<(
            &GhostKind,
            &Mover,
            &GhostMode,
            &PenPhase,
            &TargetTile,
        )>();
        let mut views: Vec<GhostView> = query
            .iter(&self.world)
            .map(|(kind, mover, mode, phase, target)| GhostView {
                kind: *kind,
                pixel: mover.pixel,
                tile: mover.tile,
                direction: mover.direction,
                mode: *mode,
                pen_phase: *phase,
                target: target.0,
            })
            .collect();
        views.sort_by_key(|view| view.kind.id());
        views
    }

    /// Resets the actors after a lost life. Pellets stay eaten; the pen
    /// switches to the shared-counter release policy.
    pub fn restart_life(&mut self) {
        info!("life lost; resetting actors");
        self.world.insert_resource(PlayerDown::default());
        self.world.insert_resource(ModeController::default());
        self.world
            .insert_resource(level_start_pen(PenPolicy::Global));
        self.respawn_actors();
    }

    /// Moves on to the next level: fresh pellets, fresh schedule, and
    /// the per-ghost pen policy again.
    pub fn advance_level(&mut self) {
        let level = self.level() + 1;
        info!(level, "advancing level");
        self.world.insert_resource(CurrentLevel(level));
        let pellets = PelletField::from_map(self.world.resource::<Map>());
        self.world.insert_resource(pellets);
        self.world.insert_resource(PlayerDown::default());
        self.world.insert_resource(ModeController::default());
        self.world
            .insert_resource(level_start_pen(PenPolicy::PerGhost));
        self.respawn_actors();
    }

    fn respawn_actors(&mut self) {
        let entities: Vec<Entity> = self
            .world
            .query_filtered::<Entity, With<Mover>>()
            .iter(&self.world)
            .collect();
        for entity in entities {
            self.world.despawn(entity);
        }
        spawn_actors(&mut self.world);
    }
}

fn level_start_pen(policy: PenPolicy) -> PenController {
    let mut pen = PenController::new(policy);
    pen.enqueue(GhostKind::Pinky);
    pen.enqueue(GhostKind::Inky);
    pen.enqueue(GhostKind::Clyde);
    pen
}

fn spawn_actors(world: &mut World) {
    let level = world.resource::<CurrentLevel>().0;
    let params = level_params(level);
    let start = world.resource::<Map>().player_start();

    world.spawn((
        PlayerControlled,
        Player::default(),
        Mover::new(tile_center(start), Direction::Left),
    ));

    // Blinky starts on the board at the pen mouth; the rest wait on
    // their seats for the pen controller.
    world.spawn((
        GhostKind::Blinky,
        Mover::new(PEN_MOUTH, Direction::Left),
        GhostMode::Scatter,
        PenPhase::Free,
        GhostNav::default(),
        TargetTile(GhostKind::Blinky.scatter_target()),
        Speed(params.ghost_speed * FULL_SPEED),
    ));
    for kind in GhostKind::iter().filter(|&kind| kind != GhostKind::Blinky) {
        world.spawn((
            kind,
            Mover::new(kind.pen_seat(), Direction::Up),
            GhostMode::Scatter,
            PenPhase::Waiting,
            GhostNav::default(),
            TargetTile(kind.scatter_target()),
            Speed(params.ghost_speed * FULL_SPEED),
        ));
    }
}
