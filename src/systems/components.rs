//! Components and resources shared across the simulation systems.

use bevy_ecs::{component::Component, resource::Resource};
use glam::{IVec2, Vec2};
use rand::rngs::SmallRng;
use strum_macros::EnumIter;

use crate::constants::{BOARD_CELL_SIZE, PEN_EXIT_PATHS, SCATTER_TARGETS};
use crate::map::builder::{Map, PelletKind};
use crate::map::direction::Direction;

/// A tag component for entities that are controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// Player-only state beyond the shared mover.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Player {
    /// Seconds left in the eat-slowdown window.
    pub eat_timer: f32,
}

/// The four ghost identities. A fixed, closed set: per-ghost behavior is
/// dispatched through tables indexed by [`GhostKind::id`], not through an
/// open hierarchy.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    pub fn id(self) -> usize {
        self as usize
    }

    /// This ghost's fixed scatter-corner tile.
    pub fn scatter_target(self) -> IVec2 {
        SCATTER_TARGETS[self.id()]
    }

    /// The scripted waypoint path from this ghost's pen seat to the pen
    /// mouth. The entry path is the same sequence reversed.
    pub fn pen_exit_path(self) -> &'static [Vec2] {
        PEN_EXIT_PATHS[self.id()]
    }

    /// The seat this ghost occupies inside the pen.
    pub fn pen_seat(self) -> Vec2 {
        self.pen_exit_path()[0]
    }
}

/// A ghost's effective behavior mode.
///
/// Scatter/Chase mirror the global mode while the ghost is free; Eyes is
/// per-ghost and survives global mode changes until the ghost re-enters
/// the pen.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostMode {
    Scatter,
    Chase,
    Frightened { blinking: bool },
    Eyes,
}

impl GhostMode {
    pub fn is_frightened(self) -> bool {
        matches!(self, GhostMode::Frightened { .. })
    }

    /// Whether the Cruise Elroy override may apply in this mode.
    pub fn is_chase_eligible(self) -> bool {
        matches!(self, GhostMode::Scatter | GhostMode::Chase)
    }
}

/// A ghost's position in the pen lifecycle.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenPhase {
    /// Idle in the pen, waiting for the pen controller's release.
    Waiting,
    /// Traversing the scripted exit path; `step` indexes the next
    /// waypoint.
    Exiting { step: usize },
    /// Normal grid movement.
    Free,
    /// Traversing the scripted entry path back to the seat.
    Entering { step: usize },
}

/// A ghost's standing navigation decisions.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct GhostNav {
    /// The turn chosen for an upcoming intersection tile, committed when
    /// that tile's center is passed.
    pub planned: Option<(IVec2, Direction)>,
    /// A mode-switch reversal request, honored at the next center
    /// passage. Overrides any planned turn.
    pub reverse_pending: bool,
}

/// The tile a ghost is currently steering toward. Exposed for debug
/// overlays.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetTile(pub IVec2);

/// Current speed in pixels per second. Re-evaluated at tile crossings,
/// not every tick.
#[derive(Component, Debug, Clone, Copy)]
pub struct Speed(pub f32);

/// The clamped time slice for the current tick, in seconds.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DeltaTime {
    pub seconds: f32,
}

/// The 1-based level currently being played.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CurrentLevel(pub u32);

/// The directional input for the current tick, if any.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlayerInput(pub Option<Direction>);

/// Set once a hostile ghost reaches the player, so the life-loss event
/// fires exactly once per life. Cleared when the life restarts.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlayerDown(pub bool);

/// Seedable randomness source for frightened turn selection. Keeping it
/// a resource makes whole-simulation replays reproducible.
#[derive(Resource, Debug)]
pub struct FrightRng(pub SmallRng);

/// The pellets still on the board.
#[derive(Resource, Debug)]
pub struct PelletField {
    grid: Vec<Option<PelletKind>>,
    remaining: u32,
}

impl PelletField {
    pub fn from_map(map: &Map) -> Self {
        let size = (BOARD_CELL_SIZE.x * BOARD_CELL_SIZE.y) as usize;
        let mut grid = vec![None; size];
        for (tile, kind) in map.pellets() {
            grid[Self::index(*tile)] = Some(*kind);
        }
        PelletField {
            grid,
            remaining: map.pellets().len() as u32,
        }
    }

    fn index(tile: IVec2) -> usize {
        debug_assert!(tile.x >= 0 && tile.x < BOARD_CELL_SIZE.x as i32);
        debug_assert!(tile.y >= 0 && tile.y < BOARD_CELL_SIZE.y as i32);
        (tile.y as u32 * BOARD_CELL_SIZE.x + tile.x as u32) as usize
    }

    /// Removes and returns the pellet at a tile, if one remains.
    pub fn take(&mut self, tile: IVec2) -> Option<PelletKind> {
        let slot = &mut self.grid[Self::index(tile)];
        let taken = slot.take();
        if taken.is_some() {
            self.remaining -= 1;
        }
        taken
    }

    pub fn peek(&self, tile: IVec2) -> Option<PelletKind> {
        self.grid[Self::index(tile)]
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}
