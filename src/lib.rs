//! A deterministic, headless Pac-Man behavior simulation.
//!
//! The crate models the arcade's movement and ghost-AI rules on the
//! classic 28x31 board: sub-pixel movement with center-commit turns and
//! cornering, the four ghosts' personalities and pen choreography, the
//! scatter/chase schedule with its fright overlay, and per-level tuning
//! straight from the arcade tables. There is no rendering, audio, or
//! input handling here; embedders drive [`game::Game`] one tick at a
//! time and render from its snapshots and events.
//!
//! Everything is deterministic: frightened-ghost randomness comes from a
//! seedable generator, so a seed plus an input trace replays exactly.

pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod level;
pub mod map;
pub mod systems;

pub use error::{GameError, GameResult};
pub use events::GameEvent;
pub use game::{Game, GhostView, PlayerView};
pub use map::direction::Direction;
pub use systems::components::{GhostKind, GhostMode, PenPhase};
