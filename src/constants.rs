//! This module contains all the constants used in the simulation.

use glam::{IVec2, UVec2, Vec2};

/// The size of each cell, in pixels.
pub const CELL_SIZE: u32 = 8;
/// The size of the game board, in cells.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(28, 31);
/// The size of the game board, in pixels.
pub const BOARD_PIXEL_SIZE: UVec2 = UVec2::new(BOARD_CELL_SIZE.x * CELL_SIZE, BOARD_CELL_SIZE.y * CELL_SIZE);

/// Longest time slice a single tick is allowed to consume, in seconds.
///
/// A stalled frame (tab switch, debugger pause) must never step an entity
/// across more than a fraction of a tile, so the delta fed to the schedule
/// is clamped to this value.
pub const MAX_TICK_SECONDS: f32 = 1.0 / 30.0;

/// Pixel distance covered per second at a 100% speed rating.
///
/// All per-level speed entries are percentages of this value.
pub const FULL_SPEED: f32 = 75.757_576;

/// Speed multiplier for eyes returning to the pen.
pub const EYES_SPEED_FACTOR: f32 = 1.5;

/// Speed rating used while traversing a scripted pen path.
pub const PEN_PATH_SPEED: f32 = 0.40 * FULL_SPEED;

/// Seconds the eat-slowdown window stays open after a pellet is consumed.
pub const EAT_SLOWDOWN_SECONDS: f32 = 1.0 / 12.0;

/// Seconds between blink toggles at the end of Frighten mode.
pub const FRIGHT_BLINK_INTERVAL: f32 = 0.2;

/// Number of columns at each end of a tunnel row that count as the tunnel
/// slow zone.
pub const TUNNEL_ZONE_COLS: i32 = 6;

/// The tile just outside the pen door. Eyes navigate here; reaching it
/// flips a ghost into its scripted entry path.
pub const PEN_DOORWAY_TILE: IVec2 = IVec2::new(13, 11);

/// Pixel position of the pen mouth (the center of [`PEN_DOORWAY_TILE`]).
pub const PEN_MOUTH: Vec2 = Vec2::new(108.0, 92.0);

/// Scripted pen exit paths, indexed by ghost id. The first waypoint is the
/// ghost's seat inside the pen; the last is the pen mouth. These pixel
/// waypoints mirror the fixed pen geometry of the board and are data, not
/// derived values.
pub const PEN_EXIT_PATHS: [&[Vec2]; 4] = [
    // Blinky re-enters through the center seat after being eaten.
    &[Vec2::new(108.0, 116.0), PEN_MOUTH],
    &[Vec2::new(108.0, 116.0), PEN_MOUTH],
    &[Vec2::new(92.0, 116.0), Vec2::new(108.0, 116.0), PEN_MOUTH],
    &[Vec2::new(132.0, 116.0), Vec2::new(108.0, 116.0), PEN_MOUTH],
];

/// Fixed scatter-corner target tiles, indexed by ghost id.
pub const SCATTER_TARGETS: [IVec2; 4] = [
    IVec2::new(25, 0),
    IVec2::new(2, 0),
    IVec2::new(27, 30),
    IVec2::new(0, 30),
];

/// Tile radius of Clyde's shyness circle. Beyond it he chases the player
/// directly; inside it he retreats to his scatter corner.
pub const CLYDE_SHYNESS_TILES: i32 = 8;

/// Dot milestones for the global pen counter, indexed by ghost id. The
/// first three release the head of the waiting queue; the last switches
/// the controller back to the per-ghost policy.
pub const GLOBAL_PEN_MILESTONES: [u32; 4] = [0, 7, 17, 32];

/// The raw layout of the game board, as a 2D array of characters.
///
/// `#` wall, `.` pellet, `o` power pellet, `T` tunnel end, `=` pen door,
/// `P` player start, space for open floor (cells unreachable from the
/// player start are normalized to walls when the map is built).
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###==### ##.#     ",
    "######.## #      # ##.######",
    "T     .   #      #   .     T",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......P .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];
