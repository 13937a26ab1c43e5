//! Map construction: tile matrix, turn table, and tunnel topology.
//!
//! The [`Map`] is built once from the raw board text and is read-only for
//! the rest of the process. Its turn table — the per-tile set of legal
//! exit directions — is the single source of truth for "which ways can an
//! entity turn here"; movement code never re-derives it from wall checks.

use bevy_ecs::resource::Resource;
use glam::{IVec2, Vec2};
use std::collections::VecDeque;
use tracing::debug;

use crate::constants::{BOARD_CELL_SIZE, BOARD_PIXEL_SIZE, CELL_SIZE, TUNNEL_ZONE_COLS};
use crate::error::{GameResult, MapError};
use crate::map::direction::{Direction, DirectionSet, DIRECTIONS};
use crate::map::parser::{parse_board, BoardTile};

/// The kind of pellet a tile spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PelletKind {
    Pellet,
    PowerPellet,
}

/// Returns the pixel coordinates of a tile's center.
pub fn tile_center(tile: IVec2) -> Vec2 {
    (tile * CELL_SIZE as i32).as_vec2() + Vec2::splat(CELL_SIZE as f32 / 2.0)
}

/// Returns the tile containing a pixel position.
pub fn pixel_to_tile(pixel: Vec2) -> IVec2 {
    IVec2::new(
        (pixel.x / CELL_SIZE as f32).floor() as i32,
        (pixel.y / CELL_SIZE as f32).floor() as i32,
    )
}

/// The static board topology, shared by every moving entity.
#[derive(Resource, Debug)]
pub struct Map {
    /// Tile matrix, indexed `[col][row]`.
    tiles: Vec<Vec<BoardTile>>,
    /// Legal exit directions per tile, indexed `[col][row]`.
    turns: Vec<Vec<DirectionSet>>,
    /// Rows that wrap horizontally.
    tunnel_rows: Vec<i32>,
    /// The player's starting tile.
    player_start: IVec2,
    /// Every pellet spawn on the board.
    pellets: Vec<(IVec2, PelletKind)>,
}

impl Map {
    /// Builds the map from a raw board layout.
    ///
    /// Walkable cells that cannot be reached from the player start (the
    /// decorative voids outside the maze outline) are normalized to
    /// walls, which makes the connectivity invariant hold by
    /// construction. A pellet sitting on such a cell indicates a corrupt
    /// board and is an error.
    pub fn new(raw_board: [&str; BOARD_CELL_SIZE.y as usize]) -> GameResult<Self> {
        let parsed = parse_board(raw_board)?;
        let (cols, rows) = (BOARD_CELL_SIZE.x as usize, BOARD_CELL_SIZE.y as usize);

        let tunnel_rows: Vec<i32> = {
            let mut ys: Vec<i32> = parsed.tunnel_ends.iter().map(|t| t.y).collect();
            ys.sort_unstable();
            ys.dedup();
            ys
        };

        let mut tiles = parsed.tiles;
        let start = parsed.player_start;
        if !tiles[start.x as usize][start.y as usize].is_walkable() {
            return Err(MapError::BlockedPlayerStart { x: start.x, y: start.y }.into());
        }

        // Flood fill from the player start, wrapping through tunnels.
        let mut reached = vec![vec![false; rows]; cols];
        let mut frontier = VecDeque::from([start]);
        reached[start.x as usize][start.y as usize] = true;
        while let Some(tile) = frontier.pop_front() {
            for dir in DIRECTIONS {
                let Some(next) = step_raw(tile, dir, &tunnel_rows) else {
                    continue;
                };
                if !reached[next.x as usize][next.y as usize] && tiles[next.x as usize][next.y as usize].is_walkable() {
                    reached[next.x as usize][next.y as usize] = true;
                    frontier.push_back(next);
                }
            }
        }

        let mut pellets = Vec::new();
        let mut normalized = 0usize;
        for x in 0..cols {
            for y in 0..rows {
                let tile = tiles[x][y];
                let is_reached = reached[x][y];
                match tile {
                    BoardTile::Pellet if is_reached => pellets.push((IVec2::new(x as i32, y as i32), PelletKind::Pellet)),
                    BoardTile::PowerPellet if is_reached => {
                        pellets.push((IVec2::new(x as i32, y as i32), PelletKind::PowerPellet))
                    }
                    BoardTile::Pellet | BoardTile::PowerPellet => {
                        return Err(MapError::UnreachablePellet { x: x as i32, y: y as i32 }.into())
                    }
                    _ => {}
                }
                if tile.is_walkable() && !is_reached {
                    tiles[x][y] = BoardTile::Wall;
                    normalized += 1;
                }
            }
        }
        debug!(pellets = pellets.len(), normalized, "board normalized");

        // Precompute the turn table from the normalized tiles.
        let mut turns = vec![vec![DirectionSet::empty(); rows]; cols];
        for x in 0..cols {
            for y in 0..rows {
                if !tiles[x][y].is_walkable() {
                    continue;
                }
                let tile = IVec2::new(x as i32, y as i32);
                let mut exits = DirectionSet::empty();
                for dir in DIRECTIONS {
                    if let Some(next) = step_raw(tile, dir, &tunnel_rows) {
                        if tiles[next.x as usize][next.y as usize].is_walkable() {
                            exits |= DirectionSet::from(dir);
                        }
                    }
                }
                turns[x][y] = exits;
            }
        }

        Ok(Map {
            tiles,
            turns,
            tunnel_rows,
            player_start: start,
            pellets,
        })
    }

    fn in_bounds(tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < BOARD_CELL_SIZE.x as i32 && tile.y < BOARD_CELL_SIZE.y as i32
    }

    /// Returns the tile kind at a position. Out-of-range queries are a
    /// precondition violation and panic.
    pub fn at(&self, tile: IVec2) -> BoardTile {
        assert!(Self::in_bounds(tile), "tile query out of bounds: {tile}");
        self.tiles[tile.x as usize][tile.y as usize]
    }

    pub fn is_wall(&self, tile: IVec2) -> bool {
        !self.at(tile).is_walkable()
    }

    pub fn is_walkable(&self, tile: IVec2) -> bool {
        self.at(tile).is_walkable()
    }

    /// Whether a row wraps horizontally.
    pub fn is_tunnel_row(&self, y: i32) -> bool {
        self.tunnel_rows.contains(&y)
    }

    /// Whether a tile lies in a tunnel slow zone (the outer columns of a
    /// tunnel row).
    pub fn is_tunnel(&self, tile: IVec2) -> bool {
        assert!(Self::in_bounds(tile), "tile query out of bounds: {tile}");
        self.is_tunnel_row(tile.y) && (tile.x < TUNNEL_ZONE_COLS || tile.x >= BOARD_CELL_SIZE.x as i32 - TUNNEL_ZONE_COLS)
    }

    /// The legal exit directions at a tile, from the precomputed table.
    pub fn exits(&self, tile: IVec2) -> DirectionSet {
        assert!(Self::in_bounds(tile), "tile query out of bounds: {tile}");
        self.turns[tile.x as usize][tile.y as usize]
    }

    /// Whether entities must pick a direction at this tile: more than one
    /// exit, and not a single straight-through pair.
    pub fn is_intersection(&self, tile: IVec2) -> bool {
        let exits = self.exits(tile);
        exits.count() >= 2 && !exits.is_straight_pair()
    }

    /// Steps one tile in a direction, wrapping horizontally on tunnel
    /// rows. Returns `None` when the step leaves the board.
    pub fn step(&self, tile: IVec2, dir: Direction) -> Option<IVec2> {
        step_raw(tile, dir, &self.tunnel_rows)
    }

    /// Wraps a horizontal pixel coordinate around the board. Applied to
    /// entities every tick while they travel a tunnel row.
    pub fn wrap_pixel_x(&self, x: f32) -> f32 {
        x.rem_euclid(BOARD_PIXEL_SIZE.x as f32)
    }

    pub fn player_start(&self) -> IVec2 {
        self.player_start
    }

    /// Every pellet spawn on the board, in board order.
    pub fn pellets(&self) -> &[(IVec2, PelletKind)] {
        &self.pellets
    }
}

fn step_raw(tile: IVec2, dir: Direction, tunnel_rows: &[i32]) -> Option<IVec2> {
    let mut next = tile + dir.as_ivec2();
    let width = BOARD_CELL_SIZE.x as i32;
    if tunnel_rows.contains(&next.y) && (next.x < 0 || next.x >= width) {
        next.x = next.x.rem_euclid(width);
    }
    Map::in_bounds(next).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RAW_BOARD;
    use pretty_assertions::assert_eq;

    fn map() -> Map {
        Map::new(RAW_BOARD).unwrap()
    }

    #[test]
    fn test_turn_table_containment() {
        // Every exit in the turn table must lead to a walkable tile.
        let map = map();
        for x in 0..BOARD_CELL_SIZE.x as i32 {
            for y in 0..BOARD_CELL_SIZE.y as i32 {
                let tile = IVec2::new(x, y);
                for dir in map.exits(tile).iter_directions() {
                    let next = map.step(tile, dir).expect("exit leads off the board");
                    assert!(map.is_walkable(next), "exit {dir:?} from {tile} hits a wall");
                }
            }
        }
    }

    #[test]
    fn test_walkable_tiles_have_exits() {
        // The normalized board has no isolated or dead-end cells.
        let map = map();
        for x in 0..BOARD_CELL_SIZE.x as i32 {
            for y in 0..BOARD_CELL_SIZE.y as i32 {
                let tile = IVec2::new(x, y);
                if map.is_walkable(tile) {
                    assert!(map.exits(tile).count() >= 2, "dead end at {tile}");
                }
            }
        }
    }

    #[test]
    fn test_void_cells_normalized() {
        let map = map();
        // The decorative void beside the maze shoulder and the sealed pen
        // interior are unreachable, so they become walls.
        assert!(map.is_wall(IVec2::new(0, 10)));
        assert!(map.is_wall(IVec2::new(13, 14)));
    }

    #[test]
    fn test_intersection_classification() {
        let map = map();
        // Open plaza tile with four exits.
        assert!(map.is_intersection(IVec2::new(6, 5)));
        // Straight corridor.
        assert!(!map.is_intersection(IVec2::new(1, 2)));
        // Corner bend: two exits, but not collinear.
        assert!(map.is_intersection(IVec2::new(1, 1)));
    }

    #[test]
    fn test_tunnel_wrapping_steps() {
        let map = map();
        let left_end = IVec2::new(0, 14);
        let right_end = IVec2::new(27, 14);
        assert_eq!(map.step(left_end, Direction::Left), Some(right_end));
        assert_eq!(map.step(right_end, Direction::Right), Some(left_end));
        assert!(map.exits(left_end).has(Direction::Left));
        assert!(map.exits(right_end).has(Direction::Right));
    }

    #[test]
    fn test_tunnel_slow_zone() {
        let map = map();
        assert!(map.is_tunnel(IVec2::new(2, 14)));
        assert!(map.is_tunnel(IVec2::new(25, 14)));
        assert!(!map.is_tunnel(IVec2::new(10, 14)));
        assert!(!map.is_tunnel(IVec2::new(2, 5)));
    }

    #[test]
    fn test_wrap_pixel_x() {
        let map = map();
        assert_eq!(map.wrap_pixel_x(230.0), 6.0);
        assert_eq!(map.wrap_pixel_x(-3.0), 221.0);
        assert_eq!(map.wrap_pixel_x(100.0), 100.0);
    }

    #[test]
    fn test_pellet_census() {
        let map = map();
        let power = map
            .pellets()
            .iter()
            .filter(|(_, k)| *k == PelletKind::PowerPellet)
            .count();
        assert_eq!(power, 4);
        assert!(map.pellets().len() > 200, "suspiciously sparse board");
        for (tile, _) in map.pellets() {
            assert!(map.is_walkable(*tile));
        }
    }

    #[test]
    fn test_tile_geometry() {
        assert_eq!(tile_center(IVec2::new(0, 0)), Vec2::new(4.0, 4.0));
        assert_eq!(tile_center(IVec2::new(13, 23)), Vec2::new(108.0, 188.0));
        assert_eq!(pixel_to_tile(Vec2::new(108.0, 188.0)), IVec2::new(13, 23));
        assert_eq!(pixel_to_tile(Vec2::new(111.9, 92.0)), IVec2::new(13, 11));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_range_query_panics() {
        map().at(IVec2::new(99, 2));
    }
}
