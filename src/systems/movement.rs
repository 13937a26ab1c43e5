//! Sub-pixel grid movement shared by the player and every ghost.
//!
//! A [`Mover`] advances along its current direction, detects tile
//! crossings and center passages, wraps through tunnels, and resolves
//! turning. Center passage is the only commit point for buffered turns;
//! turning anywhere else would visibly cut the corner. The one sanctioned
//! off-center maneuver is cornering: a pre-center perpendicular request
//! moves along both axes at once and snaps onto the new axis when the old
//! axis reaches the tile's centerline.

use bevy_ecs::component::Component;
use glam::{IVec2, Vec2};

use crate::map::builder::{pixel_to_tile, tile_center, Map};
use crate::map::direction::Direction;

/// What happened during one movement step.
#[derive(Debug, Default, Clone, Copy)]
pub struct Advance {
    /// The mover entered a new tile.
    pub crossed: bool,
    /// The mover passed its current tile's center along the travel axis.
    /// Suppressed while cornering (the passage is consumed by the turn).
    pub passed_center: bool,
}

/// Sub-pixel position tracking on the grid.
#[derive(Component, Debug, Clone)]
pub struct Mover {
    pub pixel: Vec2,
    pub tile: IVec2,
    pub direction: Direction,
    /// True from the moment the tile's center is passed until the next
    /// tile crossing.
    pub centered: bool,
    /// A buffered turn request, retried at every center passage until it
    /// succeeds or is overwritten.
    pub pending: Option<Direction>,
    cornering: Option<Direction>,
}

impl Mover {
    pub fn new(pixel: Vec2, direction: Direction) -> Self {
        let tile = pixel_to_tile(pixel);
        Mover {
            pixel,
            tile,
            direction,
            centered: pixel == tile_center(tile),
            pending: None,
            cornering: None,
        }
    }

    /// Teleports the mover onto its current tile's exact center.
    pub fn snap_to_center(&mut self) {
        self.pixel = tile_center(self.tile);
        self.centered = true;
    }

    /// Repositions the mover entirely, clearing any turning state.
    pub fn warp(&mut self, pixel: Vec2, direction: Direction) {
        *self = Mover::new(pixel, direction);
    }

    /// Advances `distance` pixels along the current direction (plus the
    /// cornering axis while a corner is in progress).
    pub fn advance(&mut self, map: &Map, distance: f32) -> Advance {
        let old = self.pixel;
        let mut delta = self.direction.as_vec2() * distance;
        if let Some(corner) = self.cornering {
            delta += corner.as_vec2() * distance;
        }
        self.pixel += delta;

        // Tunnel wraparound applies every tick, not just on crossings.
        if map.is_tunnel_row(self.tile.y) {
            self.pixel.x = map.wrap_pixel_x(self.pixel.x);
        }

        let new_tile = pixel_to_tile(self.pixel);
        let crossed = new_tile != self.tile;
        if crossed {
            self.tile = new_tile;
            self.centered = false;
        }

        let center = tile_center(self.tile);
        let passed = match self.direction {
            Direction::Right => old.x < center.x && self.pixel.x >= center.x,
            Direction::Left => old.x > center.x && self.pixel.x <= center.x,
            Direction::Down => old.y < center.y && self.pixel.y >= center.y,
            Direction::Up => old.y > center.y && self.pixel.y <= center.y,
        };

        if let Some(corner) = self.cornering {
            if passed {
                if self.direction.is_horizontal() {
                    self.pixel.x = center.x;
                } else {
                    self.pixel.y = center.y;
                }
                self.direction = corner;
                self.cornering = None;
            }
            return Advance {
                crossed,
                passed_center: false,
            };
        }

        if passed {
            self.centered = true;
        }
        Advance {
            crossed,
            passed_center: passed,
        }
    }

    /// Requests a turn with the player's acceptance rules: reversals are
    /// always immediate, an open turn commits at once when centered,
    /// an open perpendicular request before the center starts a corner,
    /// and everything else is buffered silently.
    pub fn attempt_turn(&mut self, map: &Map, dir: Direction) {
        if dir == self.direction {
            return;
        }
        if dir == self.direction.opposite() {
            self.direction = dir;
            self.pending = None;
            self.cornering = None;
            return;
        }

        let open = map
            .step(self.tile, dir)
            .is_some_and(|next| map.is_walkable(next));
        if open && self.centered {
            self.snap_to_center();
            self.direction = dir;
            self.pending = None;
        } else if open && !self.centered && self.direction.is_perpendicular(dir) {
            self.cornering = Some(dir);
            self.pending = None;
        } else {
            self.pending = Some(dir);
        }
    }

    /// Tries to commit the buffered turn at a center passage. A still
    /// blocked request stays buffered; a degenerate one is dropped.
    pub fn commit_pending(&mut self, map: &Map) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if pending == self.direction {
            self.pending = None;
            return false;
        }
        match map.step(self.tile, pending) {
            Some(next) if map.is_walkable(next) => {
                self.snap_to_center();
                self.direction = pending;
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_cornering(&self) -> bool {
        self.cornering.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BOARD_PIXEL_SIZE, RAW_BOARD};
    use pretty_assertions::assert_eq;

    fn map() -> Map {
        Map::new(RAW_BOARD).unwrap()
    }

    #[test]
    fn test_straight_advance() {
        let map = map();
        // Top-left corridor, heading right along row 1.
        let mut mover = Mover::new(tile_center(IVec2::new(3, 1)), Direction::Right);
        let adv = mover.advance(&map, 2.0);
        assert!(!adv.crossed);
        assert!(!adv.passed_center);
        assert_eq!(mover.pixel, Vec2::new(30.0, 12.0));

        let adv = mover.advance(&map, 2.5);
        assert!(adv.crossed);
        assert_eq!(mover.tile, IVec2::new(4, 1));
        assert!(!mover.centered);

        let adv = mover.advance(&map, 4.0);
        assert!(adv.passed_center);
        assert!(mover.centered);
    }

    #[test]
    fn test_center_passage_negative_axis() {
        let map = map();
        let mut mover = Mover::new(tile_center(IVec2::new(3, 1)) + Vec2::new(2.0, 0.0), Direction::Left);
        let adv = mover.advance(&map, 3.0);
        assert!(adv.passed_center);
        assert_eq!(mover.tile, IVec2::new(3, 1));
    }

    #[test]
    fn test_blocked_turn_stays_buffered() {
        let map = map();
        // Row 1 corridor: up is a wall everywhere except intersections.
        let mut mover = Mover::new(tile_center(IVec2::new(3, 1)), Direction::Right);
        mover.attempt_turn(&map, Direction::Up);
        assert_eq!(mover.pending, Some(Direction::Up));
        assert_eq!(mover.direction, Direction::Right);

        // Still blocked at the next center; request survives.
        mover.advance(&map, 8.0);
        assert!(!mover.commit_pending(&map));
        assert_eq!(mover.pending, Some(Direction::Up));
    }

    #[test]
    fn test_reversal_always_immediate() {
        let map = map();
        let mut mover = Mover::new(tile_center(IVec2::new(3, 1)) + Vec2::new(1.5, 0.0), Direction::Right);
        mover.attempt_turn(&map, Direction::Left);
        assert_eq!(mover.direction, Direction::Left);
        assert_eq!(mover.pending, None);
    }

    #[test]
    fn test_centered_turn_commits_immediately() {
        let map = map();
        // (6, 1) opens downward into the (6, 2)..(6, 4) corridor.
        let mut mover = Mover::new(tile_center(IVec2::new(6, 1)), Direction::Right);
        mover.attempt_turn(&map, Direction::Down);
        assert_eq!(mover.direction, Direction::Down);
        assert_eq!(mover.pixel, tile_center(IVec2::new(6, 1)));
    }

    #[test]
    fn test_cornering_moves_diagonally_then_snaps() {
        let map = map();
        let start = tile_center(IVec2::new(6, 1)) - Vec2::new(3.0, 0.0);
        let mut mover = Mover::new(start, Direction::Right);
        mover.attempt_turn(&map, Direction::Down);
        assert!(mover.is_cornering());

        let adv = mover.advance(&map, 2.0);
        assert!(!adv.passed_center);
        assert_eq!(mover.pixel, start + Vec2::new(2.0, 2.0));
        assert_eq!(mover.direction, Direction::Right);

        // Crossing the centerline finishes the corner and snaps x.
        mover.advance(&map, 2.0);
        assert_eq!(mover.direction, Direction::Down);
        assert_eq!(mover.pixel.x, tile_center(IVec2::new(6, 1)).x);
        assert!(!mover.is_cornering());
    }

    #[test]
    fn test_tunnel_wrap_round_trip() {
        let map = map();
        let width = BOARD_PIXEL_SIZE.x as f32;
        let start_x = 4.0;
        let mut mover = Mover::new(Vec2::new(start_x, 116.0), Direction::Left);

        // March left far enough to wrap, tracking the expected modular
        // position at every step.
        let step = 2.0;
        let mut expected = start_x;
        for _ in 0..200 {
            mover.advance(&map, step);
            expected = (expected - step).rem_euclid(width);
            assert_eq!(mover.pixel.x, expected);
        }
        // 200 steps of 2px = 400px = 224 + 176: position is congruent to
        // the pre-wrap coordinate modulo the board width.
        assert_eq!(mover.pixel.x, (start_x - 400.0).rem_euclid(width));
        assert_eq!(mover.pixel.y, 116.0);
    }

    #[test]
    fn test_wrap_preserves_tile_tracking() {
        let map = map();
        let mut mover = Mover::new(Vec2::new(1.0, 116.0), Direction::Left);
        mover.advance(&map, 2.0);
        assert_eq!(mover.pixel.x, 223.0);
        assert_eq!(mover.tile, IVec2::new(27, 14));
    }
}
