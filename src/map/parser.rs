//! Board parsing functionality for converting raw layouts into structured data.

use crate::constants::BOARD_CELL_SIZE;
use crate::error::ParseError;
use glam::IVec2;

/// An enum representing the different kinds of tiles on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardTile {
    /// Open floor with nothing on it.
    Empty,
    /// A wall tile.
    Wall,
    /// Open floor carrying a regular pellet.
    Pellet,
    /// Open floor carrying a power pellet.
    PowerPellet,
    /// A tunnel mouth at the board edge.
    Tunnel,
    /// A pen door cell. Blocks normal movement; scripted pen paths pass
    /// over it.
    Door,
}

impl BoardTile {
    /// Whether entities can occupy this tile during normal grid movement.
    pub fn is_walkable(self) -> bool {
        !matches!(self, BoardTile::Wall | BoardTile::Door)
    }
}

/// Represents the parsed data from a raw board layout.
#[derive(Debug)]
pub struct ParsedBoard {
    /// The parsed tile layout, indexed `[col][row]`.
    pub tiles: Vec<Vec<BoardTile>>,
    /// The positions of the pen door cells.
    pub door: [IVec2; 2],
    /// The positions of the tunnel end cells.
    pub tunnel_ends: Vec<IVec2>,
    /// The player's starting tile.
    pub player_start: IVec2,
}

/// Parses a single character into a board tile.
///
/// Returns the parsed tile, or an error if the character is unknown.
pub fn parse_character(c: char) -> Result<BoardTile, ParseError> {
    match c {
        '#' => Ok(BoardTile::Wall),
        '.' => Ok(BoardTile::Pellet),
        'o' => Ok(BoardTile::PowerPellet),
        ' ' => Ok(BoardTile::Empty),
        'T' => Ok(BoardTile::Tunnel),
        '=' => Ok(BoardTile::Door),
        'P' => Ok(BoardTile::Empty), // player start marker, floor underneath
        _ => Err(ParseError::UnknownCharacter(c)),
    }
}

/// Parses a raw board layout into structured board data.
///
/// # Errors
///
/// Returns an error if the board contains unknown characters, if the pen
/// door is not exactly two `=` cells, if the player start marker is not
/// unique, or if the tunnel ends do not pair up.
pub fn parse_board(raw_board: [&str; BOARD_CELL_SIZE.y as usize]) -> Result<ParsedBoard, ParseError> {
    let (cols, rows) = (BOARD_CELL_SIZE.x as usize, BOARD_CELL_SIZE.y as usize);
    let mut tiles = vec![vec![BoardTile::Empty; rows]; cols];
    let mut door = Vec::with_capacity(2);
    let mut tunnel_ends = Vec::new();
    let mut player_starts = Vec::new();

    for (y, line) in raw_board.iter().enumerate().take(rows) {
        for (x, character) in line.chars().enumerate().take(cols) {
            let tile = parse_character(character)?;

            match tile {
                BoardTile::Tunnel => tunnel_ends.push(IVec2::new(x as i32, y as i32)),
                BoardTile::Door => door.push(IVec2::new(x as i32, y as i32)),
                _ => {}
            }
            if character == 'P' {
                player_starts.push(IVec2::new(x as i32, y as i32));
            }

            tiles[x][y] = tile;
        }
    }

    if door.len() != 2 {
        return Err(ParseError::InvalidDoorCount(door.len()));
    }
    if player_starts.len() != 1 {
        return Err(ParseError::InvalidPlayerStartCount(player_starts.len()));
    }
    if tunnel_ends.is_empty() || tunnel_ends.len() % 2 != 0 {
        return Err(ParseError::InvalidTunnelEndCount(tunnel_ends.len()));
    }

    Ok(ParsedBoard {
        tiles,
        door: [door[0], door[1]],
        tunnel_ends,
        player_start: player_starts[0],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RAW_BOARD;

    #[test]
    fn test_parse_character() {
        assert!(matches!(parse_character('#').unwrap(), BoardTile::Wall));
        assert!(matches!(parse_character('.').unwrap(), BoardTile::Pellet));
        assert!(matches!(parse_character('o').unwrap(), BoardTile::PowerPellet));
        assert!(matches!(parse_character(' ').unwrap(), BoardTile::Empty));
        assert!(matches!(parse_character('T').unwrap(), BoardTile::Tunnel));
        assert!(matches!(parse_character('=').unwrap(), BoardTile::Door));
        assert!(matches!(parse_character('P').unwrap(), BoardTile::Empty));
        assert!(parse_character('Z').is_err());
    }

    #[test]
    fn test_parse_board() {
        let parsed = parse_board(RAW_BOARD).unwrap();

        assert_eq!(parsed.tiles.len(), 28);
        assert_eq!(parsed.tiles[0].len(), 31);
        assert_eq!(parsed.door, [IVec2::new(13, 12), IVec2::new(14, 12)]);
        assert_eq!(parsed.tunnel_ends.len(), 2);
        assert_eq!(parsed.player_start, IVec2::new(13, 23));
    }

    #[test]
    fn test_parse_board_invalid_character() {
        let mut invalid_board = RAW_BOARD;
        invalid_board[1] = "#...........Z##............#";

        let result = parse_board(invalid_board);
        assert!(matches!(result.unwrap_err(), ParseError::UnknownCharacter('Z')));
    }

    #[test]
    fn test_parse_board_missing_door() {
        let mut invalid_board = RAW_BOARD;
        invalid_board[12] = "     #.## ######## ##.#     ";

        let result = parse_board(invalid_board);
        assert!(matches!(result.unwrap_err(), ParseError::InvalidDoorCount(0)));
    }

    #[test]
    fn test_walkability() {
        assert!(BoardTile::Pellet.is_walkable());
        assert!(BoardTile::Tunnel.is_walkable());
        assert!(BoardTile::Empty.is_walkable());
        assert!(!BoardTile::Wall.is_walkable());
        assert!(!BoardTile::Door.is_walkable());
    }
}
