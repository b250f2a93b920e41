use crate::engine::{Board, Coord, Tile, BOARD_N};
use crate::error::ParseError;

fn tile_from_char(ch: char) -> Option<Tile> {
    match ch {
        'R' | 'r' => Some(Tile::Red),
        'B' | 'b' => Some(Tile::Blue),
        '.' => Some(Tile::Empty),
        _ => None,
    }
}

/// Parses an array of string slices into a `Board` object.
///
/// Each string slice in the input array represents a row on the board, starting from row 0.
/// If fewer than `BOARD_N` rows are provided, the remaining rows are empty. Similarly, if a
/// row string is shorter than `BOARD_N` characters, the rest of that row is empty.
///
/// Valid characters for tiles are:
/// - 'R' or 'r': `Tile::Red`
/// - 'B' or 'b': `Tile::Blue`
/// - '.': `Tile::Empty`
///
/// # Returns
/// * `Ok(Board)` if parsing is successful.
/// * `Err(ParseError)` if there are more than `BOARD_N` rows, a row is longer than
///   `BOARD_N` characters, or an unrecognized character is encountered.
///
/// # Examples
/// ```
/// use tetress_solver::utils::board_from_str_array;
/// use tetress_solver::engine::{Coord, Tile, BOARD_N};
///
/// let board = board_from_str_array(&["RB.", "..b"]).unwrap();
/// assert_eq!(board.get_tile(Coord::new(0, 0)), Tile::Red);
/// assert_eq!(board.get_tile(Coord::new(0, 1)), Tile::Blue);
/// assert_eq!(board.get_tile(Coord::new(1, 2)), Tile::Blue);
/// assert_eq!(board.get_tile(Coord::new(2, 0)), Tile::Empty);
///
/// assert!(board_from_str_array(&["RXB"]).is_err());
///
/// let too_many_rows = vec!["R"; BOARD_N + 1];
/// assert!(board_from_str_array(&too_many_rows).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, ParseError> {
    if s.len() > BOARD_N {
        return Err(ParseError::TooManyRows {
            max: BOARD_N,
            found: s.len(),
        });
    }

    let mut grid = [[Tile::Empty; BOARD_N]; BOARD_N];

    for (r, row_str) in s.iter().enumerate() {
        let len = row_str.chars().count();
        if len > BOARD_N {
            return Err(ParseError::RowTooLong {
                row: r,
                max: BOARD_N,
                found: len,
            });
        }

        for (c, ch) in row_str.chars().enumerate() {
            grid[r][c] =
                tile_from_char(ch).ok_or(ParseError::UnrecognizedChar { ch, row: r, col: c })?;
        }
    }
    Ok(Board::from_grid(grid))
}

/// Parses a board given as one `r,c,colour` entry per line.
///
/// `colour` is `r` (red) or `b` (blue), case-insensitive. Blank lines and lines
/// starting with `#` are skipped. Cells not mentioned are empty.
///
/// # Examples
/// ```
/// use tetress_solver::utils::board_from_csv;
/// use tetress_solver::engine::{Coord, Tile};
///
/// let board = board_from_csv("0,0,r\n# comment\n3,4,B\n").unwrap();
/// assert_eq!(board.get_tile(Coord::new(0, 0)), Tile::Red);
/// assert_eq!(board.get_tile(Coord::new(3, 4)), Tile::Blue);
/// ```
pub fn board_from_csv(content: &str) -> Result<Board, ParseError> {
    let mut board = Board::new_empty();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let malformed = || ParseError::MalformedLine {
            line: idx + 1,
            text: line.to_string(),
        };

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [r, c, colour] = fields[..] else {
            return Err(malformed());
        };
        let coord = parse_coord_parts(r, c).map_err(|err| match err {
            ParseError::MalformedCoord(_) => malformed(),
            other => other,
        })?;
        let tile = match colour {
            "r" | "R" => Tile::Red,
            "b" | "B" => Tile::Blue,
            _ => return Err(malformed()),
        };
        board.set_tile(coord, tile);
    }
    Ok(board)
}

/// Reads a board file's content in either format.
///
/// The CSV format is chosen when any non-comment line contains a comma,
/// otherwise the content is read as a character grid (blank lines ignored).
pub fn parse_board(content: &str) -> Result<Board, ParseError> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if lines.is_empty() {
        return Err(ParseError::Empty);
    }
    if lines.iter().any(|line| line.contains(',')) {
        board_from_csv(content)
    } else {
        board_from_str_array(&lines)
    }
}

/// Parses a coordinate written as `r,c`.
///
/// ```
/// use tetress_solver::utils::parse_coord;
/// use tetress_solver::engine::Coord;
/// assert_eq!(parse_coord("3,7"), Ok(Coord::new(3, 7)));
/// assert!(parse_coord("3;7").is_err());
/// assert!(parse_coord("3,70").is_err());
/// ```
pub fn parse_coord(s: &str) -> Result<Coord, ParseError> {
    match s.split_once(',') {
        Some((r, c)) => parse_coord_parts(r.trim(), c.trim()),
        None => Err(ParseError::MalformedCoord(s.to_string())),
    }
}

fn parse_coord_parts(r: &str, c: &str) -> Result<Coord, ParseError> {
    let malformed = || ParseError::MalformedCoord(format!("{},{}", r, c));
    let r: usize = r.parse().map_err(|_| malformed())?;
    let c: usize = c.parse().map_err(|_| malformed())?;
    Coord::try_new(r, c).ok_or(ParseError::OutOfRange { r, c })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_str_array_valid() {
        let board_str = [
            "RB.RB.RB.RB",
            "...........",
            "rb.rb.rb.rb",
        ];
        let board = board_from_str_array(&board_str).unwrap();
        assert_eq!(board.get_tile(Coord::new(0, 0)), Tile::Red);
        assert_eq!(board.get_tile(Coord::new(0, 10)), Tile::Blue);
        assert_eq!(board.get_tile(Coord::new(1, 0)), Tile::Empty);
        assert_eq!(board.get_tile(Coord::new(2, 3)), Tile::Red);
        assert_eq!(board.occupied_count(), 16);
    }

    #[test]
    fn test_board_from_str_array_invalid_char() {
        let result = board_from_str_array(&["RB.X"]);
        assert_eq!(
            result,
            Err(ParseError::UnrecognizedChar {
                ch: 'X',
                row: 0,
                col: 3
            })
        );
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unrecognized character 'X'"));
    }

    #[test]
    fn test_board_from_str_array_with_spaces() {
        let result = board_from_str_array(&["R B"]);
        assert!(result.unwrap_err().to_string().contains("Unrecognized character ' '"));
    }

    #[test]
    fn test_board_from_str_array_row_too_long() {
        let too_long_row = "R".repeat(BOARD_N + 1);
        let result = board_from_str_array(&[too_long_row.as_str()]);
        assert!(result.unwrap_err().to_string().contains("Row 0 is too long"));
    }

    #[test]
    fn test_board_from_str_array_too_many_rows() {
        let rows = vec!["R.........."; BOARD_N + 1];
        let result = board_from_str_array(&rows);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid number of rows"));
    }

    #[test]
    fn test_board_from_str_array_empty_input() {
        let board_str: [&str; 0] = [];
        let board = board_from_str_array(&board_str).unwrap();
        assert_eq!(board, Board::new_empty());
    }

    #[test]
    fn test_board_from_csv_errors() {
        assert_eq!(
            board_from_csv("1,2"),
            Err(ParseError::MalformedLine {
                line: 1,
                text: "1,2".to_string()
            })
        );
        assert_eq!(
            board_from_csv("\n1,2,g"),
            Err(ParseError::MalformedLine {
                line: 2,
                text: "1,2,g".to_string()
            })
        );
        assert_eq!(
            board_from_csv("11,0,r"),
            Err(ParseError::OutOfRange { r: 11, c: 0 })
        );
        assert!(matches!(
            board_from_csv("a,0,r"),
            Err(ParseError::MalformedLine { .. })
        ));
    }

    #[test]
    fn test_parse_board_detects_format() {
        let grid = parse_board("R..\n.B.\n").unwrap();
        let csv = parse_board("0,0,r\n1,1,b\n").unwrap();
        assert_eq!(grid, csv);
        assert_eq!(parse_board("\n# nothing here\n"), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord(" 4 , 10 "), Ok(Coord::new(4, 10)));
        assert_eq!(parse_coord("4,11"), Err(ParseError::OutOfRange { r: 4, c: 11 }));
        assert!(matches!(parse_coord("x,1"), Err(ParseError::MalformedCoord(_))));
    }
}
