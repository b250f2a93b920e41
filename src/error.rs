//! Error types shared by the parsing, placement and search layers.

use crate::engine::Coord;
use thiserror::Error;

/// Errors produced while reading a board description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid number of rows. Expected at most {max}, found {found}")]
    TooManyRows { max: usize, found: usize },

    #[error("Row {row} is too long. Expected at most {max} characters, found {found}")]
    RowTooLong { row: usize, max: usize, found: usize },

    #[error("Unrecognized character '{ch}' in row {row} col {col}")]
    UnrecognizedChar { ch: char, row: usize, col: usize },

    #[error("Malformed line {line}: '{text}' (expected r,c,colour)")]
    MalformedLine { line: usize, text: String },

    #[error("Coordinate ({r}, {c}) is outside the board")]
    OutOfRange { r: usize, c: usize },

    #[error("Malformed coordinate '{0}' (expected r,c)")]
    MalformedCoord(String),

    #[error("Board description is empty")]
    Empty,
}

/// Reasons a set of four coordinates cannot be placed as a piece.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("coordinate {0} appears more than once in the piece")]
    DuplicateCoord(Coord),

    #[error("piece cells are not orthogonally connected")]
    Disconnected,

    #[error("cell {0} is already occupied")]
    Occupied(Coord),

    #[error("piece does not touch any red cell")]
    NotAdjacentToOwned,
}

/// Precondition violations rejected at the search entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("the row or column through target {0} is already complete")]
    TargetLineAlreadyComplete(Coord),
}
