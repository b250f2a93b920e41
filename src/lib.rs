//! # Tetress Solver Library
//!
//! This library finds the cheapest sequence of piece placements that completes the
//! row or column through a target cell in single-player Tetress: an 11x11 board that
//! wraps at every edge, where red places four-cell pieces touching its own cells and
//! any completed row or column is cleared.
//!
//! It is used by three binaries:
//! - `tetress_solver`: Loads a board file and a target, runs the A* search and prints
//!   the placements.
//! - `heuristic_evaluator`: Solves seeded random boards and compares the heuristic
//!   estimate with the cost actually found.
//! - `human_player`: Allows interactive play via the command line.
//!
//! ## Modules
//! - `engine`: Coordinates, tiles, pieces, the `Board` (placement, clearing, goal test)
//!   and the interactive `Game`.
//! - `placement`: Anchor discovery and enumeration of legal placements.
//! - `heuristics`: The gap-based cost-to-go estimate.
//! - `solver`: The A* search and solution replay.
//! - `utils`: Board and coordinate parsing.
//! - `error`: Error types.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod placement;
pub mod solver;
pub mod utils;

use crate::engine::{Board, Coord};
use crate::error::InputError;
use crate::solver::{solve_astar, SearchLimits, SearchReport};

/// Searches for the cheapest way to complete the row or column through `target`.
///
/// # Returns
/// * `Ok(SearchReport)` with a `Solved` or `Unsolvable` outcome.
/// * `Err(InputError::TargetLineAlreadyComplete)` if the target's row or column is
///   already full, which leaves nothing to search for.
///
/// # Examples
/// ```
/// use tetress_solver::engine::{Board, Coord};
/// use tetress_solver::search;
/// use tetress_solver::solver::SearchOutcome;
///
/// // No red cell means no piece can ever be placed.
/// let report = search(&Board::new_empty(), Coord::new(5, 5)).unwrap();
/// assert_eq!(report.outcome, SearchOutcome::Unsolvable);
/// ```
pub fn search(board: &Board, target: Coord) -> Result<SearchReport, InputError> {
    search_with_limits(board, target, SearchLimits::default())
}

/// Like `search`, stopping with `SearchOutcome::Aborted` when a limit is reached.
pub fn search_with_limits(
    board: &Board,
    target: Coord,
    limits: SearchLimits,
) -> Result<SearchReport, InputError> {
    if board.is_goal(target) {
        return Err(InputError::TargetLineAlreadyComplete(target));
    }
    Ok(solve_astar(board, target, limits))
}
