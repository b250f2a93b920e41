//! Cost-to-go estimate for reaching the target line.
//!
//! The estimate looks at the row and the column through the target separately.
//! For each axis it adds how far the nearest red cell is from that line to the
//! cost of filling the empty runs ("gaps") along the line, and returns the cheaper
//! axis. The estimate is meant as a lower bound but is not proven admissible: the
//! bridging rule in `gap_cost` can overestimate on some boards.
use crate::engine::{wrap_distance, Board, Coord, Line, BOARD_N, PIECE_SIZE};

/// Distance used for both axes when the board has no red cell.
pub const LARGEST_DISTANCE: usize = 2 * BOARD_N;

/// Returns `(row_distance, col_distance)`: the smallest wrap-aware distance from any red
/// cell to the target's row and to the target's column.
///
/// Both values are `LARGEST_DISTANCE` when there are no red cells.
pub fn axis_distances(board: &Board, target: Coord) -> (usize, usize) {
    let mut row_distance = LARGEST_DISTANCE;
    let mut col_distance = LARGEST_DISTANCE;

    for red in board.red_cells() {
        row_distance = row_distance.min(wrap_distance(red.r(), target.r()));
        col_distance = col_distance.min(wrap_distance(red.c(), target.c()));
    }
    (row_distance, col_distance)
}

/// Splits `line` into maximal runs of empty cells and returns their lengths.
///
/// The line is circular, so a run may continue from the last cell back to the first.
/// Runs are listed starting after the first occupied cell of the line. A completely
/// empty line is a single run of `BOARD_N`; a complete line has no runs.
///
/// # Examples
/// ```
/// use tetress_solver::engine::Line;
/// use tetress_solver::heuristics::find_gaps;
/// use tetress_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["...B...B..."]).unwrap();
/// assert_eq!(find_gaps(&board, Line::Row(0)), vec![3, 6]);
/// ```
pub fn find_gaps(board: &Board, line: Line) -> Vec<usize> {
    let cells: Vec<Coord> = line.cells().collect();
    let Some(start) = cells
        .iter()
        .position(|&cell| board.get_tile(cell).is_occupied())
    else {
        return vec![BOARD_N];
    };

    let mut gaps = Vec::new();
    let mut run = 0;
    // The final step lands back on `start`, which flushes the last run.
    for offset in 1..=BOARD_N {
        let cell = cells[(start + offset) % BOARD_N];
        if board.is_empty_at(cell) {
            run += 1;
        } else if run > 0 {
            gaps.push(run);
            run = 0;
        }
    }
    gaps
}

/// Cost charged for filling one gap.
///
/// * A gap of at least `PIECE_SIZE` cells costs its length (pieces tile it densely).
/// * A shorter gap costs a whole piece, `PIECE_SIZE`, unless `gap + distance == PIECE_SIZE`.
///   In that case the piece that brings red to the line also fills the gap, and the
///   distance term already pays for the rest, so the gap costs its length.
pub fn gap_cost(gap: usize, distance: usize) -> u32 {
    if gap >= PIECE_SIZE || gap + distance == PIECE_SIZE {
        gap as u32
    } else {
        PIECE_SIZE as u32
    }
}

/// Sum of `gap_cost` over every gap of `line`.
pub fn line_fill_cost(board: &Board, line: Line, distance: usize) -> u32 {
    find_gaps(board, line)
        .into_iter()
        .map(|gap| gap_cost(gap, distance))
        .sum()
}

/// Estimates the remaining cost to fill the row or the column through `target`.
///
/// Returns 0 whenever the goal already holds, otherwise
/// `min(row_fill + row_distance, col_fill + col_distance)`.
pub fn estimate_remaining_cost(board: &Board, target: Coord) -> u32 {
    if board.is_goal(target) {
        return 0;
    }

    let (row_distance, col_distance) = axis_distances(board, target);
    let row_cost = line_fill_cost(board, Line::Row(target.r()), row_distance) + row_distance as u32;
    let col_cost =
        line_fill_cost(board, Line::Column(target.c()), col_distance) + col_distance as u32;
    row_cost.min(col_cost)
}
