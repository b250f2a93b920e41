//! Enumeration of legal piece placements.
//!
//! A piece may only be placed on empty cells and must touch a red cell. Enumeration
//! therefore starts from the anchors (empty cells next to red cells) and grows every
//! connected four-cell shape that contains an anchor.
use crate::engine::{Board, Coord, Placement, Tile, PIECE_SIZE};
use crate::error::PlacementError;
use log::trace;
use rustc_hash::FxHashSet;

/// Finds the empty cells orthogonally adjacent to at least one red cell.
///
/// Anchors are returned once each, in discovery order: red cells row-major,
/// then their neighbours in `Direction::ALL` order. An empty result means the
/// red side cannot place anything.
pub fn find_anchor_positions(board: &Board) -> Vec<Coord> {
    let mut seen = FxHashSet::default();
    let mut anchors = Vec::new();

    for red in board.red_cells() {
        for neighbor in red.neighbors() {
            if board.is_empty_at(neighbor) && seen.insert(neighbor) {
                anchors.push(neighbor);
            }
        }
    }
    anchors
}

/// Enumerates every placement of `PIECE_SIZE` connected empty cells that contains `anchor`.
///
/// The shape is grown one cell at a time. At each step the candidates are the empty
/// neighbours of *any* cell already in the shape, so bends and T-junctions are reached
/// as well as straight runs. Completed shapes are canonicalised and deduplicated, since
/// different growth orders produce the same piece.
///
/// Returns an empty vector if `anchor` itself is occupied or no four-cell extension fits.
pub fn find_all_placements(anchor: Coord, board: &Board) -> Vec<Placement> {
    let mut placements = Vec::new();
    if !board.is_empty_at(anchor) {
        return placements;
    }

    let mut recorded = FxHashSet::default();
    let mut path = [anchor; PIECE_SIZE];
    extend_path(board, &mut path, 1, &mut recorded, &mut placements);
    placements
}

fn extend_path(
    board: &Board,
    path: &mut [Coord; PIECE_SIZE],
    len: usize,
    recorded: &mut FxHashSet<Placement>,
    placements: &mut Vec<Placement>,
) {
    if len == PIECE_SIZE {
        let placement = Placement::from_cells(*path);
        if recorded.insert(placement.clone()) {
            placements.push(placement);
        }
        return;
    }

    for candidate in expansion_candidates(board, &path[..len]) {
        path[len] = candidate;
        extend_path(board, path, len + 1, recorded, placements);
    }
}

// Union of the empty neighbours of every cell in the partial shape.
fn expansion_candidates(board: &Board, path: &[Coord]) -> Vec<Coord> {
    let mut candidates = Vec::with_capacity(4 * path.len());
    for cell in path {
        for neighbor in cell.neighbors() {
            if board.is_empty_at(neighbor)
                && !path.contains(&neighbor)
                && !candidates.contains(&neighbor)
            {
                candidates.push(neighbor);
            }
        }
    }
    candidates
}

/// Collects the placements reachable from every anchor of `board`.
///
/// A placement that touches several anchors is reported once, at the position where
/// it was first found, so the result order is deterministic for a given board.
pub fn legal_placements(board: &Board) -> Vec<Placement> {
    let anchors = find_anchor_positions(board);
    let mut seen = FxHashSet::default();
    let mut placements = Vec::new();

    for &anchor in &anchors {
        for placement in find_all_placements(anchor, board) {
            if seen.insert(placement.clone()) {
                placements.push(placement);
            }
        }
    }
    trace!(
        "{} anchors produced {} distinct placements",
        anchors.len(),
        placements.len()
    );
    placements
}

/// Checks that `placement` can be made on `board` by the red side.
///
/// # Returns
/// * `Err(PlacementError::Occupied)` for the first (row-major) occupied cell.
/// * `Err(PlacementError::NotAdjacentToOwned)` if no cell touches a red cell.
/// * `Ok(())` otherwise.
pub fn check_placement(board: &Board, placement: &Placement) -> Result<(), PlacementError> {
    if let Some(&occupied) = placement
        .coords()
        .iter()
        .find(|&&coord| !board.is_empty_at(coord))
    {
        return Err(PlacementError::Occupied(occupied));
    }

    let touches_red = placement.coords().iter().any(|coord| {
        coord
            .neighbors()
            .iter()
            .any(|&n| board.get_tile(n) == Tile::Red)
    });
    if !touches_red {
        return Err(PlacementError::NotAdjacentToOwned);
    }
    Ok(())
}

pub fn is_legal_placement(board: &Board, placement: &Placement) -> bool {
    check_placement(board, placement).is_ok()
}
