//! End-to-end search scenarios.

use tetress_solver::engine::{Board, Coord, Line, Placement, Tile, BOARD_N, PATH_COST};
use tetress_solver::error::InputError;
use tetress_solver::heuristics::estimate_remaining_cost;
use tetress_solver::placement::{find_anchor_positions, legal_placements};
use tetress_solver::solver::{replay_solution, SearchLimits, SearchOutcome};
use tetress_solver::utils::board_from_str_array;
use tetress_solver::{search, search_with_limits};

fn guarded() -> SearchLimits {
    SearchLimits {
        max_expansions: Some(20_000),
        ..SearchLimits::default()
    }
}

#[test]
fn empty_board_is_unsolvable() {
    let board = Board::new_empty();
    let target = Coord::new(4, 6);

    assert!(find_anchor_positions(&board).is_empty());
    assert!(legal_placements(&board).is_empty());

    let report = search(&board, target).unwrap();
    assert_eq!(report.outcome, SearchOutcome::Unsolvable);
}

#[test]
fn open_row_is_filled_with_three_pieces() {
    let board = board_from_str_array(&["R"]).unwrap();
    let target = Coord::new(0, 5);

    let report = search_with_limits(&board, target, guarded()).unwrap();
    let solution = report.outcome.solution().expect("open row must be solvable");

    // Ten empty cells need at least three four-cell pieces.
    assert_eq!(solution.placements.len(), 3);
    assert_eq!(solution.cost, 3 * PATH_COST);
    assert!(estimate_remaining_cost(&board, target) <= solution.cost);

    let replayed = replay_solution(&board, target, &solution.placements).unwrap();
    assert_eq!(replayed, solution.final_board);
    assert!(replayed.is_line_complete(Line::Row(0)));
}

#[test]
fn column_goal_is_found_when_cheaper() {
    // Column 3 is blue except rows 1..=4 and the red cell at row 5.
    let mut board = Board::new_empty();
    for r in 0..BOARD_N {
        board.set_tile(Coord::new(r, 3), Tile::Blue);
    }
    for r in 1..=4 {
        board.set_tile(Coord::new(r, 3), Tile::Empty);
    }
    board.set_tile(Coord::new(5, 3), Tile::Red);
    let target = Coord::new(0, 3);

    let report = search(&board, target).unwrap();
    let solution = report.outcome.solution().unwrap();
    let expected = Placement::new([
        Coord::new(1, 3),
        Coord::new(2, 3),
        Coord::new(3, 3),
        Coord::new(4, 3),
    ])
    .unwrap();
    assert_eq!(solution.placements, vec![expected]);
    assert!(solution.final_board.is_line_complete(Line::Column(3)));
}

#[test]
fn repeated_searches_agree() {
    let board = board_from_str_array(&[
        "RBBBBB.....",
        "...........",
        "..B........",
    ])
    .unwrap();
    let target = Coord::new(0, 2);

    let first = search_with_limits(&board, target, guarded()).unwrap();
    let second = search_with_limits(&board, target, guarded()).unwrap();
    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first.stats.nodes_expanded, second.stats.nodes_expanded);
}

#[test]
fn solution_cost_matches_placement_count() {
    let board = board_from_str_array(&[
        "...........",
        "R..B.......",
        "...........",
    ])
    .unwrap();
    let target = Coord::new(1, 3);

    let report = search_with_limits(&board, target, guarded()).unwrap();
    if let SearchOutcome::Solved(solution) = &report.outcome {
        assert_eq!(solution.cost, PATH_COST * solution.placements.len() as u32);
        let replayed = replay_solution(&board, target, &solution.placements).unwrap();
        assert!(replayed.is_goal(target));
    } else {
        panic!("expected a solution, got {:?}", report.outcome);
    }
}

#[test]
fn completed_target_line_is_rejected() {
    let board = board_from_str_array(&["RBBBBBBBBBB"]).unwrap();
    let target = Coord::new(0, 9);
    assert_eq!(
        search(&board, target),
        Err(InputError::TargetLineAlreadyComplete(target))
    );
}

#[test]
fn input_board_is_not_modified() {
    let board = board_from_str_array(&["RBBBBBB...."]).unwrap();
    let before = board.clone();
    let report = search(&board, Coord::new(0, 1)).unwrap();
    assert!(report.outcome.solution().is_some());
    assert_eq!(board, before);
}
