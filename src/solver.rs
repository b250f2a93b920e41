//! Best-first (A*) search for the cheapest sequence of placements that completes
//! the row or column through the target.
//!
//! Nodes live in an arena (`Vec<SearchNode>`) and refer to their parent by index, so
//! rebuilding a solution is a walk over indices. The frontier is a binary heap ordered
//! by `cost + estimate`, ties going to the node inserted first.
use crate::engine::{Board, Coord, Game, Placement, PATH_COST};
use crate::error::PlacementError;
use crate::heuristics::estimate_remaining_cost;
use crate::placement::legal_placements;
use log::{debug, trace};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// Optional bounds on a search. The default is unlimited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Stop after this many node expansions.
    pub max_expansions: Option<usize>,
    /// Stop once the frontier holds this many entries.
    pub max_frontier: Option<usize>,
    /// Stop once this much wall-clock time has passed.
    pub time_limit: Option<Duration>,
}

/// Which limit stopped an unfinished search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    ExpansionLimit,
    FrontierLimit,
    TimeLimit,
}

/// Represents a solution found by the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Placements to make, in order.
    pub placements: Vec<Placement>,
    /// Total cost, always `PATH_COST * placements.len()`.
    pub cost: u32,
    /// Board after the last placement; the target line is complete on it.
    pub final_board: Board,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved(Solution),
    /// Every reachable placement sequence was explored without completing the target line.
    Unsolvable,
    /// A `SearchLimits` bound was hit first; nothing is known about solvability.
    Aborted(AbortReason),
}

impl SearchOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}

/// Counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub nodes_generated: usize,
    /// Children dropped because their placement set had already been queued.
    pub duplicates_skipped: usize,
    pub max_frontier_len: usize,
    pub elapsed: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// Progress notifications passed to the observer of `solve_astar_with_observer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    Expanded {
        depth: usize,
        cost: u32,
        priority: u32,
        frontier_len: usize,
    },
    GoalReached {
        depth: usize,
        cost: u32,
    },
}

struct SearchNode {
    board: Board,
    cost: u32,
    depth: usize,
    parent: Option<usize>,
    // None only for the root.
    placement: Option<Placement>,
}

#[derive(Debug, PartialEq, Eq)]
struct FrontierEntry {
    priority: u32,
    seq: u64,
    node: usize,
}

// BinaryHeap is a max-heap, so both keys compare reversed.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Runs A* from `initial_board` until the target's row or column is complete.
///
/// # Arguments
/// * `initial_board`: The board to start from. It is never modified.
/// * `target`: The cell whose row or column must be filled.
/// * `limits`: Optional expansion, frontier and time bounds.
///
/// # Returns
/// A `SearchReport` with the outcome and the search counters. Running out of
/// nodes is reported as `SearchOutcome::Unsolvable`, hitting a limit as
/// `SearchOutcome::Aborted`.
pub fn solve_astar(initial_board: &Board, target: Coord, limits: SearchLimits) -> SearchReport {
    solve_astar_with_observer(initial_board, target, limits, |_| {})
}

/// Same as `solve_astar`, calling `observer` on every expansion and on success.
pub fn solve_astar_with_observer<F>(
    initial_board: &Board,
    target: Coord,
    limits: SearchLimits,
    mut observer: F,
) -> SearchReport
where
    F: FnMut(&SearchEvent),
{
    let started_at = Instant::now();
    let mut stats = SearchStats::default();

    let mut nodes = vec![SearchNode {
        board: initial_board.clone(),
        cost: 0,
        depth: 0,
        parent: None,
        placement: None,
    }];
    let mut seen: FxHashSet<Vec<Coord>> = FxHashSet::default();
    seen.insert(Vec::new());

    let mut frontier = BinaryHeap::new();
    let mut next_seq = 0u64;
    frontier.push(FrontierEntry {
        priority: estimate_remaining_cost(initial_board, target),
        seq: next_seq,
        node: 0,
    });
    next_seq += 1;
    stats.max_frontier_len = 1;

    let outcome = loop {
        let Some(entry) = frontier.pop() else {
            break SearchOutcome::Unsolvable;
        };

        let node = &nodes[entry.node];
        if node.board.is_goal(target) {
            observer(&SearchEvent::GoalReached {
                depth: node.depth,
                cost: node.cost,
            });
            break SearchOutcome::Solved(build_solution(&nodes, entry.node));
        }

        if let Some(reason) = limit_reached(&limits, &stats, frontier.len(), started_at) {
            break SearchOutcome::Aborted(reason);
        }

        stats.nodes_expanded += 1;
        observer(&SearchEvent::Expanded {
            depth: node.depth,
            cost: node.cost,
            priority: entry.priority,
            frontier_len: frontier.len(),
        });
        trace!(
            "expanding node {} (depth {}, cost {}, priority {})",
            entry.node,
            node.depth,
            node.cost,
            entry.priority
        );

        let parent_board = node.board.clone();
        let child_cost = node.cost + PATH_COST;
        let child_depth = node.depth + 1;

        for placement in legal_placements(&parent_board) {
            stats.nodes_generated += 1;

            let signature = path_signature(&nodes, entry.node, &placement);
            if !seen.insert(signature) {
                stats.duplicates_skipped += 1;
                continue;
            }

            let child_board = parent_board.apply_placement(&placement, target);
            let priority = child_cost + estimate_remaining_cost(&child_board, target);
            nodes.push(SearchNode {
                board: child_board,
                cost: child_cost,
                depth: child_depth,
                parent: Some(entry.node),
                placement: Some(placement),
            });
            frontier.push(FrontierEntry {
                priority,
                seq: next_seq,
                node: nodes.len() - 1,
            });
            next_seq += 1;
        }
        stats.max_frontier_len = stats.max_frontier_len.max(frontier.len());
    };

    stats.elapsed = started_at.elapsed();
    debug!(
        "search for target {} finished: {} after {} expansions, {} generated, {} duplicates, {:?}",
        target,
        outcome_label(&outcome),
        stats.nodes_expanded,
        stats.nodes_generated,
        stats.duplicates_skipped,
        stats.elapsed
    );
    SearchReport { outcome, stats }
}

fn outcome_label(outcome: &SearchOutcome) -> &'static str {
    match outcome {
        SearchOutcome::Solved(_) => "solved",
        SearchOutcome::Unsolvable => "unsolvable",
        SearchOutcome::Aborted(_) => "aborted",
    }
}

fn limit_reached(
    limits: &SearchLimits,
    stats: &SearchStats,
    frontier_len: usize,
    started_at: Instant,
) -> Option<AbortReason> {
    if limits
        .max_expansions
        .is_some_and(|max| stats.nodes_expanded >= max)
    {
        return Some(AbortReason::ExpansionLimit);
    }
    if limits.max_frontier.is_some_and(|max| frontier_len >= max) {
        return Some(AbortReason::FrontierLimit);
    }
    if limits
        .time_limit
        .is_some_and(|limit| started_at.elapsed() >= limit)
    {
        return Some(AbortReason::TimeLimit);
    }
    None
}

/// Sorted cells of every placement on the path from the root to a new child.
///
/// The signature ignores placement order and clearing, so it identifies a set of
/// placements rather than a board: two different sets that leave identical boards
/// are still searched separately.
fn path_signature(nodes: &[SearchNode], parent: usize, placement: &Placement) -> Vec<Coord> {
    let mut signature = placement.coords().to_vec();
    let mut current = Some(parent);
    while let Some(idx) = current {
        let node = &nodes[idx];
        if let Some(p) = &node.placement {
            signature.extend_from_slice(p.coords());
        }
        current = node.parent;
    }
    signature.sort_unstable();
    signature
}

fn build_solution(nodes: &[SearchNode], goal: usize) -> Solution {
    let mut placements = Vec::with_capacity(nodes[goal].depth);
    let mut current = Some(goal);
    while let Some(idx) = current {
        if let Some(p) = &nodes[idx].placement {
            placements.push(p.clone());
        }
        current = nodes[idx].parent;
    }
    placements.reverse();

    Solution {
        cost: nodes[goal].cost,
        final_board: nodes[goal].board.clone(),
        placements,
    }
}

/// Re-applies `placements` to `board` one by one, checking each for legality.
///
/// # Returns
/// The final board, or the first `PlacementError` encountered.
pub fn replay_solution(
    board: &Board,
    target: Coord,
    placements: &[Placement],
) -> Result<Board, PlacementError> {
    let mut game = Game::new_with_board(board.clone(), target);
    for placement in placements {
        game.process_placement(placement)?;
    }
    Ok(game.board().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Tile;
    use crate::utils::board_from_str_array;

    fn piece(cells: [(usize, usize); 4]) -> Placement {
        Placement::new(cells.map(|(r, c)| Coord::new(r, c))).unwrap()
    }

    #[test]
    fn test_frontier_entry_order() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry { priority: 5, seq: 0, node: 0 });
        heap.push(FrontierEntry { priority: 3, seq: 2, node: 1 });
        heap.push(FrontierEntry { priority: 3, seq: 1, node: 2 });
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn test_solve_empty_board_is_unsolvable() {
        let report = solve_astar(&Board::new_empty(), Coord::new(3, 3), SearchLimits::default());
        assert_eq!(report.outcome, SearchOutcome::Unsolvable);
        assert_eq!(report.stats.nodes_expanded, 1);
        assert_eq!(report.stats.nodes_generated, 0);
    }

    #[test]
    fn test_solve_goal_already_holds() {
        let board = board_from_str_array(&["RBBBBBBBBBB"]).unwrap();
        let report = solve_astar(&board, Coord::new(0, 4), SearchLimits::default());
        let solution = report.outcome.solution().unwrap();
        assert!(solution.placements.is_empty());
        assert_eq!(solution.cost, 0);
        assert_eq!(report.stats.nodes_expanded, 0);
    }

    #[test]
    fn test_solve_single_placement() {
        let board = board_from_str_array(&["RBBBBBB...."]).unwrap();
        let target = Coord::new(0, 3);
        let report = solve_astar(&board, target, SearchLimits::default());
        let solution = report.outcome.solution().unwrap();
        assert_eq!(
            solution.placements,
            vec![piece([(0, 7), (0, 8), (0, 9), (0, 10)])]
        );
        assert_eq!(solution.cost, PATH_COST);
        assert!(solution.final_board.is_goal(target));
    }

    #[test]
    fn test_solve_enclosed_red_is_unsolvable() {
        let mut board = Board::new_empty();
        let red = Coord::new(5, 5);
        board.set_tile(red, Tile::Red);
        for n in red.neighbors() {
            board.set_tile(n, Tile::Blue);
        }
        let report = solve_astar(&board, Coord::new(0, 0), SearchLimits::default());
        assert_eq!(report.outcome, SearchOutcome::Unsolvable);
    }

    #[test]
    fn test_solve_reports_expansion_limit() {
        let board = board_from_str_array(&["R"]).unwrap();
        let limits = SearchLimits {
            max_expansions: Some(1),
            ..SearchLimits::default()
        };
        let report = solve_astar(&board, Coord::new(0, 5), limits);
        assert_eq!(
            report.outcome,
            SearchOutcome::Aborted(AbortReason::ExpansionLimit)
        );
        assert_eq!(report.stats.nodes_expanded, 1);
    }

    #[test]
    fn test_solve_reports_frontier_limit() {
        let board = board_from_str_array(&["R"]).unwrap();
        let limits = SearchLimits {
            max_frontier: Some(1),
            ..SearchLimits::default()
        };
        let report = solve_astar(&board, Coord::new(0, 5), limits);
        assert_eq!(
            report.outcome,
            SearchOutcome::Aborted(AbortReason::FrontierLimit)
        );
    }

    #[test]
    fn test_solve_reports_time_limit() {
        let board = board_from_str_array(&["R"]).unwrap();
        let limits = SearchLimits {
            time_limit: Some(Duration::ZERO),
            ..SearchLimits::default()
        };
        let report = solve_astar(&board, Coord::new(0, 5), limits);
        assert_eq!(report.outcome, SearchOutcome::Aborted(AbortReason::TimeLimit));
    }

    #[test]
    fn test_observer_sees_every_expansion() {
        let board = board_from_str_array(&["RBBBBB....."]).unwrap();
        let mut events = Vec::new();
        let report = solve_astar_with_observer(
            &board,
            Coord::new(0, 2),
            SearchLimits::default(),
            |event| events.push(*event),
        );
        let expanded = events
            .iter()
            .filter(|e| matches!(e, SearchEvent::Expanded { .. }))
            .count();
        assert_eq!(expanded, report.stats.nodes_expanded);
        assert!(matches!(
            events.last(),
            Some(SearchEvent::GoalReached { cost: 8, depth: 2 })
        ));
    }

    #[test]
    fn test_path_signature_ignores_order() {
        let board = board_from_str_array(&["R"]).unwrap();
        let a = piece([(0, 1), (0, 2), (0, 3), (0, 4)]);
        let b = piece([(1, 0), (2, 0), (3, 0), (4, 0)]);
        let node = |placement: Option<Placement>, parent| SearchNode {
            board: board.clone(),
            cost: 0,
            depth: 0,
            parent,
            placement,
        };
        let nodes = vec![
            node(None, None),
            node(Some(a.clone()), Some(0)),
            node(Some(b.clone()), Some(0)),
        ];
        assert_eq!(
            path_signature(&nodes, 1, &b),
            path_signature(&nodes, 2, &a)
        );
        assert_ne!(path_signature(&nodes, 1, &b), path_signature(&nodes, 0, &b));
    }

    #[test]
    fn test_replay_solution_rejects_illegal_step() {
        let board = board_from_str_array(&["R"]).unwrap();
        let target = Coord::new(0, 5);
        let detached = piece([(6, 1), (6, 2), (6, 3), (6, 4)]);
        assert_eq!(
            replay_solution(&board, target, &[detached]),
            Err(PlacementError::NotAdjacentToOwned)
        );

        let ok = piece([(0, 1), (0, 2), (0, 3), (0, 4)]);
        let after = replay_solution(&board, target, &[ok]).unwrap();
        assert_eq!(after.occupied_count(), 5);
    }
}
