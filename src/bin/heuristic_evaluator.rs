use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tetress_solver::engine::{Board, Coord, BOARD_N};
use tetress_solver::heuristics::estimate_remaining_cost;
use tetress_solver::solver::{solve_astar, SearchLimits, SearchOutcome};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compares the heuristic estimate with solved costs on random boards")]
struct Args {
    /// Number of random boards to evaluate
    #[clap(long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first board; board i uses start_seed + i
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Probability that a cell starts blue
    #[clap(long, default_value_t = 0.25)]
    density: f64,

    /// Node expansion budget per board
    #[clap(long, default_value_t = 5_000)]
    max_expansions: usize,

    /// Time budget per board in milliseconds
    #[clap(long, default_value_t = 2_000)]
    time_limit_ms: u64,
}

// The target is drawn from its own stream so it does not correlate with the board layout.
fn random_target(seed: u64) -> Coord {
    let mut rng = SmallRng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
    Coord::new(rng.gen_range(0..BOARD_N), rng.gen_range(0..BOARD_N))
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let limits = SearchLimits {
        max_expansions: Some(args.max_expansions),
        max_frontier: None,
        time_limit: Some(Duration::from_millis(args.time_limit_ms)),
    };

    let mut solved = 0usize;
    let mut unsolvable = 0usize;
    let mut aborted = 0usize;
    let mut skipped = 0usize;
    let mut violations = 0usize;
    let mut ratio_sum = 0.0f64;

    println!(
        "Evaluating heuristic on {} boards (density {:.2})...\n",
        args.boards, args.density
    );
    println!(
        "{:<8} {:<10} {:<8} {:<12} {:<8} {:<10}",
        "Seed", "Target", "h(root)", "Outcome", "Cost", "Expanded"
    );

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx as u64;
        let board = Board::new_random_with_seed(seed, args.density);
        let target = random_target(seed);

        if board.is_goal(target) {
            skipped += 1;
            continue;
        }

        let h = estimate_remaining_cost(&board, target);
        let report = solve_astar(&board, target, limits);
        let (label, cost) = match &report.outcome {
            SearchOutcome::Solved(solution) => {
                solved += 1;
                if h > solution.cost {
                    violations += 1;
                }
                if solution.cost > 0 {
                    ratio_sum += h as f64 / solution.cost as f64;
                }
                ("solved".to_string(), solution.cost.to_string())
            }
            SearchOutcome::Unsolvable => {
                unsolvable += 1;
                ("unsolvable".to_string(), "-".to_string())
            }
            SearchOutcome::Aborted(reason) => {
                aborted += 1;
                (format!("{:?}", reason), "-".to_string())
            }
        };

        println!(
            "{:<8} {:<10} {:<8} {:<12} {:<8} {:<10}",
            seed,
            target.to_string(),
            h,
            label,
            cost,
            report.stats.nodes_expanded
        );
    }

    println!("\n--- Evaluation Complete ---");
    println!(
        "Solved: {}, Unsolvable: {}, Aborted: {}, Skipped (goal at start): {}",
        solved, unsolvable, aborted, skipped
    );
    if solved > 0 {
        println!(
            "Mean h(root) / cost over solved boards: {:.3}",
            ratio_sum / solved as f64
        );
    }
    println!(
        "Boards where h(root) exceeded the cost found: {}",
        violations
    );
}
