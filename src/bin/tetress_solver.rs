use clap::Parser;
use log::warn;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tetress_solver::engine::{Board, Coord};
use tetress_solver::heuristics::estimate_remaining_cost;
use tetress_solver::search_with_limits;
use tetress_solver::solver::{replay_solution, SearchLimits, SearchOutcome};
use tetress_solver::utils::{parse_board, parse_coord};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the board file (11x11 character grid, or one "r,c,colour" per line)
    board_file: PathBuf,

    /// Target cell as "row,col"; its row or column must be completed
    #[clap(short, long, value_parser = parse_target)]
    target: Coord,

    /// Give up after this many node expansions
    #[clap(long)]
    max_expansions: Option<usize>,

    /// Give up once the frontier holds this many nodes
    #[clap(long)]
    max_frontier: Option<usize>,

    /// Give up after this many milliseconds
    #[clap(long)]
    time_limit_ms: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_target(s: &str) -> Result<Coord, String> {
    parse_coord(s).map_err(|e| e.to_string())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_board_file(path: &PathBuf) -> Result<Board, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    parse_board(&content).map_err(|e| format!("Invalid board format: {}", e))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let board = match read_board_file(&args.board_file) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("{}: {}", args.board_file.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let limits = SearchLimits {
        max_expansions: args.max_expansions,
        max_frontier: args.max_frontier,
        time_limit: args.time_limit_ms.map(Duration::from_millis),
    };

    println!("Loaded board from {}\n", args.board_file.display());
    println!(
        "Initial board state (target {} marked **):\n{}\n",
        args.target,
        board.to_string_with_highlight(Some(args.target), None)
    );
    println!(
        "Heuristic estimate: {}\n",
        estimate_remaining_cost(&board, args.target)
    );

    let report = match search_with_limits(&board, args.target, limits) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match &report.outcome {
        SearchOutcome::Solved(solution) => {
            println!("Solution found:\n");
            println!("Placements ({}):", solution.placements.len());
            for (i, placement) in solution.placements.iter().enumerate() {
                println!("  Placement {}: {}", i + 1, placement);
            }
            println!("Total cost: {}\n", solution.cost);

            if let Err(e) = replay_solution(&board, args.target, &solution.placements) {
                warn!("solution failed to replay: {}", e);
            }
            println!(
                "Final board state:\n{}\n",
                solution
                    .final_board
                    .to_string_with_highlight(Some(args.target), solution.placements.last())
            );
        }
        SearchOutcome::Unsolvable => println!("No solution exists.\n"),
        SearchOutcome::Aborted(reason) => println!("Search aborted: {:?}\n", reason),
    }

    let stats = &report.stats;
    println!(
        "Expanded {} nodes, generated {}, skipped {} duplicates, peak frontier {}, in {:?}",
        stats.nodes_expanded,
        stats.nodes_generated,
        stats.duplicates_skipped,
        stats.max_frontier_len,
        stats.elapsed
    );
    ExitCode::SUCCESS
}
