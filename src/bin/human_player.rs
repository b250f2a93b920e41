use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tetress_solver::engine::{Board, Coord, Game, Placement, Tile, BOARD_N, PIECE_SIZE};
use tetress_solver::placement::legal_placements;
use tetress_solver::solver::{solve_astar, SearchLimits, SearchOutcome};
use tetress_solver::utils::{parse_board, parse_coord};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Optional board file; a random board is generated when omitted
    board_file: Option<PathBuf>,

    /// Target cell as "row,col" (defaults to the first blue cell)
    #[clap(short, long)]
    target: Option<String>,

    /// Seed for the random board
    #[clap(long, default_value_t = 514514)]
    seed: u64,
}

fn load_board(args: &Args) -> Result<Board, String> {
    match &args.board_file {
        Some(path) => {
            let content =
                fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
            parse_board(&content).map_err(|e| format!("Invalid board format: {}", e))
        }
        None => Ok(Board::new_random_with_seed(args.seed, 0.2)),
    }
}

fn default_target(board: &Board) -> Coord {
    Coord::all()
        .find(|&coord| board.get_tile(coord) == Tile::Blue)
        .unwrap_or_else(|| Coord::new(BOARD_N / 2, BOARD_N / 2))
}

fn parse_placement(input: &str) -> Result<Placement, String> {
    let numbers: Vec<usize> = input
        .split_whitespace()
        .map(|part| part.parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|_| "Please enter numbers only.".to_string())?;
    if numbers.len() != 2 * PIECE_SIZE {
        return Err(format!(
            "Expected {} numbers (row col for each of {} cells), found {}.",
            2 * PIECE_SIZE,
            PIECE_SIZE,
            numbers.len()
        ));
    }

    let mut cells = [Coord::new(0, 0); PIECE_SIZE];
    for (i, pair) in numbers.chunks(2).enumerate() {
        cells[i] = Coord::try_new(pair[0], pair[1]).ok_or_else(|| {
            format!(
                "({}, {}) is off the board: row and column must be between 0 and {}.",
                pair[0],
                pair[1],
                BOARD_N - 1
            )
        })?;
    }
    Placement::new(cells).map_err(|e| format!("Invalid piece: {}.", e))
}

fn show_hint(game: &Game) {
    let limits = SearchLimits {
        time_limit: Some(Duration::from_secs(2)),
        ..SearchLimits::default()
    };
    match solve_astar(game.board(), game.target(), limits).outcome {
        SearchOutcome::Solved(solution) => match solution.placements.first() {
            Some(next) => println!(
                "Hint: place {} ({} more placements needed).",
                next,
                solution.placements.len()
            ),
            None => println!("The target line is already complete."),
        },
        SearchOutcome::Unsolvable => println!("Hint: the target line can no longer be completed."),
        SearchOutcome::Aborted(_) => println!("Hint: no answer within the time limit."),
    }
}

fn main() {
    let args = Args::parse();
    let board = match load_board(&args) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    let target = match args.target.as_deref().map(parse_coord) {
        Some(Ok(coord)) => coord,
        Some(Err(e)) => {
            eprintln!("Invalid target: {}", e);
            return;
        }
        None => default_target(&board),
    };

    let mut game = Game::new_with_board(board, target);
    println!("Welcome to Tetress! Complete the row or column through {}.", target);

    loop {
        println!("---------------------");
        println!("Steps: {}, Cost: {}", game.steps(), game.cost());
        println!(
            "{}",
            game.board()
                .to_string_with_highlight(Some(target), game.placements().last())
        );

        if game.is_goal_reached() {
            println!();
            println!("---------------------");
            println!("TARGET LINE COMPLETE!");
            println!("Total Cost: {}", game.cost());
            println!("Total Steps: {}", game.steps());
            println!("---------------------");
            break;
        }
        if legal_placements(game.board()).is_empty() {
            println!("No legal placements remain. Undo with 'u' or quit with 'q'.");
        }

        print!("Enter a piece (r c r c r c r c), 'h' for a hint, 'u' to undo, 'q' to quit: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "u" => {
                if game.undo_last_move() {
                    println!("Placement undone.");
                } else {
                    println!("Nothing to undo.");
                }
            }
            "h" => show_hint(&game),
            other => match parse_placement(other) {
                Ok(placement) => match game.process_placement(&placement) {
                    Ok(()) => println!("Placed {}.", placement),
                    Err(e) => println!("Illegal placement: {}.", e),
                },
                Err(msg) => println!("{}", msg),
            },
        }
    }
}
