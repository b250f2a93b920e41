//! Core board model for single-player Tetress.
//!
//! This module defines the game's fundamental components:
//! - `Coord` and `Direction`: positions on the toroidal `BOARD_N` x `BOARD_N` grid and
//!   the four orthogonal moves between them (movement wraps at every edge).
//! - `Tile`: the occupant of a cell (empty, red = the searching side, blue = the other side).
//! - `Line`: a full row or column, the unit that gets cleared.
//! - `Placement`: a canonical four-cell piece.
//! - `Board`: the occupancy grid, piece application with row/column clearing, and the goal test.
//! - `Game`: an interactive session with history for undo.
use crate::error::PlacementError;
use crate::placement::check_placement;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::ops::Add;

/// Width and height of the (square) board.
pub const BOARD_N: usize = 11;

/// Number of cells in every piece.
pub const PIECE_SIZE: usize = 4;

/// Cost charged for each placement made by the searching side.
pub const PATH_COST: u32 = 4;

/// Represents the occupant of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// No piece covers this cell.
    Empty,
    /// A cell owned by the searching side. Only red cells seed new placements.
    Red,
    /// A cell owned by the other side. It blocks placements and counts towards line completion.
    Blue,
}

impl Tile {
    /// Converts the tile to its character representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetress_solver::engine::Tile;
    /// assert_eq!(Tile::Red.to_char(), 'R');
    /// assert_eq!(Tile::Empty.to_char(), '.');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Red => 'R',
            Tile::Blue => 'B',
        }
    }

    /// Returns `true` for red and blue cells.
    pub fn is_occupied(&self) -> bool {
        *self != Tile::Empty
    }

    /// Returns the ANSI color code string for terminal output.
    fn to_ansi_color_code(&self) -> &'static str {
        match self {
            Tile::Empty => "40",
            Tile::Red => "41",
            Tile::Blue => "44",
        }
    }
}

/// The four orthogonal directions. Moving off one edge re-enters on the opposite edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order neighbours are visited everywhere in the crate.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    // Offsets are stored as non-negative steps modulo BOARD_N so that `Add` never underflows.
    fn offset(self) -> (usize, usize) {
        match self {
            Direction::Up => (BOARD_N - 1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, BOARD_N - 1),
            Direction::Right => (0, 1),
        }
    }
}

/// A (row, column) position on the board.
///
/// Coordinates order row-major, which is the canonical order used for sorting
/// the cells of a `Placement` and for search signatures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    r: u8,
    c: u8,
}

impl Coord {
    /// Creates a coordinate.
    ///
    /// # Panics
    /// Panics if `r` or `c` is not below `BOARD_N`.
    pub fn new(r: usize, c: usize) -> Self {
        assert!(
            r < BOARD_N && c < BOARD_N,
            "Coordinate ({}, {}) is outside the {}x{} board",
            r,
            c,
            BOARD_N,
            BOARD_N
        );
        Coord {
            r: r as u8,
            c: c as u8,
        }
    }

    /// Creates a coordinate, or returns `None` if it lies outside the board.
    pub fn try_new(r: usize, c: usize) -> Option<Self> {
        if r < BOARD_N && c < BOARD_N {
            Some(Coord::new(r, c))
        } else {
            None
        }
    }

    pub fn r(self) -> usize {
        self.r as usize
    }

    pub fn c(self) -> usize {
        self.c as usize
    }

    /// Returns the four wrap-aware neighbours in `Direction::ALL` order.
    ///
    /// ```
    /// use tetress_solver::engine::{Coord, BOARD_N};
    /// let corner = Coord::new(0, 0);
    /// assert!(corner.neighbors().contains(&Coord::new(BOARD_N - 1, 0)));
    /// assert!(corner.neighbors().contains(&Coord::new(0, BOARD_N - 1)));
    /// ```
    pub fn neighbors(self) -> [Coord; 4] {
        Direction::ALL.map(|direction| self + direction)
    }

    /// Returns `true` if `other` is one orthogonal (wrapping) step away.
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.neighbors().contains(&other)
    }

    /// Iterates over every coordinate of the board in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_N).flat_map(|r| (0..BOARD_N).map(move |c| Coord::new(r, c)))
    }
}

impl Add<Direction> for Coord {
    type Output = Coord;

    fn add(self, direction: Direction) -> Coord {
        let (dr, dc) = direction.offset();
        Coord {
            r: ((self.r() + dr) % BOARD_N) as u8,
            c: ((self.c() + dc) % BOARD_N) as u8,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

/// Distance between two row (or two column) indices on the torus.
pub fn wrap_distance(a: usize, b: usize) -> usize {
    let d = a.abs_diff(b);
    d.min(BOARD_N - d)
}

/// A complete row or column of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Line {
    Row(usize),
    Column(usize),
}

impl Line {
    /// The row and the column passing through `coord`.
    pub fn through(coord: Coord) -> [Line; 2] {
        [Line::Row(coord.r()), Line::Column(coord.c())]
    }

    /// Iterates over the `BOARD_N` cells of the line in increasing index order.
    pub fn cells(self) -> impl Iterator<Item = Coord> {
        (0..BOARD_N).map(move |i| match self {
            Line::Row(r) => Coord::new(r, i),
            Line::Column(c) => Coord::new(i, c),
        })
    }
}

/// A piece of exactly `PIECE_SIZE` distinct, orthogonally connected cells.
///
/// The cells are kept sorted, so two placements covering the same cells compare
/// (and hash) equal no matter in which order the cells were discovered.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement {
    coords: [Coord; PIECE_SIZE],
}

impl Placement {
    /// Builds a placement from four cells, checking that they are distinct and connected.
    ///
    /// Board-relative legality (empty cells, contact with a red cell) is checked
    /// separately by `placement::check_placement`.
    ///
    /// # Examples
    /// ```
    /// use tetress_solver::engine::{Coord, Placement};
    /// let line = Placement::new([
    ///     Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2), Coord::new(0, 3),
    /// ]);
    /// assert!(line.is_ok());
    ///
    /// let split = Placement::new([
    ///     Coord::new(0, 0), Coord::new(0, 1), Coord::new(5, 5), Coord::new(5, 6),
    /// ]);
    /// assert!(split.is_err());
    /// ```
    pub fn new(coords: [Coord; PIECE_SIZE]) -> Result<Self, PlacementError> {
        let placement = Placement::from_cells(coords);
        for pair in placement.coords.windows(2) {
            if pair[0] == pair[1] {
                return Err(PlacementError::DuplicateCoord(pair[0]));
            }
        }
        if !placement.is_connected() {
            return Err(PlacementError::Disconnected);
        }
        Ok(placement)
    }

    /// Canonicalises cells that are already known to form a valid piece.
    pub(crate) fn from_cells(mut coords: [Coord; PIECE_SIZE]) -> Self {
        coords.sort_unstable();
        Placement { coords }
    }

    /// The four cells, sorted row-major.
    pub fn coords(&self) -> &[Coord; PIECE_SIZE] {
        &self.coords
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.coords.contains(&coord)
    }

    fn is_connected(&self) -> bool {
        let mut reached = [false; PIECE_SIZE];
        reached[0] = true;
        let mut stack = vec![0];
        while let Some(i) = stack.pop() {
            for j in 0..PIECE_SIZE {
                if !reached[j] && self.coords[i].is_adjacent(self.coords[j]) {
                    reached[j] = true;
                    stack.push(j);
                }
            }
        }
        reached.iter().all(|&r| r)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.coords.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", cells.join(" "))
    }
}

/// Represents the game board as a 2D grid of `Tile`s.
///
/// Boards are treated as values: `apply_placement` returns a new board and leaves
/// the source board untouched, so search nodes never share mutable state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    grid: [[Tile; BOARD_N]; BOARD_N],
}

impl Board {
    /// Creates a new board with every cell set to `Tile::Empty`.
    ///
    /// # Examples
    /// ```
    /// use tetress_solver::engine::{Board, Coord, Tile};
    /// let board = Board::new_empty();
    /// assert_eq!(board.get_tile(Coord::new(0, 0)), Tile::Empty);
    /// ```
    pub fn new_empty() -> Self {
        Board {
            grid: [[Tile::Empty; BOARD_N]; BOARD_N],
        }
    }

    /// Creates a reproducible random board from `seed`.
    ///
    /// Each cell becomes blue with probability `blue_density` (clamped to `0.0..=1.0`);
    /// afterwards one random cell is made red so the searching side has an anchor.
    /// The same seed and density always yield the same board.
    pub fn new_random_with_seed(seed: u64, blue_density: f64) -> Self {
        let density = blue_density.clamp(0.0, 1.0);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut grid = [[Tile::Empty; BOARD_N]; BOARD_N];

        for row in grid.iter_mut() {
            for cell in row.iter_mut() {
                if rng.gen_bool(density) {
                    *cell = Tile::Blue;
                }
            }
        }
        let r = rng.gen_range(0..BOARD_N);
        let c = rng.gen_range(0..BOARD_N);
        grid[r][c] = Tile::Red;
        Board { grid }
    }

    /// Creates a board from a predefined grid, mainly for tests and parsers.
    pub fn from_grid(initial_grid: [[Tile; BOARD_N]; BOARD_N]) -> Self {
        Board { grid: initial_grid }
    }

    pub fn get_tile(&self, coord: Coord) -> Tile {
        self.grid[coord.r()][coord.c()]
    }

    pub fn set_tile(&mut self, coord: Coord, tile: Tile) {
        self.grid[coord.r()][coord.c()] = tile;
    }

    pub fn is_empty_at(&self, coord: Coord) -> bool {
        self.get_tile(coord) == Tile::Empty
    }

    /// Returns an immutable reference to the underlying grid.
    pub fn get_grid(&self) -> &[[Tile; BOARD_N]; BOARD_N] {
        &self.grid
    }

    /// Number of red or blue cells.
    pub fn occupied_count(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|tile| tile.is_occupied())
            .count()
    }

    /// Iterates over red cells in row-major order.
    pub fn red_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        Coord::all().filter(move |&coord| self.get_tile(coord) == Tile::Red)
    }

    /// A line is complete when none of its cells is empty, whatever their colours.
    pub fn is_line_complete(&self, line: Line) -> bool {
        line.cells().all(|cell| self.get_tile(cell).is_occupied())
    }

    /// Goal test: the row or the column through `target` is completely occupied.
    pub fn is_goal(&self, target: Coord) -> bool {
        Line::through(target)
            .into_iter()
            .any(|line| self.is_line_complete(line))
    }

    /// Paints every cell of `placement` red, without any clearing.
    pub fn place(&mut self, placement: &Placement) {
        for &coord in placement.coords() {
            self.set_tile(coord, Tile::Red);
        }
    }

    /// Clears every complete row or column that passes through a cell of `placement`.
    ///
    /// Complete lines are collected before any cell is removed, so a row and a column
    /// completed by the same piece are both cleared even though they share a cell.
    ///
    /// # Returns
    /// The number of lines cleared.
    pub fn clear_complete_lines(&mut self, placement: &Placement) -> usize {
        let mut complete: Vec<Line> = Vec::new();
        for &coord in placement.coords() {
            for line in Line::through(coord) {
                if !complete.contains(&line) && self.is_line_complete(line) {
                    complete.push(line);
                }
            }
        }

        for line in &complete {
            for cell in line.cells() {
                self.set_tile(cell, Tile::Empty);
            }
        }
        complete.len()
    }

    /// Applies `placement` to a copy of this board and returns the result.
    ///
    /// Clearing is skipped when the new board already satisfies the goal for `target`,
    /// which keeps the completed target line visible to the goal test.
    pub fn apply_placement(&self, placement: &Placement, target: Coord) -> Board {
        let mut next = self.clone();
        next.place(placement);
        if !next.is_goal(target) {
            next.clear_complete_lines(placement);
        }
        next
    }

    /// Generates a string representation of the board for terminal output.
    ///
    /// The output includes row and column numbers and uses ANSI escape codes for tile colors.
    /// The `target` cell is drawn as `**` and the cells of `placed` as `::`.
    pub fn to_string_with_highlight(
        &self,
        target: Option<Coord>,
        placed: Option<&Placement>,
    ) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for c_idx in 0..BOARD_N {
            output.push_str(&format!("{:<2}", c_idx));
        }
        output.push('\n');

        for r_idx in 0..BOARD_N {
            output.push_str(&format!("{:<2}", r_idx));

            for c_idx in 0..BOARD_N {
                let coord = Coord::new(r_idx, c_idx);
                let color_code = self.get_tile(coord).to_ansi_color_code();
                let content = if target == Some(coord) {
                    "**"
                } else if placed.map_or(false, |p| p.contains(coord)) {
                    "::"
                } else {
                    "  "
                };
                output.push_str(&format!("\x1b[1;{};m{}\x1b[m", color_code, content));
            }
            if r_idx < BOARD_N - 1 {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Board {
    /// Formats the board for display using `to_string_with_highlight(None, None)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None, None))
    }
}

/// Manages an interactive Tetress session against a fixed target.
///
/// Every accepted placement is checked for legality, applied with clearing,
/// and recorded so it can be undone.
///
/// # Examples
/// ```
/// use tetress_solver::engine::{Board, Coord, Game, Placement, Tile};
/// let mut board = Board::new_empty();
/// board.set_tile(Coord::new(0, 0), Tile::Red);
/// let mut game = Game::new_with_board(board, Coord::new(0, 5));
///
/// let piece = Placement::new([
///     Coord::new(0, 1), Coord::new(0, 2), Coord::new(0, 3), Coord::new(0, 4),
/// ]).unwrap();
/// assert!(game.process_placement(&piece).is_ok());
/// assert_eq!(game.cost(), 4);
/// assert!(game.undo_last_move());
/// assert_eq!(game.steps(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    target: Coord,
    placements: Vec<Placement>,
    history: Vec<Board>, // board before each accepted placement
}

impl Game {
    pub fn new_with_board(initial_board: Board, target: Coord) -> Self {
        Game {
            board: initial_board,
            target,
            placements: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn target(&self) -> Coord {
        self.target
    }

    /// Placements accepted so far, oldest first.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn steps(&self) -> u32 {
        self.placements.len() as u32
    }

    /// Accumulated cost of the placements made so far.
    pub fn cost(&self) -> u32 {
        self.steps() * PATH_COST
    }

    /// Applies `placement` if it is legal on the current board.
    ///
    /// # Returns
    /// * `Ok(())` when the piece was placed (and any completed lines cleared).
    /// * `Err(PlacementError)` describing why the piece cannot be placed; the game is unchanged.
    pub fn process_placement(&mut self, placement: &Placement) -> Result<(), PlacementError> {
        check_placement(&self.board, placement)?;

        let next = self.board.apply_placement(placement, self.target);
        self.history.push(std::mem::replace(&mut self.board, next));
        self.placements.push(placement.clone());
        Ok(())
    }

    /// Reverts the most recent placement. Returns `false` if there is nothing to undo.
    pub fn undo_last_move(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.board = previous;
                self.placements.pop();
                true
            }
            None => false,
        }
    }

    pub fn is_goal_reached(&self) -> bool {
        self.board.is_goal(self.target)
    }
}
