//! Grid state, tile placement and end-of-game detection

use anyhow::{anyhow, Result};

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::{BOARD_SIZE, CONNECT_GOAL};

/// One of the two competitors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The player moving after this one
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The conventional player number, 1 or 2
    pub fn number(self) -> i32 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn from_number(number: i32) -> Option<Self> {
        match number {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// The cell state of a tile belonging to this player
    pub fn cell(self) -> Cell {
        match self {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            _ => false,
        }
    }

    /// The owner of the tile in this cell, if any
    pub fn player(&self) -> Option<Player> {
        match self {
            Cell::PlayerOne => Some(Player::One),
            Cell::PlayerTwo => Some(Player::Two),
            Cell::Empty => None,
        }
    }
}

/// The state of the game immediately after a move
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    Ongoing,
    Tie,
    Win(Player),
}

impl Outcome {
    /// Integer encoding of the outcome: -1 ongoing, 0 tie, otherwise the winning player's number
    pub fn code(self) -> i32 {
        match self {
            Outcome::Ongoing => -1,
            Outcome::Tie => 0,
            Outcome::Win(player) => player.number(),
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Outcome::Ongoing),
            0 => Some(Outcome::Tie),
            _ => Player::from_number(code).map(Outcome::Win),
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Outcome::Ongoing
    }
}

/// A square Connect 4 board
///
/// Tiles fall to the lowest free row of a column, so the occupied cells of
/// every column form a contiguous run starting at row 0. Copies are fully
/// independent of the original.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Board {
    cells: [Cell; BOARD_SIZE * BOARD_SIZE], // cells are stored left-to-right, bottom-to-top
    heights: [usize; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE * BOARD_SIZE],
            heights: [0; BOARD_SIZE],
        }
    }

    /// Creates a board by playing a sequence of one-indexed columns, alternating
    /// players and starting with player 1
    ///
    /// Fails on characters that are not valid columns, on full columns, and on
    /// moves made after the game has ended.
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();
        let mut player = Player::One;
        let mut finished = false;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=BOARD_SIZE) => {
                    let column = column - 1;
                    if finished {
                        return Err(anyhow!("Invalid position, game is over"));
                    }
                    if !board.place(player, column) {
                        return Err(anyhow!("Invalid move, column {} full", column + 1));
                    }
                    finished = board.check_terminal(column).is_terminal();
                    player = player.opponent();
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    /// The state of the cell at `row` (counted from the bottom) and `column`,
    /// or `None` if either coordinate is off the board
    pub fn get(&self, row: usize, column: usize) -> Option<Cell> {
        if row >= BOARD_SIZE || column >= BOARD_SIZE {
            return None;
        }
        Some(self.at(row, column))
    }

    // unchecked access for in-range coordinates
    pub(crate) fn at(&self, row: usize, column: usize) -> Cell {
        self.cells[column + BOARD_SIZE * row]
    }

    /// The number of tiles in a column, 0 for columns off the board
    pub fn height(&self, column: usize) -> usize {
        self.heights.get(column).copied().unwrap_or(0)
    }

    /// The total number of tiles on the board
    pub fn num_tiles(&self) -> usize {
        self.heights.iter().sum()
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&height| height == BOARD_SIZE)
    }

    /// Whether a tile can be placed in `column`; columns off the board are closed
    pub fn is_column_open(&self, column: usize) -> bool {
        column < BOARD_SIZE && self.heights[column] < BOARD_SIZE
    }

    /// The open columns in ascending order
    pub fn open_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..BOARD_SIZE).filter(move |&column| self.is_column_open(column))
    }

    /// Drops a tile for `player` into `column`
    ///
    /// Returns false, leaving the board untouched, if the column is full or off the board.
    pub fn place(&mut self, player: Player, column: usize) -> bool {
        if !self.is_column_open(column) {
            return false;
        }
        self.cells[column + BOARD_SIZE * self.heights[column]] = player.cell();
        self.heights[column] += 1;
        true
    }

    /// Removes the topmost tile of `column`
    ///
    /// Returns false, leaving the board untouched, if the column is empty or off
    /// the board. The board does not know which tile was placed last overall,
    /// callers undo in the reverse order of their placements.
    pub fn undo_last(&mut self, column: usize) -> bool {
        if self.height(column) == 0 {
            return false;
        }
        self.heights[column] -= 1;
        self.cells[column + BOARD_SIZE * self.heights[column]] = Cell::Empty;
        true
    }

    /// Places a tile that is removed again when the returned guard is dropped
    ///
    /// Returns `None` if the column is closed.
    pub fn place_guarded(&mut self, player: Player, column: usize) -> Option<PlacedTile<'_>> {
        if self.place(player, column) {
            Some(PlacedTile {
                board: self,
                column,
            })
        } else {
            None
        }
    }

    /// Determines whether the tile on top of `last_column` ended the game
    ///
    /// Only the lines through that tile are scanned, since a new line can only
    /// be completed by the tile just placed. An empty or off-board column is
    /// reported as `Ongoing`.
    pub fn check_terminal(&self, last_column: usize) -> Outcome {
        let height = self.height(last_column);
        if height == 0 {
            return Outcome::Ongoing;
        }
        let row = height - 1;
        let player = match self.at(row, last_column).player() {
            Some(player) => player,
            None => return Outcome::Ongoing,
        };

        // vertical, horizontal, and both diagonals
        for &(dx, dy) in [(0i32, 1i32), (1, 0), (1, 1), (1, -1)].iter() {
            let run = 1
                + self.run_length(player, row, last_column, dx, dy)
                + self.run_length(player, row, last_column, -dx, -dy);
            if run >= CONNECT_GOAL {
                return Outcome::Win(player);
            }
        }

        if (0..BOARD_SIZE).all(|column| !self.at(BOARD_SIZE - 1, column).is_empty()) {
            Outcome::Tie
        } else {
            Outcome::Ongoing
        }
    }

    // counts the player's tiles stepping away from (row, column), excluding the start cell
    fn run_length(&self, player: Player, row: usize, column: usize, dx: i32, dy: i32) -> usize {
        let mut run = 0;
        let mut x = column as i32 + dx;
        let mut y = row as i32 + dy;
        loop {
            if x < 0
                || x >= BOARD_SIZE as i32
                || y < 0
                || y >= BOARD_SIZE as i32
                || self.at(y as usize, x as usize) != player.cell()
            {
                break;
            }
            x += dx;
            y += dy;
            run += 1;
        }
        run
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row_separator = "-".repeat(BOARD_SIZE * 4 + 1);
        for row in (0..BOARD_SIZE).rev() {
            writeln!(f, "{}", row_separator)?;
            for column in 0..BOARD_SIZE {
                let symbol = match self.at(row, column) {
                    Cell::PlayerOne => 'X',
                    Cell::PlayerTwo => 'O',
                    Cell::Empty => ' ',
                };
                write!(f, "| {} ", symbol)?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}", row_separator)?;
        for column in 0..BOARD_SIZE {
            write!(f, "  {} ", column)?;
        }
        writeln!(f)
    }
}

/// A tile placed through [`Board::place_guarded`]
///
/// The tile is taken back off the board when the guard goes out of scope, on
/// every exit path. The guard dereferences to the board so play can continue
/// on top of it.
pub struct PlacedTile<'a> {
    board: &'a mut Board,
    column: usize,
}

impl PlacedTile<'_> {
    /// The column the tile was placed in
    pub fn column(&self) -> usize {
        self.column
    }
}

impl Deref for PlacedTile<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        &*self.board
    }
}

impl DerefMut for PlacedTile<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.board
    }
}

impl Drop for PlacedTile<'_> {
    fn drop(&mut self) {
        let undone = self.board.undo_last(self.column);
        if !undone {
            tracing::warn!(column = self.column, "placed tile was already removed");
        }
        debug_assert!(undone, "placed tile in column {} was already removed", self.column);
    }
}
