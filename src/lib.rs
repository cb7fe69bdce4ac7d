//! A depth-limited agent for playing the board game 'Connect 4'
//!
//! This agent looks a fixed number of moves ahead with a negamax game
//! tree search and scores the positions at the end of its lookahead with
//! a hand-tuned positional heuristic.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_ai::{board::{Board, Player}, search::Solver};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // player 1 has three in a row along the bottom
//! let board = Board::from_moves("152535")?;
//! let mut solver = Solver::new(board);
//! let best = solver.search(2, Player::One).unwrap();
//!
//! assert_eq!(best.column, 3);
//! assert_eq!(best.score, 1.0);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod evaluator;

pub mod search;

pub mod strategy;

pub mod game;


/// The width and height of the (square) game board in tiles
pub const BOARD_SIZE: usize = 7;

/// The number of contiguous tiles a player needs to win
pub const CONNECT_GOAL: usize = 4;

/// The search depth used for a live turn unless configured otherwise
pub const DEFAULT_DEPTH: u32 = 7;

/// The deepest search offered to the user; work grows as `BOARD_SIZE^depth`
pub const MAX_DEPTH: u32 = 10;

// a winning line has to fit on the board in every direction
const_assert!(CONNECT_GOAL >= 2);
const_assert!(CONNECT_GOAL <= BOARD_SIZE);
