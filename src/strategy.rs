//! Move choosers that can take a seat in a [`crate::game::Game`]

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;

use std::time::Instant;

use crate::board::{Board, Player};
use crate::search::{SearchConfig, Solver};

/// Something that picks a column to play
pub trait Strategy {
    /// A short description shown to the user
    fn name(&self) -> &str;

    /// Tells the strategy which player it is playing as
    fn set_identity(&mut self, player: Player);

    /// Picks a column for the board, which is the strategy's own copy of the game
    ///
    /// Columns that are full or off the board are invalid moves and forfeit the game.
    fn choose_move(&mut self, board: Board) -> usize;
}

/// Chooses moves with a [`Solver`]
pub struct SearchStrategy {
    player: Player,
    config: SearchConfig,
}

impl SearchStrategy {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            player: Player::One,
            config,
        }
    }
}

impl Default for SearchStrategy {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Strategy for SearchStrategy {
    fn name(&self) -> &str {
        "search"
    }

    fn set_identity(&mut self, player: Player) {
        self.player = player;
    }

    fn choose_move(&mut self, board: Board) -> usize {
        let start = Instant::now();
        let mut solver = Solver::new(board).with_config(self.config);

        match solver.search_default(self.player) {
            Some(best) => {
                tracing::info!(
                    player = self.player.number(),
                    column = best.column,
                    score = best.score,
                    nodes = solver.node_count,
                    elapsed_secs = start.elapsed().as_secs_f64(),
                    "search chose a move"
                );
                best.column
            }
            None => {
                // only reachable on a full board, the game is over before that
                tracing::error!(player = self.player.number(), "no open column to search");
                0
            }
        }
    }
}

/// Chooses uniformly among the open columns
pub struct RandomStrategy {
    player: Player,
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            player: Player::One,
            rng: StdRng::from_entropy(),
        }
    }

    /// A random strategy that makes the same choices on every run
    pub fn with_seed(seed: u64) -> Self {
        Self {
            player: Player::One,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn set_identity(&mut self, player: Player) {
        self.player = player;
    }

    fn choose_move(&mut self, board: Board) -> usize {
        let column = board.open_columns().choose(&mut self.rng).unwrap_or(0);
        tracing::debug!(player = self.player.number(), column, "random move");
        column
    }
}
