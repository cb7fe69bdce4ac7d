//! A depth-limited negamax search for choosing moves

use rayon::prelude::*;

use crate::board::{Board, Outcome, Player};
use crate::evaluator::evaluate;
use crate::DEFAULT_DEPTH;

/// The score of a move that wins the game
pub const WIN_SCORE: f64 = 1.0;
/// The score of a move that loses the game
pub const LOSS_SCORE: f64 = -1.0;
/// The score of a move that ends the game in a tie
pub const TIE_SCORE: f64 = 0.0;

/// A column together with its score from the perspective of the player making it
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Move {
    pub column: usize,
    pub score: f64,
}

/// Settings for a [`Solver`]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SearchConfig {
    /// The number of further plies searched below each candidate move
    pub depth: u32,
    /// Search the candidate moves of the root position on separate threads
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            parallel: false,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// An agent to choose Connect 4 moves by looking a fixed number of moves ahead
///
/// # Position Scoring
/// Moves that end the game are scored exactly: 1 for a win, -1 for a loss and
/// 0 for a tie. Once the depth limit is reached the position is scored by the
/// heuristic in [`crate::evaluator`], which always lies strictly between -1
/// and 1. The score of a move that leads to further play is the negation of
/// the opponent's best reply score.
///
/// Among equally scored moves the lowest column is chosen.
#[derive(Clone)]
pub struct Solver {
    board: Board,
    config: SearchConfig,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl Solver {
    /// Creates a new `Solver` for a board with the default configuration
    pub fn new(board: Board) -> Self {
        Self {
            board,
            config: SearchConfig::default(),
            node_count: 0,
        }
    }

    /// Replaces the configuration of an existing `Solver`
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Searches with the configured depth and threading
    ///
    /// Returns `None` if no column is open.
    pub fn search_default(&mut self, player: Player) -> Option<Move> {
        if self.config.parallel {
            self.search_parallel(self.config.depth, player)
        } else {
            self.search(self.config.depth, player)
        }
    }

    /// Finds the best move for `player`, looking `depth` plies beyond each candidate move
    ///
    /// Returns `None` if no column is open.
    pub fn search(&mut self, depth: u32, player: Player) -> Option<Move> {
        let mut node_count = 0;
        let best = negamax(&mut self.board, depth, player, &mut node_count);
        self.node_count += node_count;
        best
    }

    /// As [`Solver::search`], with each root move searched on its own board copy in parallel
    pub fn search_parallel(&mut self, depth: u32, player: Player) -> Option<Move> {
        let board = self.board;
        let results: Vec<(Move, usize)> = board
            .open_columns()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|column| {
                let mut board = board;
                let mut node_count = 0;
                let score = score_move(&mut board, depth, player, column, &mut node_count);
                (Move { column, score }, node_count)
            })
            .collect();

        // collect keeps the ascending column order, so ties resolve as in the sequential search
        self.node_count += 1 + results.iter().map(|(_, nodes)| nodes).sum::<usize>();
        best_move(results.into_iter().map(|(candidate, _)| candidate))
    }
}

impl std::ops::Deref for Solver {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

/// Performs game tree search on `board`, which is restored before returning
fn negamax(board: &mut Board, depth: u32, player: Player, node_count: &mut usize) -> Option<Move> {
    *node_count += 1;

    let mut candidates = Vec::with_capacity(crate::BOARD_SIZE);
    for column in 0..crate::BOARD_SIZE {
        if !board.is_column_open(column) {
            continue;
        }
        let score = score_move(board, depth, player, column, node_count);
        candidates.push(Move { column, score });
    }

    let best = best_move(candidates);
    tracing::trace!(depth, player = player.number(), ?best, "searched position");
    best
}

/// Scores `player` dropping a tile in the open `column`
fn score_move(
    board: &mut Board,
    depth: u32,
    player: Player,
    column: usize,
    node_count: &mut usize,
) -> f64 {
    let mut placed = match board.place_guarded(player, column) {
        Some(placed) => placed,
        None => return LOSS_SCORE,
    };

    match placed.check_terminal(column) {
        Outcome::Tie => TIE_SCORE,
        Outcome::Win(winner) if winner == player => WIN_SCORE,
        Outcome::Win(_) => LOSS_SCORE,
        Outcome::Ongoing if depth == 0 => evaluate(&placed, player),
        // a position that is good for the opponent is equally bad for us
        Outcome::Ongoing => negamax(&mut placed, depth - 1, player.opponent(), node_count)
            .map_or(TIE_SCORE, |reply| -reply.score),
    }
}

/// The first candidate with the strictly greatest score
fn best_move<I: IntoIterator<Item = Move>>(candidates: I) -> Option<Move> {
    let mut best: Option<Move> = None;
    for candidate in candidates {
        if best.map_or(true, |best| candidate.score > best.score) {
            best = Some(candidate);
        }
    }
    best
}
