//! Turn-taking between two strategies

use rayon::prelude::*;

use crate::board::{Board, Outcome, Player};
use crate::strategy::Strategy;

/// How a finished game ended
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameResult {
    Winner(Player),
    Tie,
}

impl GameResult {
    /// 0 for a tie, otherwise the winning player's number
    pub fn code(self) -> i32 {
        match self {
            GameResult::Winner(player) => player.number(),
            GameResult::Tie => 0,
        }
    }
}

/// The record of one played game
#[derive(Clone, Debug)]
pub struct GameReport {
    pub result: GameResult,
    /// Whether the loser forfeited by making an invalid move
    pub forfeit: bool,
    /// The columns played, in order; a forfeiting move is included
    pub moves: Vec<usize>,
    pub board: Board,
}

/// A game between two strategies, player 1 moving first
pub struct Game {
    player_one: Box<dyn Strategy>,
    player_two: Box<dyn Strategy>,
}

impl Game {
    pub fn new(mut player_one: Box<dyn Strategy>, mut player_two: Box<dyn Strategy>) -> Self {
        player_one.set_identity(Player::One);
        player_two.set_identity(Player::Two);
        Self {
            player_one,
            player_two,
        }
    }

    /// Plays a game from an empty board
    pub fn play(&mut self) -> GameReport {
        self.play_with(|_, _, _| {})
    }

    /// Plays a game from an empty board, calling `observer` with the board, the
    /// player who just moved and their column after every valid move
    ///
    /// Each strategy is handed its own copy of the board. A strategy that picks
    /// a full or off-board column loses the game on the spot.
    pub fn play_with<F: FnMut(&Board, Player, usize)>(&mut self, mut observer: F) -> GameReport {
        let mut board = Board::new();
        let mut moves = Vec::new();
        let mut player = Player::One;

        loop {
            let strategy = match player {
                Player::One => &mut self.player_one,
                Player::Two => &mut self.player_two,
            };
            let column = strategy.choose_move(board);
            moves.push(column);

            if !board.place(player, column) {
                tracing::warn!(player = player.number(), column, "invalid move, player forfeits");
                return self.finish(GameResult::Winner(player.opponent()), true, moves, board);
            }
            observer(&board, player, column);

            match board.check_terminal(column) {
                Outcome::Ongoing => player = player.opponent(),
                Outcome::Tie => return self.finish(GameResult::Tie, false, moves, board),
                Outcome::Win(winner) => {
                    return self.finish(GameResult::Winner(winner), false, moves, board)
                }
            }
        }
    }

    fn finish(
        &self,
        result: GameResult,
        forfeit: bool,
        moves: Vec<usize>,
        board: Board,
    ) -> GameReport {
        tracing::info!(
            result = result.code(),
            forfeit,
            moves = moves.len(),
            player_one = self.player_one.name(),
            player_two = self.player_two.name(),
            "game over"
        );
        GameReport {
            result,
            forfeit,
            moves,
            board,
        }
    }
}

/// Win counts over a series of games
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct SeriesTally {
    pub player_one_wins: usize,
    pub player_two_wins: usize,
    pub ties: usize,
    pub forfeits: usize,
}

impl SeriesTally {
    pub fn record(&mut self, report: &GameReport) {
        match report.result {
            GameResult::Winner(Player::One) => self.player_one_wins += 1,
            GameResult::Winner(Player::Two) => self.player_two_wins += 1,
            GameResult::Tie => self.ties += 1,
        }
        if report.forfeit {
            self.forfeits += 1;
        }
    }

    pub fn games(&self) -> usize {
        self.player_one_wins + self.player_two_wins + self.ties
    }

    fn merge(mut self, other: Self) -> Self {
        self.player_one_wins += other.player_one_wins;
        self.player_two_wins += other.player_two_wins;
        self.ties += other.ties;
        self.forfeits += other.forfeits;
        self
    }
}

/// Plays `games` independent games in parallel, each created by `new_game`
///
/// `on_finish` is called from the worker threads as each game ends.
pub fn play_series<N, F>(games: usize, new_game: N, on_finish: F) -> SeriesTally
where
    N: Fn() -> Game + Sync,
    F: Fn(&GameReport) + Sync,
{
    (0..games)
        .into_par_iter()
        .map(|_| {
            let report = new_game().play();
            on_finish(&report);
            let mut tally = SeriesTally::default();
            tally.record(&report);
            tally
        })
        .reduce(SeriesTally::default, SeriesTally::merge)
}
