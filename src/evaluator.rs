//! Static positional heuristic used at the search frontier
//!
//! # Scoring
//! Two independent scans are made over the board, one column by column and
//! one row by row. Each scan adds the weight of every cell occupied by the
//! perspective player, subtracts the weight of every cell occupied by the
//! opponent, and adds or subtracts a fixed bonus for every run of three or
//! more tiles. The higher of the two scan totals is the score of the board.
//!
//! The row scan lets the perspective player's runs bridge a single empty
//! cell (`XX_X` counts as a run of three) while the opponent's runs must be
//! contiguous, so the heuristic is deliberately not symmetric between the
//! players.

use crate::board::{Board, Cell, Player};
use crate::{BOARD_SIZE, CONNECT_GOAL};

/// The number of times each cell can be part of a line of four, indexed by row then column
pub const WEIGHTS: [[i32; BOARD_SIZE]; BOARD_SIZE] = [
    [3, 4, 5, 7, 5, 4, 3],
    [4, 6, 8, 10, 8, 6, 4],
    [5, 8, 11, 13, 11, 8, 5],
    [7, 10, 13, 16, 13, 10, 7],
    [5, 8, 11, 13, 11, 8, 5],
    [4, 6, 8, 10, 8, 6, 4],
    [3, 4, 5, 7, 5, 4, 3],
];

/// Scale applied to the summed cell weights
pub const WEIGHT_SCALE: f64 = 0.001;

/// Score for each qualifying run of tiles
pub const RUN_BONUS: f64 = 0.05;

/// The shortest run that earns a bonus
pub const RUN_LENGTH: usize = CONNECT_GOAL - 1;

/// Heuristic scores are kept strictly inside the proven win/loss scores
pub const SCORE_LIMIT: f64 = 0.99;

/// Estimates how favourable `board` is for `player`
///
/// Positive scores favour `player`, negative scores favour the opponent.
/// The result lies in `[-SCORE_LIMIT, SCORE_LIMIT]`.
pub fn evaluate(board: &Board, player: Player) -> f64 {
    let column = column_scan(board, player);
    let row = row_scan(board, player);
    column.max(row).max(-SCORE_LIMIT).min(SCORE_LIMIT)
}

fn weight(board: &Board, row: usize, column: usize, player: Player) -> i32 {
    match board.at(row, column).player() {
        Some(owner) if owner == player => WEIGHTS[row][column],
        Some(_) => -WEIGHTS[row][column],
        None => 0,
    }
}

fn run_bonus(owner: Player, player: Player) -> f64 {
    if owner == player {
        RUN_BONUS
    } else {
        -RUN_BONUS
    }
}

/// Column by column total; each column is walked upwards until its first empty cell
pub(crate) fn column_scan(board: &Board, player: Player) -> f64 {
    let mut weighted_sum = 0;
    let mut bonus = 0.0;

    for column in 0..BOARD_SIZE {
        let mut run: Option<(Player, usize)> = None;
        for row in 0..BOARD_SIZE {
            let owner = match board.at(row, column).player() {
                Some(owner) => owner,
                // everything above an empty cell is empty
                None => break,
            };
            weighted_sum += weight(board, row, column, player);
            run = match run {
                Some((run_owner, length)) if run_owner == owner => Some((owner, length + 1)),
                Some((run_owner, length)) => {
                    if length >= RUN_LENGTH {
                        bonus += run_bonus(run_owner, player);
                    }
                    Some((owner, 1))
                }
                None => Some((owner, 1)),
            };
        }
        if let Some((run_owner, length)) = run {
            if length >= RUN_LENGTH {
                bonus += run_bonus(run_owner, player);
            }
        }
    }

    weighted_sum as f64 * WEIGHT_SCALE + bonus
}

/// Row by row total, stopping at the first row without any tiles
pub(crate) fn row_scan(board: &Board, player: Player) -> f64 {
    let mut weighted_sum = 0;
    let mut bonus = 0.0;

    for row in 0..BOARD_SIZE {
        if (0..BOARD_SIZE).all(|column| board.at(row, column).is_empty()) {
            break;
        }
        for column in 0..BOARD_SIZE {
            weighted_sum += weight(board, row, column, player);
        }

        let mut column = 0;
        while column < BOARD_SIZE {
            let owner = match board.at(row, column).player() {
                Some(owner) => owner,
                None => {
                    column += 1;
                    continue;
                }
            };
            let (length, end) = if owner == player {
                gapped_run(board, row, column, owner)
            } else {
                contiguous_run(board, row, column, owner)
            };
            if length >= RUN_LENGTH {
                bonus += run_bonus(owner, player);
            }
            column = end;
        }
    }

    weighted_sum as f64 * WEIGHT_SCALE + bonus
}

// length of the run of `owner` tiles starting at `column`, and the first column after it
fn contiguous_run(board: &Board, row: usize, column: usize, owner: Player) -> (usize, usize) {
    let mut end = column;
    while end < BOARD_SIZE && board.at(row, end) == owner.cell() {
        end += 1;
    }
    (end - column, end)
}

// as `contiguous_run`, but one empty cell between two `owner` tiles does not end the run
fn gapped_run(board: &Board, row: usize, column: usize, owner: Player) -> (usize, usize) {
    let mut length = 0;
    let mut gap_used = false;
    let mut end = column;
    while end < BOARD_SIZE {
        let cell = board.at(row, end);
        if cell == owner.cell() {
            length += 1;
        } else if cell == Cell::Empty
            && !gap_used
            && end + 1 < BOARD_SIZE
            && board.at(row, end + 1) == owner.cell()
        {
            gap_used = true;
        } else {
            break;
        }
        end += 1;
    }
    (length, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn weight_table_symmetry() {
        for row in 0..BOARD_SIZE {
            for column in 0..BOARD_SIZE {
                let weight = WEIGHTS[row][column];
                assert_eq!(weight, WEIGHTS[BOARD_SIZE - 1 - row][column]);
                assert_eq!(weight, WEIGHTS[row][BOARD_SIZE - 1 - column]);
                assert_eq!(weight, WEIGHTS[BOARD_SIZE - 1 - row][BOARD_SIZE - 1 - column]);
            }
        }
        assert_eq!(WEIGHTS[3][3], 16);
    }

    #[test]
    fn empty_board_scores_zero() {
        let board = Board::new();
        assert_eq!(column_scan(&board, Player::One), 0.0);
        assert_eq!(row_scan(&board, Player::Two), 0.0);
        assert_eq!(evaluate(&board, Player::One), 0.0);
    }

    #[test]
    fn single_tile_weight() -> Result<()> {
        // player 1 in the centre of the bottom row
        let board = Board::from_moves("4")?;
        let expected = WEIGHTS[0][3] as f64 * WEIGHT_SCALE;
        assert!((column_scan(&board, Player::One) - expected).abs() < 1e-12);
        assert!((column_scan(&board, Player::Two) + expected).abs() < 1e-12);
        assert!((evaluate(&board, Player::One) - expected).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn column_scan_is_antisymmetric() -> Result<()> {
        for moves in ["4455", "1111222", "4444333", "1234567123", "776655"].iter() {
            let board = Board::from_moves(moves)?;
            let one = column_scan(&board, Player::One);
            let two = column_scan(&board, Player::Two);
            assert!((one + two).abs() < 1e-12, "{}: {} vs {}", moves, one, two);
        }
        Ok(())
    }

    #[test]
    fn vertical_run_bonus() {
        let mut board = Board::new();
        for _ in 0..3 {
            board.place(Player::One, 0);
        }
        let weights = (WEIGHTS[0][0] + WEIGHTS[1][0] + WEIGHTS[2][0]) as f64 * WEIGHT_SCALE;
        assert!((column_scan(&board, Player::One) - (weights + RUN_BONUS)).abs() < 1e-12);
        assert!((column_scan(&board, Player::Two) + (weights + RUN_BONUS)).abs() < 1e-12);
    }

    #[test]
    fn row_gap_tolerated_for_own_runs_only() {
        // X X _ X along the bottom row
        let mut board = Board::new();
        for &column in [0, 1, 3].iter() {
            board.place(Player::One, column);
        }
        let weights = (WEIGHTS[0][0] + WEIGHTS[0][1] + WEIGHTS[0][3]) as f64 * WEIGHT_SCALE;

        // counted as a run for its owner
        assert!((row_scan(&board, Player::One) - (weights + RUN_BONUS)).abs() < 1e-12);
        // but not held against the opponent
        assert!((row_scan(&board, Player::Two) + weights).abs() < 1e-12);
    }

    #[test]
    fn row_gap_only_bridges_one_cell() {
        // X _ _ X X
        let mut board = Board::new();
        for &column in [0, 3, 4].iter() {
            board.place(Player::One, column);
        }
        let weights = (WEIGHTS[0][0] + WEIGHTS[0][3] + WEIGHTS[0][4]) as f64 * WEIGHT_SCALE;
        assert!((row_scan(&board, Player::One) - weights).abs() < 1e-12);
    }

    #[test]
    fn contiguous_opponent_row_penalised() {
        let mut board = Board::new();
        for column in 2..5 {
            board.place(Player::Two, column);
        }
        let weights = (WEIGHTS[0][2] + WEIGHTS[0][3] + WEIGHTS[0][4]) as f64 * WEIGHT_SCALE;
        assert!((row_scan(&board, Player::One) + weights + RUN_BONUS).abs() < 1e-12);
    }

    #[test]
    fn evaluation_takes_higher_scan() -> Result<()> {
        // X X _ X in row 0 for player 1, with player 2 stacked in column 6
        let board = Board::from_moves("17274")?;
        let column = column_scan(&board, Player::One);
        let row = row_scan(&board, Player::One);
        assert!(row > column);
        assert_eq!(evaluate(&board, Player::One), row);
        Ok(())
    }
}
