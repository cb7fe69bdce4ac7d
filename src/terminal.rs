use anyhow::{anyhow, Result};
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdin, stdout, BufRead, Write};

use connect4_ai::{
    board::{Board, Cell, Player},
    strategy::Strategy,
    BOARD_SIZE,
};

/// Draws the board at the cursor, player 1 in red and player 2 in yellow
pub fn render(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (1..=BOARD_SIZE).map(|x| x.to_string()).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;
    for _ in 0..BOARD_SIZE {
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;

    let (origin_x, origin_y) = crossterm::cursor::position()?;

    for row in 0..BOARD_SIZE {
        for column in 0..BOARD_SIZE {
            let cell = board.get(row, column).unwrap_or(Cell::Empty);
            let (pos_x, pos_y) = cell_position((origin_x, origin_y), row, column);
            stdout
                .queue(MoveTo(pos_x, pos_y))?
                .queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match cell {
                            Cell::PlayerOne => Color::Red,
                            Cell::PlayerTwo => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
        }
    }
    stdout
        .queue(MoveTo(origin_x + BOARD_SIZE as u16, origin_y))?
        .queue(PrintStyledContent(style("\n")))?;
    stdout.flush()?;
    Ok(())
}

// rows are drawn upwards from the origin, clamped to the top of a short terminal
fn cell_position(origin: (u16, u16), row: usize, column: usize) -> (u16, u16) {
    (
        origin.0.saturating_add(column as u16),
        origin.1.saturating_sub(row as u16),
    )
}

/// Reads one-indexed columns from stdin
pub struct HumanStrategy {
    player: Player,
}

impl HumanStrategy {
    pub fn new() -> Self {
        Self {
            player: Player::One,
        }
    }

    fn read_column(&self, board: &Board) -> Result<usize> {
        loop {
            print!("{} move input > ", self.player);
            stdout().flush()?;
            let input_str = read_answer(&mut stdin().lock())?;

            match parse_column(&input_str, board) {
                Ok(column) => return Ok(column),
                Err(err) => println!("{}, try the move again", err),
            }
        }
    }
}

/// Reads one line of input, failing once the input is closed
pub fn read_answer<R: BufRead>(input: &mut R) -> Result<String> {
    let mut buffer = String::new();
    if input.read_line(&mut buffer)? == 0 {
        return Err(anyhow!("stdin closed"));
    }
    Ok(buffer)
}

/// Parses a one-indexed column that is open on `board`
pub fn parse_column(input: &str, board: &Board) -> Result<usize> {
    let column = input
        .trim()
        .parse::<usize>()
        .map_err(|_| anyhow!("Invalid number: {}", input.trim()))?;
    if column < 1 || column > BOARD_SIZE {
        return Err(anyhow!(
            "Invalid move, column {} out of range. Columns must be between 1 and {}",
            column,
            BOARD_SIZE
        ));
    }
    if !board.is_column_open(column - 1) {
        return Err(anyhow!("Invalid move, column {} full", column));
    }
    Ok(column - 1)
}

impl Strategy for HumanStrategy {
    fn name(&self) -> &str {
        "human"
    }

    fn set_identity(&mut self, player: Player) {
        self.player = player;
    }

    fn choose_move(&mut self, board: Board) -> usize {
        match self.read_column(&board) {
            Ok(column) => column,
            Err(err) => {
                // a closed or unreadable stdin forfeits the game
                tracing::error!("failed to read move: {}", err);
                BOARD_SIZE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_one_indexed() -> Result<()> {
        let board = Board::new();
        assert_eq!(parse_column("1", &board)?, 0);
        assert_eq!(parse_column(" 7\n", &board)?, BOARD_SIZE - 1);
        Ok(())
    }

    #[test]
    fn cell_positions_stay_on_screen() {
        assert_eq!(cell_position((2, 10), 0, 0), (2, 10));
        assert_eq!(cell_position((2, 10), 3, 4), (6, 7));
        // a terminal shorter than the board
        assert_eq!(cell_position((0, 3), BOARD_SIZE - 1, 1), (1, 0));
    }

    #[test]
    fn closed_input_is_an_error() -> Result<()> {
        let mut input = "4\n".as_bytes();
        assert_eq!(read_answer(&mut input)?, "4\n");
        assert!(read_answer(&mut input).is_err());

        let mut blank = "\n".as_bytes();
        assert_eq!(read_answer(&mut blank)?, "\n");
        Ok(())
    }

    #[test]
    fn invalid_columns_are_rejected() -> Result<()> {
        let board = Board::from_moves("1111111")?;
        assert!(parse_column("", &board).is_err());
        assert!(parse_column("x", &board).is_err());
        assert!(parse_column("-1", &board).is_err());
        assert!(parse_column("0", &board).is_err());
        assert!(parse_column("8", &board).is_err());
        // column 1 is full
        assert!(parse_column("1", &board).is_err());
        assert_eq!(parse_column("2", &board)?, 1);
        Ok(())
    }
}
