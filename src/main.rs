use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;

use std::io::{stdin, stdout, Write};

use connect4_ai::{
    game::{play_series, Game, GameResult},
    search::SearchConfig,
    strategy::{RandomStrategy, SearchStrategy, Strategy},
    DEFAULT_DEPTH, MAX_DEPTH,
};

mod terminal;
use terminal::*;

/// Environment variable holding the log level (error, warn, info, debug or trace)
const LOG_ENV: &str = "CONNECT4_LOG";

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Controller {
    Human,
    Search,
    Random,
}

impl Controller {
    fn build(self, config: SearchConfig) -> Box<dyn Strategy> {
        match self {
            Controller::Human => Box::new(HumanStrategy::new()),
            Controller::Search => Box::new(SearchStrategy::new(config)),
            Controller::Random => Box::new(RandomStrategy::new()),
        }
    }
}

fn ask(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    stdout().flush()?;
    let buffer = read_answer(&mut stdin().lock())?;
    Ok(buffer.trim().to_lowercase())
}

fn ask_controller(player: usize) -> Result<Controller> {
    loop {
        let answer = ask(&format!(
            "Who controls player {}? (h)uman, (s)earch AI, (r)andom AI: ",
            player
        ))?;
        match answer.chars().next() {
            Some('h') => return Ok(Controller::Human),
            Some('s') => return Ok(Controller::Search),
            Some('r') => return Ok(Controller::Random),
            _ => println!("Unknown answer given"),
        }
    }
}

fn ask_yes_no(prompt: &str) -> Result<bool> {
    loop {
        match ask(prompt)?.chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

// a blank answer picks the default
fn ask_number(prompt: &str, default: usize) -> Result<usize> {
    loop {
        let answer = ask(prompt)?;
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse::<usize>() {
            Ok(number) => return Ok(number),
            Err(_) => println!("Invalid number: {}", answer),
        }
    }
}

// a blank answer picks the default depth
fn parse_depth(answer: &str) -> Result<u32> {
    if answer.is_empty() {
        return Ok(DEFAULT_DEPTH);
    }
    let depth = answer
        .parse::<u32>()
        .map_err(|_| anyhow!("Invalid number: {}", answer))?;
    if depth > MAX_DEPTH {
        return Err(anyhow!("Search depth must be at most {}", MAX_DEPTH));
    }
    Ok(depth)
}

fn ask_depth() -> Result<u32> {
    loop {
        let answer = ask(&format!(
            "Search depth, 0 to {} (blank for {}): ",
            MAX_DEPTH, DEFAULT_DEPTH
        ))?;
        match parse_depth(&answer) {
            Ok(depth) => return Ok(depth),
            Err(err) => println!("{}", err),
        }
    }
}

fn init_logging() {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    println!("Welcome to Connect 4\n");

    let controllers = (ask_controller(1)?, ask_controller(2)?);

    let mut config = SearchConfig::default();
    if controllers.0 == Controller::Search || controllers.1 == Controller::Search {
        config = config
            .with_depth(ask_depth()?)
            .with_parallel(ask_yes_no("Search on all cores? y/n: ")?);
    }

    let human_playing = controllers.0 == Controller::Human || controllers.1 == Controller::Human;
    let games = if human_playing {
        1
    } else {
        ask_number("Number of games (blank for 1): ", 1)?
    };

    if games > 1 {
        let progress = ProgressBar::new(games as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {wide_bar} {pos}/{len} games")
                .progress_chars("##-"),
        );
        let tally = play_series(
            games,
            || Game::new(controllers.0.build(config), controllers.1.build(config)),
            |_| progress.inc(1),
        );
        progress.finish_and_clear();

        println!(
            "Player 1 won {}, player 2 won {}, {} ties ({} forfeits)",
            tally.player_one_wins, tally.player_two_wins, tally.ties, tally.forfeits
        );
        return Ok(());
    }

    let mut game = Game::new(controllers.0.build(config), controllers.1.build(config));
    render(&connect4_ai::board::Board::new())?;
    let report = game.play_with(|board, player, column| {
        println!("{} played column {}", player, column + 1);
        if let Err(err) = render(board) {
            println!("Failed to draw board: {}", err);
        }
    });

    if report.forfeit {
        if let Some(&column) = report.moves.last() {
            println!("Invalid move in column {}, forfeit!", column.wrapping_add(1));
        }
    }
    match report.result {
        GameResult::Winner(player) => println!("{} wins!", player),
        GameResult::Tie => println!("Draw!"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_answers() -> Result<()> {
        assert_eq!(parse_depth("")?, DEFAULT_DEPTH);
        assert_eq!(parse_depth("0")?, 0);
        assert_eq!(parse_depth(&MAX_DEPTH.to_string())?, MAX_DEPTH);
        assert!(parse_depth(&(MAX_DEPTH + 1).to_string()).is_err());
        assert!(parse_depth("40").is_err());
        // too large for u32, rejected rather than truncated
        assert!(parse_depth("4294967303").is_err());
        assert!(parse_depth("-1").is_err());
        assert!(parse_depth("deep").is_err());
        Ok(())
    }
}
