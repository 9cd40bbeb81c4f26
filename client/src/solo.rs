//! Offline single-player game loop

use crate::game::{ClientGameState, Finder, GuessOutcome};
use crate::input::{parse_command, Command, HELP_TEXT};
use crate::progression::{GameMode, Progression};
use crate::rendering::{render_game, render_timer};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::catalog::choose_category;
use shared::{generate, LayoutConfig};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Won,
    TimedOut,
    Quit,
}

/// One puzzle played against the clock (or not).
pub struct SoloRound {
    game: ClientGameState,
    limit: Option<Duration>,
}

impl SoloRound {
    pub fn generate<R: Rng + ?Sized>(layout: &LayoutConfig, mode: GameMode, rng: &mut R) -> Self {
        let category = choose_category(rng);
        let words = category.choose_words(layout.word_count, rng);
        let generated = generate(&words, layout, rng);
        if !generated.is_complete() {
            warn!("Dropping unplaceable words: {:?}", generated.unplaced);
        }

        let words = generated.placed_words();
        let game = ClientGameState::new(
            generated.grid,
            words,
            category.name,
            layout.allow_reverse,
        );
        Self::from_game(game, mode.time_limit())
    }

    pub fn from_game(game: ClientGameState, limit: Option<Duration>) -> Self {
        Self { game, limit }
    }

    pub fn game(&self) -> &ClientGameState {
        &self.game
    }

    /// Checks a guess and records it on a hit.
    pub fn submit(&mut self, guess: &str) -> GuessOutcome {
        let outcome = self.game.check_guess(guess);
        if let GuessOutcome::Hit(placement) = &outcome {
            self.game.mark_found(&placement.word, Finder::Me);
        }
        outcome
    }
}

/// Plays `round` until it is won, the clock runs out or input ends.
pub async fn play_round<R>(round: &mut SoloRound, lines: &mut Lines<R>) -> std::io::Result<RoundOutcome>
where
    R: AsyncBufRead + Unpin,
{
    let deadline = round.limit.map(|limit| Instant::now() + limit);
    println!("{}", render_game(round.game()));

    loop {
        let line = match deadline {
            Some(deadline) => tokio::select! {
                line = lines.next_line() => line?,
                _ = sleep_until(deadline) => return Ok(RoundOutcome::TimedOut),
            },
            None => lines.next_line().await?,
        };
        let Some(line) = line else {
            return Ok(RoundOutcome::Quit);
        };

        match parse_command(&line) {
            Command::Guess(word) => match round.submit(&word) {
                GuessOutcome::Hit(_) => {
                    println!("{}", render_game(round.game()));
                    if round.game().is_complete() {
                        return Ok(RoundOutcome::Won);
                    }
                }
                GuessOutcome::AlreadyFound => println!("{} is already found", word),
                GuessOutcome::NotInList | GuessOutcome::NotInGrid => {
                    println!("{} is not one of the words", word)
                }
            },
            Command::Quit => return Ok(RoundOutcome::Quit),
            Command::Help => println!("{}", HELP_TEXT),
            Command::Start => println!("Nothing to start in solo mode"),
            Command::Invalid(text) => println!("Not a word: {}", text),
            Command::Empty => {}
        }

        if let Some(deadline) = deadline {
            println!(
                "Time left: {}",
                render_timer(deadline.saturating_duration_since(Instant::now()))
            );
        }
    }
}

/// Endless sequence of rounds, one level up per win.
pub struct SoloGame {
    progression: Progression,
    mode: GameMode,
    rng: StdRng,
}

impl SoloGame {
    pub fn new(level: u32, mode: GameMode) -> Self {
        Self {
            progression: Progression::new(level),
            mode,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{}", HELP_TEXT);

        loop {
            let level = self.progression.level();
            let mut round = SoloRound::generate(&self.progression.layout(), self.mode, &mut self.rng);
            info!("Starting level {} in {} mode", level, self.mode);
            println!("Level {} ({})", level, self.mode);

            match play_round(&mut round, &mut lines).await? {
                RoundOutcome::Won => {
                    println!("You found every word! Advancing to level {}", level + 1);
                    self.progression.advance();
                }
                RoundOutcome::TimedOut => {
                    println!("Time's up! Try level {} again", level);
                }
                RoundOutcome::Quit => break,
            }
        }

        Ok(())
    }
}
