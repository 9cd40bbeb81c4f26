//! Plain-text rendering of the puzzle and the scoreboard
//!
//! Everything renders to a `String` so the output can be printed as-is or
//! inspected in tests. Letters of words found by this player are wrapped in
//! brackets, letters found by opponents in parentheses.

use crate::game::{ClientGameState, Finder};
use shared::Player;
use std::fmt::Write;
use std::time::Duration;

pub fn render_grid(game: &ClientGameState) -> String {
    let (mine, theirs) = game.highlighted_cells();
    let mut out = String::new();

    for (y, row) in game.grid().rows().enumerate() {
        for (x, letter) in row.iter().enumerate() {
            let cell = if mine.contains(&(x, y)) {
                format!("[{}]", letter)
            } else if theirs.contains(&(x, y)) {
                format!("({})", letter)
            } else {
                format!(" {} ", letter)
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out
}

pub fn render_word_list(game: &ClientGameState) -> String {
    let mut out = format!(
        "{} - {}/{} found\n",
        game.category(),
        game.found_count(),
        game.words().len()
    );
    for word in game.words() {
        let marker = match game.finder_of(word) {
            Some(Finder::Me) => "[x]".to_string(),
            Some(Finder::Opponent(id)) => format!("[{}]", id),
            None => "[ ]".to_string(),
        };
        let _ = writeln!(out, "  {} {}", marker, word);
    }
    out
}

/// One line per player in the given order, marking this client's row.
pub fn render_scoreboard(players: &[Player], client_id: Option<u32>) -> String {
    let mut out = String::new();
    for (rank, player) in players.iter().enumerate() {
        let me = if Some(player.id) == client_id { " (you)" } else { "" };
        let _ = writeln!(
            out,
            "{:>2}. {:<10} {:>5}{}",
            rank + 1,
            player.display_name,
            player.score,
            me
        );
    }
    out
}

pub fn render_timer(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn render_game(game: &ClientGameState) -> String {
    format!("{}\n{}", render_grid(game), render_word_list(game))
}
