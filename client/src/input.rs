//! Parsing of the lines typed during a game

/// A typed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A word guess, uppercased
    Guess(String),
    Start,
    Quit,
    Help,
    /// Anything that is neither a command nor a plausible word
    Invalid(String),
    Empty,
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    match trimmed.to_lowercase().as_str() {
        "/start" | "start" => return Command::Start,
        "/quit" | "quit" | "exit" => return Command::Quit,
        "/help" | "help" | "?" => return Command::Help,
        _ => {}
    }

    if trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Command::Guess(trimmed.to_ascii_uppercase())
    } else {
        Command::Invalid(trimmed.to_string())
    }
}

pub const HELP_TEXT: &str = "Type a word you found in the grid and press Enter.\n\
Commands: start (host only, online), quit, help";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guesses_are_uppercased() {
        assert_eq!(parse_command("  jaguar\n"), Command::Guess("JAGUAR".to_string()));
        assert_eq!(parse_command("Zelda"), Command::Guess("ZELDA".to_string()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_command("start"), Command::Start);
        assert_eq!(parse_command("/START"), Command::Start);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("exit"), Command::Quit);
        assert_eq!(parse_command("?"), Command::Help);
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            parse_command("star wars"),
            Command::Invalid("star wars".to_string())
        );
        assert_eq!(parse_command("abc1"), Command::Invalid("abc1".to_string()));
    }
}
