//! Client-side puzzle state: the grid, the target words and who found what

use log::debug;
use shared::{Grid, Placement};
use std::collections::{HashMap, HashSet};

/// Who found a word, from this client's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finder {
    Me,
    Opponent(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// A target word present in the grid and not yet found.
    Hit(Placement),
    AlreadyFound,
    NotInList,
    /// A target word that could not be traced in the grid.
    NotInGrid,
}

#[derive(Debug, Clone)]
pub struct ClientGameState {
    grid: Grid,
    words: Vec<String>,
    category: String,
    allow_reverse: bool,
    found: HashMap<String, (Finder, Placement)>,
}

impl ClientGameState {
    pub fn new(grid: Grid, words: Vec<String>, category: impl Into<String>, allow_reverse: bool) -> Self {
        Self {
            grid,
            words,
            category: category.into(),
            allow_reverse,
            found: HashMap::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Target words in display order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn finder_of(&self, word: &str) -> Option<Finder> {
        self.found.get(word).map(|(finder, _)| *finder)
    }

    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    pub fn is_complete(&self) -> bool {
        !self.words.is_empty() && self.found.len() == self.words.len()
    }

    /// Checks a typed guess without recording it.
    pub fn check_guess(&self, guess: &str) -> GuessOutcome {
        let word = guess.trim().to_uppercase();
        if !self.words.contains(&word) {
            return GuessOutcome::NotInList;
        }
        if self.found.contains_key(&word) {
            return GuessOutcome::AlreadyFound;
        }
        match self.grid.locate(&word, self.allow_reverse) {
            Some(placement) => GuessOutcome::Hit(placement),
            None => GuessOutcome::NotInGrid,
        }
    }

    /// Records `word` as found. A later record for the same word replaces the
    /// finder, which lets the server's verdict override a local claim.
    pub fn mark_found(&mut self, word: &str, finder: Finder) -> bool {
        let word = word.trim().to_uppercase();
        if !self.words.contains(&word) {
            return false;
        }
        let placement = match self.found.get(&word) {
            Some((_, placement)) => placement.clone(),
            None => match self.grid.locate(&word, self.allow_reverse) {
                Some(placement) => placement,
                None => {
                    debug!("{} is a target but not traceable in the grid", word);
                    return false;
                }
            },
        };
        self.found.insert(word, (finder, placement));
        true
    }

    /// Grid cells covered by found words, split by finder.
    pub fn highlighted_cells(&self) -> (HashSet<(usize, usize)>, HashSet<(usize, usize)>) {
        let mut mine = HashSet::new();
        let mut theirs = HashSet::new();
        for (finder, placement) in self.found.values() {
            let target = match finder {
                Finder::Me => &mut mine,
                Finder::Opponent(_) => &mut theirs,
            };
            target.extend(placement.cells());
        }
        (mine, theirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ClientGameState {
        let grid = Grid::from_rows(&["CATX", "XOXX", "XXWX", "GODX"]).unwrap();
        ClientGameState::new(
            grid,
            vec!["CAT".to_string(), "COW".to_string(), "DOG".to_string()],
            "Animales",
            true,
        )
    }

    #[test]
    fn test_guess_outcomes() {
        let mut game = state();

        match game.check_guess(" cat ") {
            GuessOutcome::Hit(placement) => assert_eq!((placement.x, placement.y), (0, 0)),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(game.check_guess("BIRD"), GuessOutcome::NotInList);

        assert!(game.mark_found("cat", Finder::Me));
        assert_eq!(game.check_guess("CAT"), GuessOutcome::AlreadyFound);
    }

    #[test]
    fn test_reverse_words_need_reverse_lookup() {
        let forward_only = ClientGameState::new(
            Grid::from_rows(&["CATX", "XOXX", "XXWX", "GODX"]).unwrap(),
            vec!["DOG".to_string()],
            "Animales",
            false,
        );
        assert_eq!(forward_only.check_guess("DOG"), GuessOutcome::NotInGrid);

        assert!(matches!(state().check_guess("DOG"), GuessOutcome::Hit(_)));
    }

    #[test]
    fn test_completion_and_highlights() {
        let mut game = state();
        game.mark_found("CAT", Finder::Me);
        game.mark_found("COW", Finder::Opponent(2));
        assert!(!game.is_complete());
        game.mark_found("DOG", Finder::Me);
        assert!(game.is_complete());

        let (mine, theirs) = game.highlighted_cells();
        assert!(mine.contains(&(2, 0)));
        assert!(mine.contains(&(0, 3)));
        assert!(theirs.contains(&(1, 1)));
        assert!(theirs.contains(&(2, 2)));
    }

    #[test]
    fn test_opponent_overrides_local_claim() {
        let mut game = state();
        game.mark_found("CAT", Finder::Me);
        game.mark_found("CAT", Finder::Opponent(4));
        assert_eq!(game.finder_of("CAT"), Some(Finder::Opponent(4)));
        assert_eq!(game.found_count(), 1);
    }

    #[test]
    fn test_mark_unknown_word() {
        let mut game = state();
        assert!(!game.mark_found("BIRD", Finder::Me));
        assert_eq!(game.found_count(), 0);
    }
}
