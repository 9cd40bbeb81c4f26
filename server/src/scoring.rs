//! Point awards for word discoveries

pub const BASE_AWARD: u32 = 100;
pub const FIRST_WORD_BONUS: u32 = 50;
pub const COMPLETION_BONUS: u32 = 200;

/// Breakdown of the points granted for one discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Award {
    pub base: u32,
    pub first_word: u32,
    pub completion: u32,
}

impl Award {
    pub fn total(&self) -> u32 {
        self.base + self.first_word + self.completion
    }

    pub fn completes_session(&self) -> bool {
        self.completion > 0
    }
}

/// Computes the award for a newly discovered word, given how many words had
/// been discovered before it and how many the session holds.
pub fn award(discovered_before: usize, total_words: usize) -> Award {
    Award {
        base: BASE_AWARD,
        first_word: if discovered_before == 0 {
            FIRST_WORD_BONUS
        } else {
            0
        },
        completion: if discovered_before + 1 == total_words {
            COMPLETION_BONUS
        } else {
            0
        },
    }
}
