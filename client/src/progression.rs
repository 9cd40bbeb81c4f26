//! Single-player difficulty tiers and game modes

use clap::ValueEnum;
use shared::LayoutConfig;
use std::fmt;
use std::time::Duration;

/// Round length in time-attack mode.
pub const TIME_ATTACK_LIMIT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GameMode {
    /// No clock
    Zen,
    /// Find every word before the clock runs out
    TimeAttack,
}

impl GameMode {
    pub fn time_limit(self) -> Option<Duration> {
        match self {
            GameMode::Zen => None,
            GameMode::TimeAttack => Some(TIME_ATTACK_LIMIT),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Zen => write!(f, "zen"),
            GameMode::TimeAttack => write!(f, "time-attack"),
        }
    }
}

/// Grid layout for a single-player level. Level 0 is treated as level 1.
pub fn layout_for_level(level: u32) -> LayoutConfig {
    match level {
        0..=3 => LayoutConfig::new(10, 6, false),
        4..=7 => LayoutConfig::new(12, 7, false),
        8..=12 => LayoutConfig::new(14, 8, true),
        _ => LayoutConfig::new(15, 9, true),
    }
}

/// Current single-player level, advanced by winning rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    level: u32,
}

impl Progression {
    pub fn new(level: u32) -> Self {
        Self {
            level: level.max(1),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn layout(&self) -> LayoutConfig {
        layout_for_level(self.level)
    }

    pub fn advance(&mut self) {
        self.level = self.level.saturating_add(1);
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(1)
    }
}
