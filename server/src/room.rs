//! Multiplayer room entity and its lifecycle state machine
//!
//! A room moves `Waiting -> InProgress -> Finished` and never goes back. It
//! is destroyed by the registry once its last player leaves. The host is
//! tracked explicitly and handed to the longest-tenured remaining player when
//! the current host leaves.

use crate::scoring::{self, Award};
use log::{info, warn};
use rand::Rng;
use shared::catalog::{choose_category, Category};
use shared::{generate, rank_players, Grid, LayoutConfig, Player, RoomCode};
use std::collections::HashSet;
use thiserror::Error;

pub const MAX_PLAYERS: usize = 4;

/// Layout used for every multiplayer session.
pub const MULTIPLAYER_LAYOUT: LayoutConfig = LayoutConfig::new(12, 8, true);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    Waiting,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Room not found")]
    NotFound,
    #[error("Game already started")]
    NotJoinable,
    #[error("Room is full")]
    Full,
    #[error("only the host can start the game")]
    NotHost,
    #[error("the game has already been started")]
    NotWaiting,
}

/// The puzzle played in one session.
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    pub grid: Grid,
    /// Target words in display order.
    pub words: Vec<String>,
    pub category: String,
}

impl PuzzleSession {
    /// Picks a random category and word subset and lays them out.
    pub fn generate<R: Rng + ?Sized>(layout: &LayoutConfig, rng: &mut R) -> Self {
        let category = choose_category(rng);
        Self::from_category(category, layout, rng)
    }

    pub fn from_category<R: Rng + ?Sized>(
        category: &Category,
        layout: &LayoutConfig,
        rng: &mut R,
    ) -> Self {
        let words = category.choose_words(layout.word_count, rng);
        let generated = generate(&words, layout, rng);
        if !generated.is_complete() {
            warn!(
                "Dropping unplaceable words from {} session: {:?}",
                category.name, generated.unplaced
            );
        }
        Self {
            words: generated.placed_words(),
            grid: generated.grid,
            category: category.name.to_string(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn grid_size(&self) -> usize {
        self.grid.size()
    }
}

/// A successful word claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub word: String,
    pub finder_id: u32,
    pub award: Award,
    /// True when this claim found the last word of the session.
    pub completed: bool,
}

#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    host_id: Option<u32>,
    players: Vec<Player>,
    state: RoomState,
    session: Option<PuzzleSession>,
    discovered: HashSet<String>,
}

impl Room {
    pub fn new(code: RoomCode) -> Self {
        Self {
            code,
            host_id: None,
            players: Vec::with_capacity(MAX_PLAYERS),
            state: RoomState::Waiting,
            session: None,
            discovered: HashSet::new(),
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn host_id(&self) -> Option<u32> {
        self.host_id
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn session(&self) -> Option<&PuzzleSession> {
        self.session.as_ref()
    }

    pub fn discovered(&self) -> &HashSet<String> {
        &self.discovered
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains_player(&self, player_id: u32) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn member_ids(&self) -> Vec<u32> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn ranked_players(&self) -> Vec<Player> {
        rank_players(&self.players)
    }

    pub fn check_joinable(&self) -> Result<(), RoomError> {
        if self.state != RoomState::Waiting {
            return Err(RoomError::NotJoinable);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RoomError::Full);
        }
        Ok(())
    }

    /// Appends a player. The first player to join an empty room becomes host.
    pub fn join(&mut self, player: Player) -> Result<(), RoomError> {
        self.check_joinable()?;
        if self.host_id.is_none() {
            self.host_id = Some(player.id);
        }
        info!(
            "Player {} joined room {} ({}/{})",
            player.id,
            self.code,
            self.players.len() + 1,
            MAX_PLAYERS
        );
        self.players.push(player);
        Ok(())
    }

    /// Starts the game if `requester` is the host of a waiting room. The
    /// session is only built once the request has been accepted.
    pub fn start<F>(&mut self, requester: u32, make_session: F) -> Result<&PuzzleSession, RoomError>
    where
        F: FnOnce() -> PuzzleSession,
    {
        if self.state != RoomState::Waiting {
            return Err(RoomError::NotWaiting);
        }
        if self.host_id != Some(requester) {
            return Err(RoomError::NotHost);
        }

        let session = make_session();
        info!(
            "Room {} started: {} words from {} on a {}x{} grid",
            self.code,
            session.words.len(),
            session.category,
            session.grid_size(),
            session.grid_size()
        );
        self.state = RoomState::InProgress;
        Ok(self.session.insert(session))
    }

    /// Claims `word` for `finder_id`. The first valid claim wins; anything
    /// else (wrong state, non-member, unknown or already found word) is None.
    pub fn record_discovery(&mut self, finder_id: u32, word: &str) -> Option<Discovery> {
        if self.state != RoomState::InProgress {
            return None;
        }
        let session = self.session.as_ref()?;
        if !session.contains(word) || self.discovered.contains(word) {
            return None;
        }
        let finder = self.players.iter_mut().find(|p| p.id == finder_id)?;

        let award = scoring::award(self.discovered.len(), session.words.len());
        self.discovered.insert(word.to_string());
        finder.score += award.total();

        let completed = award.completes_session();
        if completed {
            self.state = RoomState::Finished;
            info!("Room {} finished, last word found by {}", self.code, finder_id);
        }

        Some(Discovery {
            word: word.to_string(),
            finder_id,
            award,
            completed,
        })
    }

    /// Removes a player, handing the host role on if needed.
    pub fn remove_player(&mut self, player_id: u32) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == player_id)?;
        let player = self.players.remove(index);

        if self.host_id == Some(player_id) {
            self.host_id = self.players.first().map(|p| p.id);
            if let Some(new_host) = self.host_id {
                info!("Room {} host passed to player {}", self.code, new_host);
            }
        }

        info!("Player {} left room {}", player_id, self.code);
        Some(player)
    }
}
