use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod grid;
pub mod room_code;

pub use catalog::{Category, CATEGORIES};
pub use grid::{generate, Direction, GeneratedGrid, Grid, LayoutConfig, Placement};
pub use room_code::{RoomCode, RoomCodeError};

pub const PROTOCOL_VERSION: u32 = 1;

/// Largest datagram either side expects to receive.
pub const MAX_PACKET_SIZE: usize = 4096;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Packet {
    Connect {
        client_version: u32,
    },
    Heartbeat,
    CreateRoom,
    JoinRoom {
        code: String,
    },
    StartGame {
        code: String,
    },
    WordFound {
        code: String,
        word: String,
    },
    Disconnect,

    Connected {
        client_id: u32,
    },
    Rejected {
        reason: String,
    },
    RoomCreated {
        code: String,
        players: Vec<Player>,
    },
    RoomUpdated {
        code: String,
        host_id: Option<u32>,
        players: Vec<Player>,
    },
    RoomError {
        message: String,
    },
    GameStarted {
        grid: Grid,
        words: Vec<String>,
        category: String,
        grid_size: usize,
    },
    ScoreboardUpdated {
        players: Vec<Player>,
    },
    OpponentFoundWord {
        word: String,
        finder_id: u32,
    },
    GameFinished {
        players: Vec<Player>,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: u32,
    pub display_name: String,
    pub score: u32,
}

impl Player {
    pub fn new(id: u32, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            score: 0,
        }
    }
}

/// Orders players by score, highest first. Ties keep their incoming order.
pub fn rank_players(players: &[Player]) -> Vec<Player> {
    let mut ranked = players.to_vec();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}
