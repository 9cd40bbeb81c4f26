//! Turns player actions into room transitions and outbound notifications
//!
//! The coordinator owns the room registry and is driven by a single task, so
//! every action runs to completion before the next one starts. Concurrent
//! claims for the same word are settled by arrival order: the first valid
//! claim scores, later ones are dropped without a notification.
//!
//! Each connection is a member of at most one room. Creating or joining a
//! different room leaves the current one first.

use crate::registry::{MemoryRoomStore, RoomRegistry, RoomStore};
use crate::room::{PuzzleSession, Room, RoomError, MULTIPLAYER_LAYOUT};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{LayoutConfig, Packet, Player, RoomCode};
use std::collections::HashMap;

/// Inbound player actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateRoom,
    JoinRoom { code: String },
    StartGame { code: String },
    WordFound { code: String, word: String },
    Disconnect,
}

impl Action {
    /// Maps a client packet to an action; None for packets that are not
    /// room actions.
    pub fn from_packet(packet: &Packet) -> Option<Self> {
        match packet {
            Packet::CreateRoom => Some(Action::CreateRoom),
            Packet::JoinRoom { code } => Some(Action::JoinRoom { code: code.clone() }),
            Packet::StartGame { code } => Some(Action::StartGame { code: code.clone() }),
            Packet::WordFound { code, word } => Some(Action::WordFound {
                code: code.clone(),
                word: word.clone(),
            }),
            Packet::Disconnect => Some(Action::Disconnect),
            _ => None,
        }
    }
}

/// A packet and the connections it goes to.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub recipients: Vec<u32>,
    pub packet: Packet,
}

impl Dispatch {
    pub fn to(recipient: u32, packet: Packet) -> Self {
        Self {
            recipients: vec![recipient],
            packet,
        }
    }
}

pub struct EventCoordinator<S = MemoryRoomStore, R = StdRng> {
    registry: RoomRegistry<S>,
    memberships: HashMap<u32, RoomCode>,
    rng: R,
    layout: LayoutConfig,
}

impl EventCoordinator<MemoryRoomStore, StdRng> {
    pub fn new() -> Self {
        Self::with_parts(RoomRegistry::new(), StdRng::from_entropy())
    }
}

impl Default for EventCoordinator<MemoryRoomStore, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RoomStore, R: Rng> EventCoordinator<S, R> {
    pub fn with_parts(registry: RoomRegistry<S>, rng: R) -> Self {
        Self {
            registry,
            memberships: HashMap::new(),
            rng,
            layout: MULTIPLAYER_LAYOUT,
        }
    }

    pub fn registry(&self) -> &RoomRegistry<S> {
        &self.registry
    }

    /// Code of the room `player_id` currently belongs to.
    pub fn room_of(&self, player_id: u32) -> Option<&RoomCode> {
        self.memberships.get(&player_id)
    }

    pub fn handle(&mut self, player_id: u32, action: Action) -> Vec<Dispatch> {
        debug!("Player {} -> {:?}", player_id, action);
        match action {
            Action::CreateRoom => self.create_room(player_id),
            Action::JoinRoom { code } => self.join_room(player_id, &code),
            Action::StartGame { code } => self.start_game(player_id, &code),
            Action::WordFound { code, word } => self.word_found(player_id, &code, &word),
            Action::Disconnect => self.player_left(player_id),
        }
    }

    fn create_room(&mut self, player_id: u32) -> Vec<Dispatch> {
        let mut dispatches = self.player_left(player_id);

        let room = self.registry.create(&mut self.rng);
        if let Err(e) = room.join(Player::new(player_id, "Host")) {
            warn!("Fresh room {} refused its host: {}", room.code(), e);
            return dispatches;
        }

        let code = room.code().clone();
        dispatches.push(Dispatch::to(
            player_id,
            Packet::RoomCreated {
                code: code.to_string(),
                players: room.players().to_vec(),
            },
        ));
        self.memberships.insert(player_id, code);
        dispatches
    }

    fn join_room(&mut self, player_id: u32, raw_code: &str) -> Vec<Dispatch> {
        let code = match RoomCode::parse(raw_code) {
            Ok(code) => code,
            Err(e) => {
                debug!("Player {} sent a bad room code: {}", player_id, e);
                return vec![room_error(player_id, &RoomError::NotFound)];
            }
        };

        if self.memberships.get(&player_id) == Some(&code) {
            return match self.registry.find(&code) {
                Some(room) => vec![Dispatch::to(player_id, room_updated(room))],
                None => Vec::new(),
            };
        }

        let joinable = self
            .registry
            .find(&code)
            .ok_or(RoomError::NotFound)
            .and_then(Room::check_joinable);
        if let Err(e) = joinable {
            info!("Player {} could not join {}: {}", player_id, code, e);
            return vec![room_error(player_id, &e)];
        }

        let mut dispatches = self.player_left(player_id);
        let Some(room) = self.registry.find_mut(&code) else {
            dispatches.push(room_error(player_id, &RoomError::NotFound));
            return dispatches;
        };

        let display_name = format!("Player {}", room.players().len() + 1);
        if let Err(e) = room.join(Player::new(player_id, display_name)) {
            dispatches.push(room_error(player_id, &e));
            return dispatches;
        }

        dispatches.push(Dispatch {
            recipients: room.member_ids(),
            packet: room_updated(room),
        });
        self.memberships.insert(player_id, code);
        dispatches
    }

    fn start_game(&mut self, player_id: u32, raw_code: &str) -> Vec<Dispatch> {
        let Ok(code) = RoomCode::parse(raw_code) else {
            return Vec::new();
        };
        let Some(room) = self.registry.find_mut(&code) else {
            debug!("Player {} tried to start unknown room {}", player_id, code);
            return Vec::new();
        };

        let layout = self.layout;
        let rng = &mut self.rng;
        let packet = match room.start(player_id, || PuzzleSession::generate(&layout, rng)) {
            Ok(session) => Packet::GameStarted {
                grid: session.grid.clone(),
                words: session.words.clone(),
                category: session.category.clone(),
                grid_size: session.grid_size(),
            },
            Err(e) => {
                debug!("Start of room {} by {} refused: {}", code, player_id, e);
                return Vec::new();
            }
        };

        vec![Dispatch {
            recipients: room.member_ids(),
            packet,
        }]
    }

    fn word_found(&mut self, player_id: u32, raw_code: &str, word: &str) -> Vec<Dispatch> {
        let Ok(code) = RoomCode::parse(raw_code) else {
            return Vec::new();
        };
        let Some(room) = self.registry.find_mut(&code) else {
            return Vec::new();
        };

        let word = word.trim().to_uppercase();
        let Some(discovery) = room.record_discovery(player_id, &word) else {
            debug!("Ignoring claim of {:?} by {} in {}", word, player_id, code);
            return Vec::new();
        };
        info!(
            "Player {} found {} in {} (+{})",
            player_id,
            discovery.word,
            code,
            discovery.award.total()
        );

        let members = room.member_ids();
        let others: Vec<u32> = members
            .iter()
            .copied()
            .filter(|id| *id != player_id)
            .collect();

        let mut dispatches = vec![Dispatch {
            recipients: members.clone(),
            packet: Packet::ScoreboardUpdated {
                players: room.players().to_vec(),
            },
        }];
        if !others.is_empty() {
            dispatches.push(Dispatch {
                recipients: others,
                packet: Packet::OpponentFoundWord {
                    word: discovery.word,
                    finder_id: player_id,
                },
            });
        }
        if discovery.completed {
            dispatches.push(Dispatch {
                recipients: members,
                packet: Packet::GameFinished {
                    players: room.ranked_players(),
                },
            });
        }
        dispatches
    }

    /// Removes `player_id` from its room, destroying the room once empty.
    fn player_left(&mut self, player_id: u32) -> Vec<Dispatch> {
        let Some(code) = self.memberships.remove(&player_id) else {
            return Vec::new();
        };
        let Some(room) = self.registry.find_mut(&code) else {
            return Vec::new();
        };

        room.remove_player(player_id);
        if room.is_empty() {
            self.registry.remove(&code);
            return Vec::new();
        }

        vec![Dispatch {
            recipients: room.member_ids(),
            packet: room_updated(room),
        }]
    }
}

fn room_updated(room: &Room) -> Packet {
    Packet::RoomUpdated {
        code: room.code().to_string(),
        host_id: room.host_id(),
        players: room.players().to_vec(),
    }
}

fn room_error(player_id: u32, error: &RoomError) -> Dispatch {
    Dispatch::to(
        player_id,
        Packet::RoomError {
            message: error.to_string(),
        },
    )
}
