//! Online play: the UDP connection to the server and the session state it
//! drives

use crate::game::{ClientGameState, Finder, GuessOutcome};
use crate::input::{parse_command, Command, HELP_TEXT};
use crate::rendering::{render_game, render_scoreboard};
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Packet, Player, MAX_PACKET_SIZE, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UdpSocket;
use tokio::time::interval;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Multiplayer grids accept words in all eight directions.
const ONLINE_ALLOW_REVERSE: bool = true;

/// What to do once the server accepts the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomIntent {
    Create,
    Join(String),
}

/// Last known state of the room this client is in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView {
    pub code: String,
    pub host_id: Option<u32>,
    pub players: Vec<Player>,
}

/// Packets to send and lines to print in response to one event.
#[derive(Debug, Default, PartialEq)]
pub struct Reaction {
    pub outgoing: Vec<Packet>,
    pub output: Vec<String>,
    pub quit: bool,
}

impl Reaction {
    fn say(line: impl Into<String>) -> Self {
        Self {
            output: vec![line.into()],
            ..Self::default()
        }
    }

    fn send(packet: Packet) -> Self {
        Self {
            outgoing: vec![packet],
            ..Self::default()
        }
    }
}

/// Protocol state machine of one online client, free of any I/O.
pub struct OnlineSession {
    intent: RoomIntent,
    client_id: Option<u32>,
    room: Option<RoomView>,
    game: Option<ClientGameState>,
    finished: bool,
}

impl OnlineSession {
    pub fn new(intent: RoomIntent) -> Self {
        Self {
            intent,
            client_id: None,
            room: None,
            game: None,
            finished: false,
        }
    }

    pub fn client_id(&self) -> Option<u32> {
        self.client_id
    }

    pub fn room(&self) -> Option<&RoomView> {
        self.room.as_ref()
    }

    pub fn game(&self) -> Option<&ClientGameState> {
        self.game.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.client_id.is_some()
    }

    pub fn is_host(&self) -> bool {
        match (&self.room, self.client_id) {
            (Some(room), Some(id)) => room.host_id == Some(id),
            _ => false,
        }
    }

    pub fn handle_packet(&mut self, packet: Packet) -> Reaction {
        match packet {
            Packet::Connected { client_id } => {
                info!("Connected! Client ID: {}", client_id);
                self.client_id = Some(client_id);
                let request = match &self.intent {
                    RoomIntent::Create => Packet::CreateRoom,
                    RoomIntent::Join(code) => Packet::JoinRoom { code: code.clone() },
                };
                Reaction::send(request)
            }

            Packet::Rejected { reason } => {
                warn!("Rejected by server: {}", reason);
                Reaction {
                    output: vec![format!("Server refused the connection: {}", reason)],
                    quit: true,
                    ..Reaction::default()
                }
            }

            Packet::RoomCreated { code, players } => {
                let line = format!("Room {} created. Share the code and type start when ready.", code);
                self.room = Some(RoomView {
                    code,
                    host_id: self.client_id,
                    players,
                });
                Reaction::say(line)
            }

            Packet::RoomUpdated {
                code,
                host_id,
                players,
            } => {
                let mut output = vec![format!("Room {} ({} players)", code, players.len())];
                output.push(render_scoreboard(&players, self.client_id));
                self.room = Some(RoomView {
                    code,
                    host_id,
                    players,
                });
                if self.is_host() && self.game.is_none() {
                    output.push("You are the host. Type start to begin.".to_string());
                }
                Reaction {
                    output,
                    ..Reaction::default()
                }
            }

            Packet::RoomError { message } => {
                let quit = self.room.is_none();
                Reaction {
                    output: vec![format!("Room error: {}", message)],
                    quit,
                    ..Reaction::default()
                }
            }

            Packet::GameStarted {
                grid,
                words,
                category,
                grid_size,
            } => {
                debug!("Game started on a {}x{} grid", grid_size, grid_size);
                let game = ClientGameState::new(grid, words, category, ONLINE_ALLOW_REVERSE);
                let line = render_game(&game);
                self.game = Some(game);
                self.finished = false;
                Reaction::say(line)
            }

            Packet::ScoreboardUpdated { players } => {
                let output = render_scoreboard(&players, self.client_id);
                if let Some(room) = &mut self.room {
                    room.players = players;
                }
                Reaction::say(output)
            }

            Packet::OpponentFoundWord { word, finder_id } => {
                let Some(game) = &mut self.game else {
                    return Reaction::default();
                };
                game.mark_found(&word, Finder::Opponent(finder_id));
                let name = self
                    .room
                    .as_ref()
                    .and_then(|room| room.players.iter().find(|p| p.id == finder_id))
                    .map(|p| p.display_name.clone())
                    .unwrap_or_else(|| format!("Player {}", finder_id));
                Reaction {
                    output: vec![format!("{} found {}", name, word), render_game(game)],
                    ..Reaction::default()
                }
            }

            Packet::GameFinished { players } => {
                self.finished = true;
                Reaction::say(format!(
                    "Game over! Final standings:\n{}",
                    render_scoreboard(&players, self.client_id)
                ))
            }

            other => {
                warn!("Unexpected packet from server: {:?}", other);
                Reaction::default()
            }
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Reaction {
        match parse_command(line) {
            Command::Quit => Reaction {
                outgoing: vec![Packet::Disconnect],
                quit: true,
                ..Reaction::default()
            },
            Command::Help => Reaction::say(HELP_TEXT),
            Command::Empty => Reaction::default(),
            Command::Invalid(text) => Reaction::say(format!("Not a word: {}", text)),
            Command::Start => {
                let Some(room) = &self.room else {
                    return Reaction::say("Not in a room yet");
                };
                if !self.is_host() {
                    return Reaction::say("Only the host can start the game");
                }
                if self.game.is_some() {
                    return Reaction::say("The game has already started");
                }
                Reaction::send(Packet::StartGame {
                    code: room.code.clone(),
                })
            }
            Command::Guess(word) => self.guess(&word),
        }
    }

    fn guess(&mut self, word: &str) -> Reaction {
        let (Some(room), Some(game)) = (&self.room, &mut self.game) else {
            return Reaction::say("The game has not started yet");
        };
        if self.finished {
            return Reaction::say("The game is over");
        }

        match game.check_guess(word) {
            GuessOutcome::Hit(placement) => {
                game.mark_found(&placement.word, Finder::Me);
                Reaction {
                    outgoing: vec![Packet::WordFound {
                        code: room.code.clone(),
                        word: placement.word,
                    }],
                    output: vec![render_game(game)],
                    quit: false,
                }
            }
            GuessOutcome::AlreadyFound => {
                // The first claim may have been lost; the server ignores repeats.
                let word = word.trim().to_uppercase();
                if game.finder_of(&word) == Some(Finder::Me) {
                    return Reaction {
                        outgoing: vec![Packet::WordFound {
                            code: room.code.clone(),
                            word: word.clone(),
                        }],
                        output: vec![format!("Claim for {} sent again", word)],
                        quit: false,
                    };
                }
                Reaction::say(format!("{} is already found", word))
            }
            GuessOutcome::NotInList | GuessOutcome::NotInGrid => {
                Reaction::say(format!("{} is not one of the words", word))
            }
        }
    }
}

/// Terminal client connected to a game server
pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    session: OnlineSession,
}

impl Client {
    pub async fn new(server_addr: &str, intent: RoomIntent) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;

        Ok(Client {
            socket,
            server_addr,
            session: OnlineSession::new(intent),
        })
    }

    async fn send_packet(&self, packet: &Packet) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    /// Sends and prints a reaction. Returns true when the client should stop.
    async fn apply(&self, reaction: Reaction) -> bool {
        for packet in &reaction.outgoing {
            if let Err(e) = self.send_packet(packet).await {
                error!("Error sending packet: {}", e);
            }
        }
        for line in &reaction.output {
            println!("{}", line);
        }
        reaction.quit
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Connecting to server {}...", self.server_addr);
        self.send_packet(&Packet::Connect {
            client_version: PROTOCOL_VERSION,
        })
        .await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut heartbeat = interval(HEARTBEAT_INTERVAL);
        let mut buffer = [0u8; MAX_PACKET_SIZE];

        loop {
            tokio::select! {
                result = self.socket.recv_from(&mut buffer) => {
                    match result {
                        Ok((len, _)) => match deserialize::<Packet>(&buffer[0..len]) {
                            Ok(packet) => {
                                let reaction = self.session.handle_packet(packet);
                                if self.apply(reaction).await {
                                    break;
                                }
                            }
                            Err(e) => warn!("Failed to deserialize packet: {}", e),
                        },
                        Err(e) => error!("Error receiving packet: {}", e),
                    }
                },

                _ = heartbeat.tick() => {
                    if self.session.is_connected() {
                        if let Err(e) = self.send_packet(&Packet::Heartbeat).await {
                            error!("Error sending heartbeat: {}", e);
                        }
                    }
                },

                line = lines.next_line() => {
                    let Some(line) = line? else {
                        if self.session.is_connected() {
                            if let Err(e) = self.send_packet(&Packet::Disconnect).await {
                                error!("Error sending disconnect: {}", e);
                            }
                        }
                        break;
                    };
                    let reaction = self.session.handle_line(&line);
                    if self.apply(reaction).await {
                        break;
                    }
                },
            }
        }

        Ok(())
    }
}
