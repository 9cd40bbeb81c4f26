//! # Word Search Server Library
//!
//! This library provides the authoritative server for multiplayer word search
//! rooms. It owns every room, validates every word claim, keeps the scores
//! and pushes each change to the players it concerns.
//!
//! ## Core Responsibilities
//!
//! ### Room Lifecycle
//! Rooms are created on request under a fresh five character code, filled
//! by up to four players, started by their host and finished when the last
//! word is found. A room disappears as soon as its last player leaves.
//!
//! ### Claim Arbitration
//! Clients check their own guesses against the grid and report hits with
//! `WordFound`. The server only accepts the first claim of each word in a
//! running room, so two players racing for the same word can never both
//! score it.
//!
//! ### Notification Fan-out
//! Every accepted action produces a list of packets addressed to specific
//! players. The network layer resolves those ids to addresses and sends them.
//!
//! ## Architecture Design
//!
//! ### Single Event Loop
//! All room state is touched by one task. Network receive, network send and
//! liveness checks run as separate tasks that talk to the loop over
//! channels, so room logic never needs a lock.
//!
//! ### UDP-Based Communication
//! One bincode-encoded [`shared::Packet`] per datagram. A connection is
//! kept alive by heartbeats and dropped after a configurable silence, which
//! the room logic treats exactly like an explicit disconnect.
//!
//! ## Module Organization
//!
//! - `client_manager`: connection ids, addresses and liveness
//! - `coordinator`: maps player actions to room transitions and outbound packets
//! - `network`: UDP socket tasks and the main loop
//! - `registry`: live rooms keyed by code, behind a pluggable store
//! - `room`: the room state machine and its puzzle session
//! - `scoring`: point awards for discoveries
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let mut server = Server::new("127.0.0.1:2409", 64, Duration::from_secs(5)).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod coordinator;
pub mod network;
pub mod registry;
pub mod room;
pub mod scoring;
