//! # Word Search Client Library
//!
//! Terminal front-end for the word search game. It plays single-player
//! rounds entirely offline and joins multiplayer rooms hosted by the server.
//!
//! ## Architecture Overview
//!
//! ### Typed Guesses
//! Players type the words they spot. A guess counts only if it is one of the
//! round's target words and can be traced in the grid in an allowed
//! direction, so the client never reports a word it could not have found.
//!
//! ### Server Authority
//! Online, the client marks its own hits immediately but the server decides
//! who scores. When an opponent's claim for the same word arrives, the
//! server's verdict replaces the local one.
//!
//! ## Module Organization
//!
//! - `game`: grid, target words and finders for the current round
//! - `input`: parsing of typed lines into commands
//! - `network`: UDP connection and the online session state machine
//! - `progression`: single-player levels, tiers and modes
//! - `rendering`: plain-text grid, word list and scoreboard
//! - `solo`: the offline round loop

pub mod game;
pub mod input;
pub mod network;
pub mod progression;
pub mod rendering;
pub mod solo;
