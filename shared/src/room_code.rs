//! Five-character room codes shared by server and client

use rand::Rng;
use std::fmt;
use thiserror::Error;

pub const ROOM_CODE_LEN: usize = 5;
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(String);

impl RoomCode {
    /// Parses user input, accepting lowercase letters.
    pub fn parse(value: &str) -> Result<Self, RoomCodeError> {
        let value = value.trim();
        let found = value.chars().count();
        if found != ROOM_CODE_LEN {
            return Err(RoomCodeError::InvalidLength {
                expected: ROOM_CODE_LEN,
                found,
            });
        }
        let mut code = String::with_capacity(ROOM_CODE_LEN);
        for (index, ch) in value.chars().enumerate() {
            let ch = ch.to_ascii_uppercase();
            if !ch.is_ascii() || !ROOM_CODE_ALPHABET.contains(&(ch as u8)) {
                return Err(RoomCodeError::InvalidCharacter { ch, index });
            }
            code.push(ch);
        }
        Ok(Self(code))
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RoomCode {
    type Err = RoomCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomCodeError {
    #[error("room code must be {expected} characters, got {found}")]
    InvalidLength { expected: usize, found: usize },
    #[error("invalid character '{ch}' at position {index}")]
    InvalidCharacter { ch: char, index: usize },
}
