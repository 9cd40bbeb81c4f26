//! Registry of live rooms keyed by room code
//!
//! Storage sits behind [`RoomStore`] so the in-memory map used today can be
//! swapped for another backend without touching the coordinator.

use crate::room::Room;
use log::{debug, info};
use rand::Rng;
use shared::RoomCode;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Backend holding the rooms of a [`RoomRegistry`].
pub trait RoomStore {
    fn contains(&self, code: &RoomCode) -> bool;
    fn get(&self, code: &RoomCode) -> Option<&Room>;
    fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room>;
    /// Stores `room` under its code, replacing any room already there.
    fn insert(&mut self, room: Room) -> &mut Room;
    fn remove(&mut self, code: &RoomCode) -> Option<Room>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct MemoryRoomStore {
    rooms: HashMap<RoomCode, Room>,
}

impl RoomStore for MemoryRoomStore {
    fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    fn insert(&mut self, room: Room) -> &mut Room {
        match self.rooms.entry(room.code().clone()) {
            Entry::Occupied(mut entry) => {
                entry.insert(room);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(room),
        }
    }

    fn remove(&mut self, code: &RoomCode) -> Option<Room> {
        self.rooms.remove(code)
    }

    fn len(&self) -> usize {
        self.rooms.len()
    }
}

pub struct RoomRegistry<S = MemoryRoomStore> {
    store: S,
}

impl RoomRegistry<MemoryRoomStore> {
    pub fn new() -> Self {
        Self::with_store(MemoryRoomStore::default())
    }
}

impl Default for RoomRegistry<MemoryRoomStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RoomStore> RoomRegistry<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Creates an empty waiting room under a fresh code. Codes already in use
    /// are redrawn.
    pub fn create<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Room {
        let code = loop {
            let candidate = RoomCode::random(rng);
            if !self.store.contains(&candidate) {
                break candidate;
            }
            debug!("Room code {} already taken, drawing another", candidate);
        };

        info!("Room {} created", code);
        self.store.insert(Room::new(code))
    }

    pub fn find(&self, code: &RoomCode) -> Option<&Room> {
        self.store.get(code)
    }

    pub fn find_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.store.get_mut(code)
    }

    pub fn remove(&mut self, code: &RoomCode) -> Option<Room> {
        let removed = self.store.remove(code);
        if removed.is_some() {
            info!("Room {} removed", code);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::Player;

    #[test]
    fn test_create_and_find() {
        let mut registry = RoomRegistry::new();
        let mut rng = StdRng::seed_from_u64(1);

        let code = registry.create(&mut rng).code().clone();
        let room = registry.find(&code).unwrap();
        assert_eq!(room.state(), RoomState::Waiting);
        assert!(room.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_create_retries_on_collision() {
        let mut registry = RoomRegistry::new();

        let first = registry
            .create(&mut StdRng::seed_from_u64(42))
            .code()
            .clone();
        registry
            .find_mut(&first)
            .unwrap()
            .join(Player::new(1, "Host"))
            .unwrap();

        // Same seed draws the same first code, which is now taken.
        let second = registry
            .create(&mut StdRng::seed_from_u64(42))
            .code()
            .clone();

        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find(&first).unwrap().players().len(), 1);
        assert!(registry.find(&second).unwrap().is_empty());
    }

    #[test]
    fn test_remove() {
        let mut registry = RoomRegistry::new();
        let mut rng = StdRng::seed_from_u64(3);
        let code = registry.create(&mut rng).code().clone();

        assert!(registry.remove(&code).is_some());
        assert!(registry.find(&code).is_none());
        assert!(registry.remove(&code).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_find_unknown_code() {
        let registry = RoomRegistry::new();
        assert!(registry.find(&RoomCode::parse("ZZZZZ").unwrap()).is_none());
    }

    #[test]
    fn test_custom_store_backend() {
        #[derive(Default)]
        struct CountingStore {
            inner: MemoryRoomStore,
            inserts: usize,
        }

        impl RoomStore for CountingStore {
            fn contains(&self, code: &RoomCode) -> bool {
                self.inner.contains(code)
            }
            fn get(&self, code: &RoomCode) -> Option<&Room> {
                self.inner.get(code)
            }
            fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
                self.inner.get_mut(code)
            }
            fn insert(&mut self, room: Room) -> &mut Room {
                self.inserts += 1;
                self.inner.insert(room)
            }
            fn remove(&mut self, code: &RoomCode) -> Option<Room> {
                self.inner.remove(code)
            }
            fn len(&self) -> usize {
                self.inner.len()
            }
        }

        let mut registry = RoomRegistry::with_store(CountingStore::default());
        let mut rng = StdRng::seed_from_u64(5);
        registry.create(&mut rng);
        registry.create(&mut rng);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.store.inserts, 2);
    }
}
