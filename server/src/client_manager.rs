//! Connection tracking for the word search server
//!
//! Every UDP peer that completes the `Connect` handshake gets a numeric id
//! which doubles as its player id inside rooms. This module handles:
//! - Connection lifecycle (connect, disconnect, liveness timeout)
//! - Address lookup for routing inbound datagrams to a connection
//! - Server capacity enforcement
//!
//! Liveness is transport-level only. Rooms themselves never time out.

use log::info;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// A connected peer
#[derive(Debug)]
pub struct Client {
    /// Unique id assigned by the server, also used as player id
    pub id: u32,
    /// Where replies are sent
    pub addr: SocketAddr,
    /// Last time any packet arrived from this peer
    pub last_seen: Instant,
}

impl Client {
    pub fn new(id: u32, addr: SocketAddr) -> Self {
        Self {
            id,
            addr,
            last_seen: Instant::now(),
        }
    }

    /// Marks the peer as alive.
    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Returns true if nothing has been heard from the peer within `timeout`.
    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Owns every live connection
///
/// Ids start at 1 and are never reused while the server runs, so a late
/// packet for a dropped connection can never be attributed to a newcomer.
pub struct ClientManager {
    clients: HashMap<u32, Client>,
    next_client_id: u32,
    max_clients: usize,
}

impl ClientManager {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            next_client_id: 1,
            max_clients,
        }
    }

    /// Registers a new connection. Returns None when the server is full.
    pub fn add_client(&mut self, addr: SocketAddr) -> Option<u32> {
        if self.clients.len() >= self.max_clients {
            return None;
        }

        let client_id = self.next_client_id;
        self.next_client_id += 1;

        info!("Client {} connected from {}", client_id, addr);
        self.clients.insert(client_id, Client::new(client_id, addr));

        Some(client_id)
    }

    /// Drops a connection. Returns false if it was already gone.
    pub fn remove_client(&mut self, client_id: &u32) -> bool {
        if let Some(client) = self.clients.remove(client_id) {
            info!("Client {} disconnected", client.id);
            true
        } else {
            false
        }
    }

    pub fn find_client_by_addr(&self, addr: SocketAddr) -> Option<u32> {
        self.clients
            .iter()
            .find(|(_, client)| client.addr == addr)
            .map(|(id, _)| *id)
    }

    /// Refreshes the liveness of the connection at `addr`, returning its id.
    pub fn touch(&mut self, addr: SocketAddr) -> Option<u32> {
        let client = self.clients.values_mut().find(|c| c.addr == addr)?;
        client.touch();
        Some(client.id)
    }

    /// Removes and returns every connection silent for longer than `timeout`.
    pub fn check_timeouts(&mut self, timeout: Duration) -> Vec<u32> {
        let timed_out: Vec<u32> = self
            .clients
            .iter()
            .filter(|(_, client)| client.is_timed_out(timeout))
            .map(|(id, _)| *id)
            .collect();

        for client_id in &timed_out {
            self.remove_client(client_id);
        }

        timed_out
    }

    /// Addresses of the given connections, skipping ids that are gone.
    pub fn addrs_for(&self, client_ids: &[u32]) -> Vec<(u32, SocketAddr)> {
        client_ids
            .iter()
            .filter_map(|id| self.clients.get(id).map(|c| (*id, c.addr)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_addr() -> SocketAddr {
        "127.0.0.1:2409".parse().unwrap()
    }

    fn test_addr2() -> SocketAddr {
        "127.0.0.1:2410".parse().unwrap()
    }

    #[test]
    fn test_client_creation() {
        let addr = test_addr();
        let client = Client::new(1, addr);

        assert_eq!(client.id, 1);
        assert_eq!(client.addr, addr);
        assert!(!client.is_timed_out(Duration::from_secs(1)));
    }

    #[test]
    fn test_client_timeout_and_touch() {
        let mut client = Client::new(1, test_addr());
        client.last_seen = Instant::now() - Duration::from_secs(2);
        assert!(client.is_timed_out(Duration::from_secs(1)));

        client.touch();
        assert!(!client.is_timed_out(Duration::from_secs(1)));
    }

    #[test]
    fn test_client_manager_creation() {
        let manager = ClientManager::new(5);
        assert_eq!(manager.max_clients, 5);
        assert!(manager.is_empty());
        assert_eq!(manager.len(), 0);
    }

    #[test]
    fn test_add_multiple_clients() {
        let mut manager = ClientManager::new(3);

        let client_id1 = manager.add_client(test_addr()).unwrap();
        let client_id2 = manager.add_client(test_addr2()).unwrap();

        assert_eq!(client_id1, 1);
        assert_eq!(client_id2, 2);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_add_client_max_capacity() {
        let mut manager = ClientManager::new(1);

        assert!(manager.add_client(test_addr()).is_some());
        assert!(manager.add_client(test_addr2()).is_none());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_ids_not_reused() {
        let mut manager = ClientManager::new(1);
        let first = manager.add_client(test_addr()).unwrap();
        manager.remove_client(&first);
        let second = manager.add_client(test_addr()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_remove_client() {
        let mut manager = ClientManager::new(2);
        let client_id = manager.add_client(test_addr()).unwrap();

        assert!(manager.remove_client(&client_id));
        assert!(manager.is_empty());
        assert!(!manager.remove_client(&client_id));
    }

    #[test]
    fn test_find_client_by_addr() {
        let mut manager = ClientManager::new(2);
        let client_id1 = manager.add_client(test_addr()).unwrap();
        manager.add_client(test_addr2()).unwrap();

        assert_eq!(manager.find_client_by_addr(test_addr()), Some(client_id1));

        let unknown_addr: SocketAddr = "192.168.1.1:9999".parse().unwrap();
        assert_eq!(manager.find_client_by_addr(unknown_addr), None);
    }

    #[test]
    fn test_check_timeouts_removes_silent_clients() {
        let mut manager = ClientManager::new(2);
        let quiet = manager.add_client(test_addr()).unwrap();
        let chatty = manager.add_client(test_addr2()).unwrap();

        manager.clients.get_mut(&quiet).unwrap().last_seen =
            Instant::now() - Duration::from_secs(10);
        manager.clients.get_mut(&chatty).unwrap().last_seen =
            Instant::now() - Duration::from_secs(10);
        assert_eq!(manager.touch(test_addr2()), Some(chatty));

        let removed = manager.check_timeouts(Duration::from_secs(5));
        assert_eq!(removed, vec![quiet]);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.find_client_by_addr(test_addr2()), Some(chatty));
    }

    #[test]
    fn test_touch_unknown_addr() {
        let mut manager = ClientManager::new(2);
        assert_eq!(manager.touch(test_addr()), None);
    }

    #[test]
    fn test_addrs_for_skips_missing_ids() {
        let mut manager = ClientManager::new(3);
        let a = manager.add_client(test_addr()).unwrap();
        let b = manager.add_client(test_addr2()).unwrap();

        let addrs = manager.addrs_for(&[b, 99, a]);
        assert_eq!(addrs, vec![(b, test_addr2()), (a, test_addr())]);
        assert_eq!(manager.len(), 2);
    }
}
