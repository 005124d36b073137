//! Open client windows and which of them the worker controls.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: u64,
    pub url: Url,
    /// Whether fetches from this client are intercepted by the worker
    pub controlled: bool,
}

#[derive(Debug, Default)]
pub struct ClientRegistry {
    next_id: AtomicU64,
    clients: RwLock<Vec<Client>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a client that was open before the worker took control
    pub fn register(&self, url: Url) -> u64 {
        self.insert(url, false)
    }

    /// Open a new window. A window opened by an active worker starts controlled.
    pub fn open_window(&self, url: Url, controlled: bool) -> u64 {
        self.insert(url, controlled)
    }

    fn insert(&self, url: Url, controlled: bool) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(client_id = id, url = %url, controlled, "Client registered");
        self.clients.write().push(Client {
            id,
            url,
            controlled,
        });
        id
    }

    /// Take control of every open client. Returns how many changed hands.
    pub fn claim(&self) -> usize {
        let mut clients = self.clients.write();
        let mut claimed = 0;
        for client in clients.iter_mut().filter(|c| !c.controlled) {
            client.controlled = true;
            claimed += 1;
        }
        claimed
    }

    pub fn close(&self, id: u64) -> bool {
        let mut clients = self.clients.write();
        let before = clients.len();
        clients.retain(|c| c.id != id);
        clients.len() < before
    }

    pub fn get(&self, id: u64) -> Option<Client> {
        self.clients.read().iter().find(|c| c.id == id).cloned()
    }

    pub fn list(&self) -> Vec<Client> {
        self.clients.read().clone()
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }

    pub fn controlled_count(&self) -> usize {
        self.clients.read().iter().filter(|c| c.controlled).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("https://riep31.github.io/").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_registered_clients_start_uncontrolled() {
        let registry = ClientRegistry::new();
        let id = registry.register(url("index.html"));
        assert!(!registry.get(id).unwrap().controlled);
        assert_eq!(registry.controlled_count(), 0);
    }

    #[test]
    fn test_claim_takes_every_open_client() {
        let registry = ClientRegistry::new();
        registry.register(url("index.html"));
        registry.register(url("dashboard.html"));
        registry.open_window(url("./"), true);

        assert_eq!(registry.claim(), 2);
        assert_eq!(registry.controlled_count(), 3);
        // Claiming again changes nothing
        assert_eq!(registry.claim(), 0);
    }

    #[test]
    fn test_ids_are_unique_and_close_removes() {
        let registry = ClientRegistry::new();
        let a = registry.register(url("a"));
        let b = registry.register(url("b"));
        assert_ne!(a, b);

        assert!(registry.close(a));
        assert!(!registry.close(a));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list()[0].id, b);
    }
}
