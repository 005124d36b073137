//! Cache trait definitions
//!
//! `CacheStorage` is the set of named cache generations; `Cache` is one
//! generation mapping request identities to stored responses.

use async_trait::async_trait;
use std::sync::Arc;

use super::entry::{RequestKey, StoredResponse};
use super::error::CacheError;

/// One named cache generation
#[async_trait]
pub trait Cache: Send + Sync {
    /// Generation name (the version string)
    fn name(&self) -> &str;

    /// Look up a stored response by identity
    async fn match_request(&self, key: &RequestKey) -> Result<Option<StoredResponse>, CacheError>;

    /// Store a response, overwriting any entry with the same identity
    async fn put(&self, key: RequestKey, response: StoredResponse) -> Result<(), CacheError>;

    /// Delete an entry. Returns true if it existed.
    async fn delete(&self, key: &RequestKey) -> Result<bool, CacheError>;

    /// All identities currently stored in this generation
    async fn keys(&self) -> Result<Vec<RequestKey>, CacheError>;
}

/// Registry of cache generations, addressed by name
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a generation, creating it if it does not exist
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, CacheError>;

    /// Whether a generation with this name exists
    async fn has(&self, name: &str) -> Result<bool, CacheError>;

    /// Names of all generations, in creation order
    async fn list_generations(&self) -> Result<Vec<String>, CacheError>;

    /// Delete a generation and all its entries. Returns true if it existed.
    async fn delete_generation(&self, name: &str) -> Result<bool, CacheError>;

    /// Look up an identity across every generation in creation order.
    ///
    /// The default implementation goes through `open`, so a generation
    /// deleted concurrently may be recreated empty; implementations holding
    /// their own generation list should override it.
    async fn match_any(&self, key: &RequestKey) -> Result<Option<StoredResponse>, CacheError> {
        for name in self.list_generations().await? {
            let cache = self.open(&name).await?;
            if let Some(found) = cache.match_request(key).await? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}
