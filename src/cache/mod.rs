// Cache module
//
// Versioned, named response store. Each generation is a named cache keyed by
// request identity; the lifecycle manager decides which generation is current.

pub mod entry;
pub mod error;
pub mod memory;
pub mod stats;
pub mod traits;

pub use entry::{RequestKey, StoredResponse};
pub use error::CacheError;
pub use memory::{MemoryCache, MemoryCacheStorage};
pub use stats::CacheStats;
pub use traits::{Cache, CacheStorage};
