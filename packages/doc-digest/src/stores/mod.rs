//! Storage implementations for the digest library.
//!
//! - `MemoryStore` - In-memory document store
//! - `RecordCache` - Bounded cache of retrieved documents

pub mod cache;
pub mod memory;

pub use cache::RecordCache;
pub use memory::MemoryStore;
