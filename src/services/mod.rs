// Service exports
pub mod store;
pub mod upstream;
pub mod url;

pub use store::{CacheKey, MemoryStore, SnapshotStore, StoreError};
pub use upstream::{UpstreamBatch, UpstreamClient, UpstreamError};
pub use url::UrlResolver;
