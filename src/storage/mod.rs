//! Local persistence for saved notices.
//!
//! [`KeyValueStore`] is the raw string key/value layer; [`LocalArchive`]
//! stores notices in it keyed by their code.
//!
//! ## Directory Structure (`FileStore`)
//!
//! ```text
//! storage/saved/
//! ├── 102.json          # one serialized notice per key
//! ├── 98.json
//! └── NaN.json          # notice whose code could not be parsed
//! ```

mod archive;
mod file;
mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub use archive::LocalArchive;
pub use file::FileStore;
pub use memory::MemoryStore;

/// String key/value persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    async fn clear(&self) -> Result<()>;

    async fn keys(&self) -> Result<Vec<String>>;
}
