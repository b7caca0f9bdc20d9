use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};

/// String key-value backend holding all persisted light state.
///
/// Implementations never cache and never retry.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// `None` when the key has never been written.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Values in the same order as `keys`.
    async fn multi_get(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>>;
}

/// In-memory store for tests and throwaway runs. Not durable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn multi_get(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>> {
        let inner = self.lock()?;
        Ok(keys.iter().map(|k| inner.get(k).cloned()).collect())
    }
}
