use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use surrealdb::engine::any::{connect, Any};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use tracing::info;
use trafficlight_core::{KvStore, StoreError, StoreResult};

const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS kv SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS kv_key ON TABLE kv FIELDS key UNIQUE;
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KvRecord {
    key: String,
    value: String,
}

/// Root credentials for a remote SurrealDB server.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// SurrealDB-backed key-value store.
#[derive(Clone)]
pub struct SurrealStore {
    inner: Surreal<Any>,
}

impl SurrealStore {
    /// Connect by endpoint scheme: `surrealkv://path`, `mem://`, `ws://host:port`.
    pub async fn connect(url: &str, credentials: Option<Credentials>) -> StoreResult<Self> {
        let db = connect(url).await.map_err(StoreError::unavailable)?;

        if let Some(c) = credentials {
            db.signin(Root {
                username: &c.username,
                password: &c.password,
            })
            .await
            .map_err(StoreError::unavailable)?;
        }

        db.use_ns("trafficlight")
            .use_db("trafficlight")
            .await
            .map_err(StoreError::unavailable)?;

        db.query(SCHEMA)
            .await
            .map_err(StoreError::unavailable)?
            .check()
            .map_err(StoreError::unavailable)?;

        info!(url, "connected to store");
        Ok(Self { inner: db })
    }

    /// Ephemeral instance for tests.
    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect("mem://", None).await
    }
}

#[async_trait]
impl KvStore for SurrealStore {
    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner
            .query("UPSERT type::thing('kv', $key) CONTENT { key: $key, value: $value };")
            .bind(("key", key.to_string()))
            .bind(("value", value.to_string()))
            .await
            .map_err(StoreError::unavailable)?
            .check()
            .map_err(StoreError::unavailable)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut res = self
            .inner
            .query("SELECT key, value FROM kv WHERE key = $key LIMIT 1;")
            .bind(("key", key.to_string()))
            .await
            .map_err(StoreError::unavailable)?;
        let rows: Vec<KvRecord> = res.take(0).map_err(StoreError::unavailable)?;
        Ok(rows.into_iter().next().map(|r| r.value))
    }

    async fn multi_get(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>> {
        let mut res = self
            .inner
            .query("SELECT key, value FROM kv WHERE key IN $keys;")
            .bind(("keys", keys.to_vec()))
            .await
            .map_err(StoreError::unavailable)?;
        let rows: Vec<KvRecord> = res.take(0).map_err(StoreError::unavailable)?;

        Ok(keys
            .iter()
            .map(|k| rows.iter().find(|r| &r.key == k).map(|r| r.value.clone()))
            .collect())
    }
}
