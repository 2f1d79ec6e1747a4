mod actor;

pub use actor::{RedisActor, RedisActorHandle, RedisCommand};

use crate::components::availability::Selection;
use crate::error::SlotResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Key-value storage for the last confirmed selection of an order session
#[async_trait]
pub trait SelectionStore: Send + Sync {
    /// Read the selection stored under `key`, if any
    async fn get(&self, key: &str) -> SlotResult<Option<Selection>>;

    /// Store the selection under `key`, replacing any previous value
    async fn set(&self, key: &str, selection: &Selection) -> SlotResult<()>;
}

#[async_trait]
impl SelectionStore for RedisActorHandle {
    async fn get(&self, key: &str) -> SlotResult<Option<Selection>> {
        self.get_selection(key).await
    }

    async fn set(&self, key: &str, selection: &Selection) -> SlotResult<()> {
        self.save_selection(key, selection.clone()).await
    }
}

/// In-memory selection store holding raw JSON, as Redis would
#[derive(Debug, Clone, Default)]
pub struct InMemorySelectionStore {
    data: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value, bypassing serialization
    pub async fn set_raw(&self, key: &str, raw: impl Into<String>) {
        self.data.lock().await.insert(key.to_string(), raw.into());
    }
}

#[async_trait]
impl SelectionStore for InMemorySelectionStore {
    async fn get(&self, key: &str) -> SlotResult<Option<Selection>> {
        let data = self.data.lock().await;
        Ok(data.get(key).and_then(|raw| Selection::from_persisted(raw)))
    }

    async fn set(&self, key: &str, selection: &Selection) -> SlotResult<()> {
        let raw = serde_json::to_string(selection)?;
        self.data.lock().await.insert(key.to_string(), raw);
        Ok(())
    }
}
