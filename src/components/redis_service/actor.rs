use crate::components::availability::Selection;
use crate::config::Config;
use crate::error::{storage_error, SlotResult};
use redis::{aio::MultiplexedConnection, AsyncCommands, Client as RedisClient};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

/// The Redis actor that processes storage commands
pub struct RedisActor {
    config: Arc<RwLock<Config>>,
    connection: Option<MultiplexedConnection>,
    command_rx: mpsc::Receiver<RedisCommand>,
}

/// Commands that can be sent to the Redis actor
pub enum RedisCommand {
    GetSelection(String, mpsc::Sender<SlotResult<Option<Selection>>>),
    SaveSelection(String, Selection, mpsc::Sender<SlotResult<()>>),
    Shutdown,
}

/// Handle for communicating with the Redis actor
#[derive(Clone)]
pub struct RedisActorHandle {
    command_tx: mpsc::Sender<RedisCommand>,
}

impl RedisActorHandle {
    /// Create a new empty handle for initialization purposes
    pub fn empty() -> Self {
        let (command_tx, _) = mpsc::channel(32);
        Self { command_tx }
    }

    /// Read the selection stored under `key`
    pub async fn get_selection(&self, key: impl Into<String>) -> SlotResult<Option<Selection>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(RedisCommand::GetSelection(key.into(), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Store the selection under `key`, replacing any previous value
    pub async fn save_selection(
        &self,
        key: impl Into<String>,
        selection: Selection,
    ) -> SlotResult<()> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(RedisCommand::SaveSelection(key.into(), selection, response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> SlotResult<()> {
        let _ = self.command_tx.send(RedisCommand::Shutdown).await;
        Ok(())
    }
}

impl RedisActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<RwLock<Config>>) -> (Self, RedisActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            config,
            connection: None,
            command_rx,
        };

        let handle = RedisActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Redis actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                RedisCommand::GetSelection(key, response_tx) => {
                    let result = self.get_selection_from_redis(&key).await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::SaveSelection(key, selection, response_tx) => {
                    let result = self.save_selection_to_redis(&key, &selection).await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::Shutdown => {
                    info!("Redis actor shutting down");
                    break;
                }
            }
        }

        info!("Redis actor shut down");
    }

    /// Get a redis connection, connecting on first use
    async fn get_redis_connection(&mut self) -> SlotResult<MultiplexedConnection> {
        if let Some(connection) = &self.connection {
            return Ok(connection.clone());
        }

        let redis_url = {
            let config_guard = self.config.read().await;
            config_guard.redis_url.clone()
        };

        let client = RedisClient::open(redis_url)
            .map_err(|e| storage_error(&format!("Failed to create Redis client: {}", e)))?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| storage_error(&format!("Failed to connect to Redis: {}", e)))?;

        self.connection = Some(connection.clone());
        Ok(connection)
    }

    /// Read a selection; an unreadable record counts as no selection
    async fn get_selection_from_redis(&mut self, key: &str) -> SlotResult<Option<Selection>> {
        let mut redis_conn = self.get_redis_connection().await?;

        let raw: Option<String> = redis_conn.get(key).await?;

        Ok(raw.and_then(|raw| {
            let selection = Selection::from_persisted(&raw);
            if selection.is_none() {
                warn!("Discarding unreadable selection stored under {}", key);
            }
            selection
        }))
    }

    /// Save a selection as JSON
    async fn save_selection_to_redis(
        &mut self,
        key: &str,
        selection: &Selection,
    ) -> SlotResult<()> {
        let mut redis_conn = self.get_redis_connection().await?;

        let selection_json = serde_json::to_string(selection)?;

        () = redis_conn.set(key, selection_json).await?;

        Ok(())
    }
}
