use crate::components::redis_service::RedisActor;
use crate::components::{OutletClient, SlotPicker};
use crate::config::Config;
use crate::error::Error;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Fetch the outlet, hydrate the picker against the persisted selection and
/// print the canonical selection as JSON
pub async fn run(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    let (outlet_id, tz, settings, selection_key, client) = {
        let config_read = config.read().await;
        (
            config_read.outlet_id.clone(),
            config_read.tz()?,
            config_read.engine.clone(),
            config_read.selection_key(),
            OutletClient::from_config(&config_read)?,
        )
    };

    // Initialize Redis service
    let (mut redis_actor, redis_handle) = RedisActor::new(Arc::clone(&config));
    let redis_task = tokio::spawn(async move {
        redis_actor.run().await;
    });

    let result = async {
        let mut picker = SlotPicker::load(&client, &outlet_id, settings, selection_key).await?;

        // Outlet-local wall clock
        let now = Utc::now().with_timezone(&tz).naive_local();
        let selection = picker.hydrate(&redis_handle, &now).await?;

        for entry in picker.window() {
            info!(
                "{} {} ({}): {:?}",
                entry.date_string,
                entry.day_name.as_str(),
                entry.label,
                entry.classification
            );
        }
        let slots: Vec<&str> = picker
            .resolution()
            .slots
            .iter()
            .filter(|slot| slot.is_operate)
            .map(|slot| slot.time.as_str())
            .collect();
        info!("Selectable slots: {}", slots.join(", "));

        match selection {
            Some(selection) => println!("{}", serde_json::to_string_pretty(&selection)?),
            None => println!("No time selection for this outlet"),
        }
        Ok::<(), Error>(())
    }
    .await;

    redis_handle.shutdown().await?;
    if let Err(e) = redis_task.await {
        error!("Redis actor task error: {:?}", e);
    }

    result.map_err(Into::into)
}
