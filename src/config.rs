use crate::components::availability::EngineSettings;
use crate::error::{config_error, env_error, SlotResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Default Redis connection string
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default prefix of the persisted selection key
pub const DEFAULT_SELECTION_KEY_PREFIX: &str = "order_slot:selection";

/// Default outlet timezone
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Optional file overriding engine tunables
pub const ENGINE_CONFIG_PATH: &str = "config/engine.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the outlet data service
    pub outlet_service_url: String,
    /// Outlet whose availability is computed
    pub outlet_id: String,
    /// Redis connection string for the selection store
    pub redis_url: String,
    /// Current order session; scopes the persisted selection
    pub session_id: String,
    /// Prefix of the persisted selection key
    pub selection_key_prefix: String,
    /// IANA timezone the outlet's wall clock runs in
    pub timezone: String,
    /// Slot generation tunables
    pub engine: EngineSettings,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> SlotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let outlet_service_url =
            env::var("OUTLET_SERVICE_URL").map_err(|_| env_error("OUTLET_SERVICE_URL"))?;
        let outlet_id = env::var("OUTLET_ID").map_err(|_| env_error("OUTLET_ID"))?;

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| String::from(DEFAULT_REDIS_URL));
        let session_id = env::var("ORDER_SESSION_ID").unwrap_or_else(|_| String::from("default"));
        let selection_key_prefix = env::var("SELECTION_KEY_PREFIX")
            .unwrap_or_else(|_| String::from(DEFAULT_SELECTION_KEY_PREFIX));
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE));
        Self::parse_timezone(&timezone)?;

        let engine = Self::load_engine_settings(Path::new(ENGINE_CONFIG_PATH))?;

        Ok(Config {
            outlet_service_url,
            outlet_id,
            redis_url,
            session_id,
            selection_key_prefix,
            timezone,
            engine,
        })
    }

    /// Read engine tunables, falling back to defaults when the file is absent
    pub fn load_engine_settings(path: &Path) -> SlotResult<EngineSettings> {
        if !path.exists() {
            return Ok(EngineSettings::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse_engine_settings(&content)
    }

    /// Parse engine tunables; keys missing from the file keep their defaults
    pub fn parse_engine_settings(content: &str) -> SlotResult<EngineSettings> {
        let settings: EngineSettings = toml::from_str(content)?;

        if settings.slot_granularity_minutes == 0 || 60 % settings.slot_granularity_minutes != 0 {
            return Err(config_error("slot_granularity_minutes must divide an hour"));
        }
        if settings.window_days == 0 {
            return Err(config_error("window_days must be at least 1"));
        }

        Ok(settings)
    }

    /// Parse an IANA timezone name such as "Europe/Helsinki"
    pub fn parse_timezone(name: &str) -> SlotResult<Tz> {
        name.trim()
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Invalid timezone: {}", name)))
    }

    /// The outlet's timezone
    pub fn tz(&self) -> SlotResult<Tz> {
        Self::parse_timezone(&self.timezone)
    }

    /// Storage key of the persisted selection for this session
    pub fn selection_key(&self) -> String {
        format!("{}:{}", self.selection_key_prefix, self.session_id)
    }
}
