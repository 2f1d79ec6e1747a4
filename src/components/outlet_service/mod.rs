use crate::components::availability::OutletSchedule;
use crate::config::Config;
use crate::error::{outlet_service_error, SlotResult};
use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

/// Source of an outlet's operating schedule and exceptions
#[async_trait]
pub trait OutletSource: Send + Sync {
    /// Fetch the schedule payload for one outlet
    async fn fetch_schedule(&self, outlet_id: &str) -> SlotResult<OutletSchedule>;
}

/// HTTP client for the outlet data service
#[derive(Debug, Clone)]
pub struct OutletClient {
    http: reqwest::Client,
    base_url: Url,
}

impl OutletClient {
    /// Create a client against the service's base URL
    pub fn new(base_url: &str) -> SlotResult<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| outlet_service_error(&format!("Invalid outlet service URL: {}", e)))?;
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> SlotResult<Self> {
        Self::new(&config.outlet_service_url)
    }

    /// Endpoint returning the schedule for an outlet
    pub fn schedule_url(&self, outlet_id: &str) -> SlotResult<Url> {
        self.base_url
            .join(&format!("outlets/{}/schedule", outlet_id))
            .map_err(|e| outlet_service_error(&format!("Invalid outlet id {:?}: {}", outlet_id, e)))
    }
}

#[async_trait]
impl OutletSource for OutletClient {
    async fn fetch_schedule(&self, outlet_id: &str) -> SlotResult<OutletSchedule> {
        let url = self.schedule_url(outlet_id)?;
        info!("Fetching schedule for outlet {}", outlet_id);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(outlet_service_error(&format!(
                "Schedule request for outlet {} failed with status {}",
                outlet_id, status
            )));
        }

        let schedule: OutletSchedule = response.json().await?;
        debug!(
            "Outlet {} returned {} exceptions",
            outlet_id,
            schedule.exceptions.len()
        );
        Ok(schedule)
    }
}
