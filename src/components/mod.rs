// Export components
pub mod availability;
pub mod outlet_service;
pub mod redis_service;
pub mod slot_picker;

pub use availability::AvailabilityEngine;
pub use outlet_service::{OutletClient, OutletSource};
pub use redis_service::{InMemorySelectionStore, RedisActorHandle, SelectionStore};
pub use slot_picker::SlotPicker;
