use crate::components::availability::{
    AvailabilityEngine, DateEntry, EngineSettings, Resolution, Selection, TimeSlot,
};
use crate::components::outlet_service::OutletSource;
use crate::components::redis_service::SelectionStore;
use crate::error::SlotResult;
use chrono::NaiveDateTime;
use tracing::{info, warn};

/// Date/time picker state for one checkout session
///
/// Derived collections are rebuilt from scratch on every change; nothing is
/// patched in place.
#[derive(Debug, Clone)]
pub struct SlotPicker {
    engine: AvailabilityEngine,
    selection_key: String,
    window: Vec<DateEntry>,
    resolution: Resolution,
}

impl SlotPicker {
    /// Fetch the outlet's schedule and bind a picker to it
    pub async fn load(
        source: &dyn OutletSource,
        outlet_id: &str,
        settings: EngineSettings,
        selection_key: impl Into<String>,
    ) -> SlotResult<Self> {
        let outlet = source.fetch_schedule(outlet_id).await?;
        Ok(Self::new(
            AvailabilityEngine::new(outlet, settings),
            selection_key,
        ))
    }

    pub fn new(engine: AvailabilityEngine, selection_key: impl Into<String>) -> Self {
        Self {
            engine,
            selection_key: selection_key.into(),
            window: Vec::new(),
            resolution: Resolution::default(),
        }
    }

    pub fn window(&self) -> &[DateEntry] {
        &self.window
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Rebuild the window and reconcile it with the persisted selection
    ///
    /// When something resolves, the canonical selection is written back and
    /// returned. A failing store read is treated as no prior selection.
    pub async fn hydrate(
        &mut self,
        store: &dyn SelectionStore,
        now: &NaiveDateTime,
    ) -> SlotResult<Option<Selection>> {
        let persisted = match store.get(&self.selection_key).await {
            Ok(persisted) => persisted,
            Err(e) => {
                warn!("Could not read persisted selection, starting fresh: {}", e);
                None
            }
        };

        self.window = self.engine.build_date_window(now);
        self.resolution = self
            .engine
            .resolve_selection(persisted.as_ref(), &self.window, now);

        let (Some(entry), Some(slot)) = (&self.resolution.date_entry, &self.resolution.time_slot)
        else {
            info!("No time selection available for this outlet");
            return Ok(None);
        };

        let selection = self.engine.finalize(entry, slot, now);
        store.set(&self.selection_key, &selection).await?;
        info!("Hydrated selection: {}", selection.estimated_time);
        Ok(Some(selection))
    }

    /// Switch to another date in the window, regenerating its slots
    ///
    /// Returns the slots for the date, or `None` when the date is not in the
    /// window or not orderable.
    pub fn select_date(&mut self, date_string: &str, now: &NaiveDateTime) -> Option<&[TimeSlot]> {
        let entry = self
            .window
            .iter()
            .find(|entry| entry.is_operate && entry.date_string == date_string)?
            .clone();

        let slots = self.engine.generate_slots(&entry, now);
        let index = slots.iter().position(|slot| slot.is_operate);
        self.resolution = Resolution {
            time_slot: index.map(|i| slots[i].clone()),
            date_entry: Some(entry),
            index,
            slots,
        };
        Some(self.resolution.slots.as_slice())
    }

    /// Confirm the slot at `index` on the current date and persist it
    pub async fn confirm(
        &mut self,
        index: usize,
        store: &dyn SelectionStore,
        now: &NaiveDateTime,
    ) -> SlotResult<Option<Selection>> {
        let Some(entry) = self.resolution.date_entry.clone() else {
            return Ok(None);
        };
        let Some(slot) = self
            .resolution
            .slots
            .get(index)
            .filter(|slot| slot.is_operate)
            .cloned()
        else {
            warn!("Slot {} is not selectable on {}", index, entry.date_string);
            return Ok(None);
        };

        let selection = self.engine.finalize(&entry, &slot, now);
        store.set(&self.selection_key, &selection).await?;
        self.resolution.time_slot = Some(slot);
        self.resolution.index = Some(index);
        info!("Confirmed selection: {}", selection.estimated_time);
        Ok(Some(selection))
    }
}
