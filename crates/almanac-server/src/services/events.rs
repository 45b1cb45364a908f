//! Calendar event service

use almanac_core::ports::EventStore;
use almanac_core::{AlmanacError, Event, EventPayload, Result};
use std::sync::Arc;
use tracing::{debug, info};

use super::parse_id;

pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        self.store.list_events().await
    }

    /// Look up an event by its path id.
    pub async fn get(&self, id: &str) -> Result<Event> {
        let Some(uuid) = parse_id(id) else {
            return Err(AlmanacError::EventNotFound(id.to_string()));
        };
        self.store
            .get_event(uuid)
            .await?
            .ok_or_else(|| AlmanacError::EventNotFound(id.to_string()))
    }

    pub async fn create(&self, payload: EventPayload) -> Result<Event> {
        let event = Event::create(payload);
        self.store.create_event(&event).await?;
        info!("Created event: id={}, title={}", event.id, event.title);
        Ok(event)
    }

    /// Overlay `payload` onto an already loaded event and save the result.
    pub async fn update(&self, mut event: Event, payload: EventPayload) -> Result<Event> {
        event.overlay(payload);
        self.store.save_event(&event).await?;
        info!("Updated event: id={}", event.id);
        Ok(event)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        match parse_id(id) {
            Some(uuid) => {
                self.store.delete_event(uuid).await?;
                info!("Deleted event: id={}", uuid);
            }
            None => debug!("Ignoring delete of malformed event id: {}", id),
        }
        Ok(())
    }
}
