//! Storage traits for persistence
//!
//! Each call is one implicit transaction. Deleting an id that does not exist
//! is not an error.

use crate::Result;
use almanac_types::{Event, Memo};
use async_trait::async_trait;
use uuid::Uuid;

/// Event store
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events in storage order, unfiltered
    async fn list_events(&self) -> Result<Vec<Event>>;
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>>;
    async fn create_event(&self, event: &Event) -> Result<()>;
    /// Write the full record, inserting it if the row is gone
    async fn save_event(&self, event: &Event) -> Result<()>;
    async fn delete_event(&self, id: Uuid) -> Result<()>;
}

/// Memo store
#[async_trait]
pub trait MemoStore: Send + Sync {
    /// All memos, most recently updated first
    async fn list_memos(&self) -> Result<Vec<Memo>>;
    async fn get_memo(&self, id: Uuid) -> Result<Option<Memo>>;
    async fn create_memo(&self, memo: &Memo) -> Result<()>;
    async fn save_memo(&self, memo: &Memo) -> Result<()>;
    async fn delete_memo(&self, id: Uuid) -> Result<()>;
}
