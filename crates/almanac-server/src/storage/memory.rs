//! In-memory store using DashMap (stands in for PostgreSQL)

use almanac_core::ports::{EventStore, MemoStore};
use almanac_core::{Event, Memo, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Reverse;
use uuid::Uuid;

/// Process-local event and memo tables
///
/// Events list in creation order, memos most recently updated first, the
/// same orders the Postgres adapter yields.
#[derive(Default)]
pub struct MemoryStore {
    events: DashMap<Uuid, Event>,
    memos: DashMap<Uuid, Memo>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.events.iter().map(|e| e.value().clone()).collect();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.events.get(&id).map(|e| e.value().clone()))
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        self.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn save_event(&self, event: &Event) -> Result<()> {
        self.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        self.events.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl MemoStore for MemoryStore {
    async fn list_memos(&self) -> Result<Vec<Memo>> {
        let mut memos: Vec<Memo> = self.memos.iter().map(|m| m.value().clone()).collect();
        memos.sort_by_key(|m| Reverse(m.updated_at));
        Ok(memos)
    }

    async fn get_memo(&self, id: Uuid) -> Result<Option<Memo>> {
        Ok(self.memos.get(&id).map(|m| m.value().clone()))
    }

    async fn create_memo(&self, memo: &Memo) -> Result<()> {
        self.memos.insert(memo.id, memo.clone());
        Ok(())
    }

    async fn save_memo(&self, memo: &Memo) -> Result<()> {
        self.memos.insert(memo.id, memo.clone());
        Ok(())
    }

    async fn delete_memo(&self, id: Uuid) -> Result<()> {
        self.memos.remove(&id);
        Ok(())
    }
}
