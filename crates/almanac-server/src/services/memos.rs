//! Memo service

use almanac_core::ports::MemoStore;
use almanac_core::{AlmanacError, Memo, MemoPayload, Result};
use std::sync::Arc;
use tracing::{debug, info};

use super::parse_id;

pub struct MemoService {
    store: Arc<dyn MemoStore>,
}

impl MemoService {
    pub fn new(store: Arc<dyn MemoStore>) -> Self {
        Self { store }
    }

    /// Most recently updated first
    pub async fn list(&self) -> Result<Vec<Memo>> {
        self.store.list_memos().await
    }

    pub async fn get(&self, id: &str) -> Result<Memo> {
        let Some(uuid) = parse_id(id) else {
            return Err(AlmanacError::MemoNotFound(id.to_string()));
        };
        self.store
            .get_memo(uuid)
            .await?
            .ok_or_else(|| AlmanacError::MemoNotFound(id.to_string()))
    }

    pub async fn create(&self, payload: MemoPayload) -> Result<Memo> {
        let memo = Memo::create(payload);
        self.store.create_memo(&memo).await?;
        info!("Created memo: id={}, title={}", memo.id, memo.title);
        Ok(memo)
    }

    pub async fn update(&self, mut memo: Memo, payload: MemoPayload) -> Result<Memo> {
        memo.overlay(payload);
        self.store.save_memo(&memo).await?;
        info!("Updated memo: id={}", memo.id);
        Ok(memo)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        match parse_id(id) {
            Some(uuid) => {
                self.store.delete_memo(uuid).await?;
                info!("Deleted memo: id={}", uuid);
            }
            None => debug!("Ignoring delete of malformed memo id: {}", id),
        }
        Ok(())
    }
}
