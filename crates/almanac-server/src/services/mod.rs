//! Business logic services

pub mod advice;
pub mod events;
pub mod memos;

pub use advice::{AdviceError, AdviceService};
pub use events::EventService;
pub use memos::MemoService;

use uuid::Uuid;

/// Path ids that are not UUIDs can never match a row.
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}
