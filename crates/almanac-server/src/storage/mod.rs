//! Storage layer
//!
//! PostgreSQL for real deployments, DashMap-backed maps for tests and local
//! runs without a database. Both implement the core store ports.

pub mod db;
pub mod memory;

pub use db::Database;
pub use memory::MemoryStore;

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Run `op` up to `attempts` times, sleeping a fixed `delay` between failures.
///
/// Returns the last error once every attempt has failed.
pub async fn retry_fixed<T, E, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= attempts => return Err(e),
            Err(e) => {
                warn!("Attempt {} of {} failed: {}", attempt, attempts, e);
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
        }
    }
}
