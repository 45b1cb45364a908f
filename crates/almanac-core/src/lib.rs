//! Almanac Core Library
//!
//! Domain types, the error type and the storage ports the server is wired
//! against.

// Re-export pure types from almanac-types
pub use almanac_types::*;

pub mod error;
pub mod ports;

pub use error::{AlmanacError, Result};
