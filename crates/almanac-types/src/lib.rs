//! Almanac Types - Pure type definitions
//!
//! Entities persisted by the server, the JSON payloads that bind onto them,
//! and the advice request/response shapes.

pub mod advice;
pub mod event;
pub mod memo;
pub mod user;

pub use advice::*;
pub use event::*;
pub use memo::*;
pub use user::*;

/// Canonical form of a payload key: ASCII case and underscores are ignored,
/// so `StartTime`, `startTime`, `start_time` and `STARTTIME` all match.
pub(crate) fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Replace `slot` only when the payload carried a non-null value.
pub(crate) fn set_if_present<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_key() {
        for key in ["StartTime", "startTime", "start_time", "STARTTIME", "starttime"] {
            assert_eq!(fold_key(key), "starttime");
        }
        assert_eq!(fold_key("UserID"), "userid");
    }

    #[test]
    fn test_set_if_present_keeps_earlier_value_on_null() {
        let mut slot = Some(1);
        set_if_present(&mut slot, None);
        assert_eq!(slot, Some(1));
        set_if_present(&mut slot, Some(2));
        assert_eq!(slot, Some(2));
    }
}
