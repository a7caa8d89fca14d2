//! Time-derived identifiers for sessions and messages.
//!
//! Ids look like `session-1717171717171` / `msg-1717171717172`. Two ids
//! generated in the same millisecond would collide, so the generator never
//! hands out a value that is not strictly greater than the previous one.
//!
//! Observed ids more than [`MAX_CLOCK_SKEW_MILLIS`] ahead of the clock are
//! ignored: an imported `session-9223372036854775807` must not leave the
//! generator without room to count upwards.

use chrono::Utc;

pub const SESSION_PREFIX: &str = "session-";
pub const MESSAGE_PREFIX: &str = "msg-";

/// How far ahead of the local clock an observed id may be
pub const MAX_CLOCK_SKEW_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Monotonic id source for one controller
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_session_id(&mut self) -> String {
        format!("{}{}", SESSION_PREFIX, self.next_value())
    }

    pub fn next_message_id(&mut self) -> String {
        format!("{}{}", MESSAGE_PREFIX, self.next_value())
    }

    /// Account for an id that already exists (loaded or imported) so that
    /// later ids never repeat it.
    pub fn observe(&mut self, id: &str) {
        self.observe_at(id, Utc::now().timestamp_millis());
    }

    fn observe_at(&mut self, id: &str, now_millis: i64) {
        let suffix = id
            .strip_prefix(SESSION_PREFIX)
            .or_else(|| id.strip_prefix(MESSAGE_PREFIX));
        let Some(value) = suffix.and_then(|s| s.parse::<i64>().ok()) else {
            return;
        };
        if value > now_millis.saturating_add(MAX_CLOCK_SKEW_MILLIS) {
            return;
        }
        self.last = self.last.max(value);
    }

    fn next_value(&mut self) -> i64 {
        self.next_value_at(Utc::now().timestamp_millis())
    }

    fn next_value_at(&mut self, now_millis: i64) -> i64 {
        let value = if now_millis > self.last {
            now_millis
        } else {
            self.last.saturating_add(1)
        };
        self.last = value;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_millisecond_is_bumped() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_value_at(1000), 1000);
        assert_eq!(ids.next_value_at(1000), 1001);
        assert_eq!(ids.next_value_at(1000), 1002);
        assert_eq!(ids.next_value_at(2000), 2000);
    }

    #[test]
    fn test_prefixes() {
        let mut ids = IdGenerator::new();
        assert!(ids.next_session_id().starts_with("session-"));
        assert!(ids.next_message_id().starts_with("msg-"));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let mut ids = IdGenerator::new();
        let a = ids.next_message_id();
        let b = ids.next_message_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_observe_skips_past_existing_ids() {
        let mut ids = IdGenerator::new();
        ids.observe_at("session-5000", 1000);
        ids.observe_at("imported-id", 1000);
        assert_eq!(ids.next_value_at(1000), 5001);
    }

    #[test]
    fn test_observe_ignores_ids_far_ahead_of_clock() {
        let mut ids = IdGenerator::new();
        ids.observe_at(&format!("session-{}", i64::MAX), 1000);
        ids.observe_at(&format!("msg-{}", 1000 + MAX_CLOCK_SKEW_MILLIS + 1), 1000);
        assert_eq!(ids.next_value_at(1000), 1000);

        let mut ids = IdGenerator::new();
        ids.observe(&format!("session-{}", i64::MAX));
        assert!(ids.next_session_id() != format!("session-{}", i64::MAX));
    }

    #[test]
    fn test_next_value_saturates_at_max() {
        let mut ids = IdGenerator { last: i64::MAX - 1 };
        assert_eq!(ids.next_value_at(0), i64::MAX);
        assert_eq!(ids.next_value_at(0), i64::MAX);
    }
}
