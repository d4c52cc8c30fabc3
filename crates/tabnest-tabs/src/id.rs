//! Tab id allocation

use chrono::Utc;

/// Restored ids above this are left out of the sequence. Generated ids stay
/// far below it, so they cannot collide with such ids either.
const MAX_OBSERVED_ID: i64 = i64::MAX / 2;

/// Time-derived, strictly increasing tab ids.
///
/// Ids are millisecond timestamps bumped past the last id handed out or
/// observed, so a closed tab's id is never reissued within a session.
#[derive(Debug, Clone, Default)]
pub struct TabIdGenerator {
    last: i64,
}

impl TabIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last.saturating_add(1));
        self.last = id;
        id.to_string()
    }

    /// Record an id that exists outside the generator (e.g. restored from storage).
    /// Non-numeric ids cannot collide with generated ones and are ignored.
    pub fn observe(&mut self, id: &str) {
        match id.parse::<i64>() {
            Ok(value) if value <= MAX_OBSERVED_ID => self.last = self.last.max(value),
            _ => {}
        }
    }
}
