//! Notification Throttle
//!
//! Remembers the last mood a popup was shown for, so the same mood is
//! never announced twice in a row.

use kudos_core::Mood;

#[derive(Debug, Clone, Default)]
pub struct NotificationThrottle {
    last_notified_mood: Option<Mood>,
}

impl NotificationThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff `mood` differs from the last one recorded.
    pub fn should_notify(&self, mood: Mood) -> bool {
        self.last_notified_mood != Some(mood)
    }

    /// Call only after the popup actually rendered.
    pub fn record_notified(&mut self, mood: Mood) {
        self.last_notified_mood = Some(mood);
    }

    pub fn last_notified(&self) -> Option<Mood> {
        self.last_notified_mood
    }
}
