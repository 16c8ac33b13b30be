//! Psychological State Store
//!
//! Single owner of the session's [`PsychologicalState`]. The value lives
//! inside a `watch` channel so that:
//! - `get()` always reads the latest merge (no staleness window)
//! - every `merge()` wakes subscribers, which is the one re-evaluation
//!   trigger for the resolver callers and the notification throttle

use chrono::{DateTime, Utc};
use kudos_core::{Mood, PartialState, PsychologicalState};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Mood transitions kept in memory.
const HISTORY_LIMIT: usize = 20;

/// A mood that has just been left, and how long it was held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodChange {
    pub mood: Mood,
    /// When this mood began.
    pub at: DateTime<Utc>,
    pub held_for: Duration,
}

#[derive(Debug)]
struct MoodHistory {
    entries: VecDeque<MoodChange>,
    current_since: DateTime<Utc>,
}

impl MoodHistory {
    fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_LIMIT),
            current_since: Utc::now(),
        }
    }

    fn leave(&mut self, previous: Mood, now: DateTime<Utc>) {
        if self.entries.len() == HISTORY_LIMIT {
            self.entries.pop_front();
        }
        self.entries.push_back(MoodChange {
            mood: previous,
            at: self.current_since,
            held_for: (now - self.current_since).to_std().unwrap_or_default(),
        });
        self.current_since = now;
    }
}

pub struct PsychologicalStateStore {
    tx: watch::Sender<PsychologicalState>,
    history: Mutex<MoodHistory>,
}

impl PsychologicalStateStore {
    /// Fresh session state: neutral / low / low / medium.
    pub fn new() -> Self {
        Self::with_state(PsychologicalState::default())
    }

    pub fn with_state(initial: PsychologicalState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            history: Mutex::new(MoodHistory::new()),
        }
    }

    pub fn get(&self) -> PsychologicalState {
        *self.tx.borrow()
    }

    /// Shallow-merge the provided fields and notify subscribers.
    ///
    /// Subscribers are woken even when the merge changes nothing; callers
    /// that care about real changes compare values themselves.
    pub fn merge(&self, partial: PartialState) {
        let mut left_mood = None;
        self.tx.send_modify(|state| {
            let before = state.mood;
            state.apply(&partial);
            if state.mood != before {
                left_mood = Some(before);
            }
        });

        if let Some(previous) = left_mood {
            self.history
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .leave(previous, Utc::now());
        }

        tracing::debug!("State merged: {}", self.get().describe());
    }

    /// Receiver that observes every merge.
    pub fn subscribe(&self) -> watch::Receiver<PsychologicalState> {
        self.tx.subscribe()
    }

    /// Most recent mood transitions, oldest first.
    pub fn history(&self) -> Vec<MoodChange> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .cloned()
            .collect()
    }

    /// Back to the session default; history is cleared.
    pub fn reset(&self) {
        self.tx.send_replace(PsychologicalState::default());
        *self.history.lock().unwrap_or_else(PoisonError::into_inner) = MoodHistory::new();
        tracing::debug!("State store reset");
    }
}

impl Default for PsychologicalStateStore {
    fn default() -> Self {
        Self::new()
    }
}
