//! Detection Probes - activity patterns in, state guesses out
//!
//! Probes never touch the store directly. They return [`PartialState`]
//! values that the host merges (or feeds to the engine as events), so the
//! same monitor works in tests with a fixed clock.
//!
//! Two views of a session are kept:
//! - wall-clock: session start, last activity, recent action timestamps
//! - accumulated: minutes reported by study/social work, total actions

use chrono::{DateTime, Duration, Local, Timelike};
use kudos_core::{Level, Mood, PartialState, ProbeConfig};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Study,
    Social,
    Contribution,
    Idle,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Study => "study",
            ActivityKind::Social => "social",
            ActivityKind::Contribution => "contribution",
            ActivityKind::Idle => "idle",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadReason {
    LongSession,
    HighActivity,
    Inactive,
    Normal,
}

/// Coarse verdict on how heavy the current session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLoad {
    pub is_stressed: bool,
    pub reason: LoadReason,
    /// 0-100, how strongly the reason applies.
    pub intensity: u8,
}

pub struct ActivityMonitor {
    config: ProbeConfig,
    session_start: DateTime<Local>,
    last_activity: DateTime<Local>,
    /// Last `recent_actions` actions.
    recent: VecDeque<(ActivityKind, DateTime<Local>)>,
    /// Actions inside the motivation window, pruned lazily.
    window: VecDeque<DateTime<Local>>,
    total_actions: u32,
    accumulated_mins: u32,
}

impl ActivityMonitor {
    pub fn new(config: ProbeConfig, now: DateTime<Local>) -> Self {
        Self {
            recent: VecDeque::with_capacity(config.recent_actions),
            window: VecDeque::new(),
            config,
            session_start: now,
            last_activity: now,
            total_actions: 0,
            accumulated_mins: 0,
        }
    }

    /// Record one action. Some activities imply a state change right away.
    pub fn record(
        &mut self,
        kind: ActivityKind,
        minutes: u32,
        at: DateTime<Local>,
    ) -> Option<PartialState> {
        self.last_activity = at;
        self.total_actions = self.total_actions.saturating_add(1);
        self.accumulated_mins = self.accumulated_mins.saturating_add(minutes);

        if self.config.recent_actions > 0 {
            if self.recent.len() == self.config.recent_actions {
                self.recent.pop_front();
            }
            self.recent.push_back((kind, at));
        }
        self.window.push_back(at);
        self.prune_window(at);

        tracing::trace!("Activity recorded: {} ({} min)", kind, minutes);

        match kind {
            ActivityKind::Study if minutes > 30 => {
                Some(PartialState::new().mood(Mood::Focused).focus(Level::High))
            }
            ActivityKind::Social => Some(PartialState::new().mood(Mood::Happy)),
            ActivityKind::Contribution => Some(
                PartialState::new()
                    .mood(Mood::Energized)
                    .motivation(Level::High),
            ),
            _ => None,
        }
    }

    fn prune_window(&mut self, now: DateTime<Local>) {
        let cutoff = now - Duration::minutes(self.config.activity_window_mins);
        while self.window.front().is_some_and(|t| *t <= cutoff) {
            self.window.pop_front();
        }
    }

    pub fn is_late_night(&self, now: DateTime<Local>) -> bool {
        let hour = now.hour();
        hour >= self.config.late_night_start || hour <= self.config.late_night_end
    }

    /// Long session, long idle gap or late night.
    pub fn is_stressed(&self, now: DateTime<Local>) -> bool {
        let session = now - self.session_start;
        let idle = now - self.last_activity;
        session > Duration::minutes(self.config.long_session_mins)
            || idle > Duration::minutes(self.config.idle_mins)
            || self.is_late_night(now)
    }

    pub fn motivation(&self, now: DateTime<Local>) -> Level {
        let cutoff = now - Duration::minutes(self.config.activity_window_mins);
        let count = self.window.iter().filter(|t| **t > cutoff).count();
        if count > 10 {
            Level::High
        } else if count > 3 {
            Level::Medium
        } else {
            Level::Low
        }
    }

    /// Actions per minute over the whole session.
    pub fn focus(&self, now: DateTime<Local>) -> Level {
        let elapsed_ms = (now - self.session_start).num_milliseconds();
        if elapsed_ms <= 0 {
            return Level::Low;
        }
        let per_minute = self.recent.len() as f64 / (elapsed_ms as f64 / 60_000.0);
        if per_minute > 5.0 {
            Level::High
        } else if per_minute > 2.0 {
            Level::Medium
        } else {
            Level::Low
        }
    }

    /// Full periodic inference, meant to be merged into the store.
    pub fn infer(&self, now: DateTime<Local>) -> PartialState {
        let stressed = self.is_stressed(now);
        let motivation = self.motivation(now);
        let focus = self.focus(now);

        let mood = if stressed {
            Mood::Stressed
        } else if motivation == Level::High {
            Mood::Happy
        } else if focus == Level::High {
            Mood::Focused
        } else {
            Mood::Neutral
        };
        let stress = if stressed { Level::High } else { Level::Low };

        PartialState::new()
            .mood(mood)
            .stress(stress)
            .focus(focus)
            .motivation(motivation)
    }

    pub fn session_load(&self, now: DateTime<Local>) -> SessionLoad {
        let idle = now - self.last_activity;
        if self.accumulated_mins > self.config.session_load_mins {
            SessionLoad {
                is_stressed: true,
                reason: LoadReason::LongSession,
                intensity: 70,
            }
        } else if self.total_actions > self.config.high_activity_actions {
            SessionLoad {
                is_stressed: true,
                reason: LoadReason::HighActivity,
                intensity: 60,
            }
        } else if idle > Duration::minutes(self.config.inactive_mins) {
            SessionLoad {
                is_stressed: false,
                reason: LoadReason::Inactive,
                intensity: 30,
            }
        } else {
            SessionLoad {
                is_stressed: false,
                reason: LoadReason::Normal,
                intensity: 50,
            }
        }
    }

    pub fn suggest_break(&self, now: DateTime<Local>) -> bool {
        let load = self.session_load(now);
        load.is_stressed && load.reason == LoadReason::LongSession
    }

    /// Start a fresh session, e.g. after a break was taken.
    pub fn reset_session(&mut self, now: DateTime<Local>) {
        self.session_start = now;
        self.last_activity = now;
        self.recent.clear();
        self.window.clear();
        self.total_actions = 0;
        self.accumulated_mins = 0;
        tracing::debug!("Activity session reset");
    }

    pub fn total_actions(&self) -> u32 {
        self.total_actions
    }

    pub fn accumulated_minutes(&self) -> u32 {
        self.accumulated_mins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, hour, min, 0).single().unwrap()
    }

    fn monitor(start: DateTime<Local>) -> ActivityMonitor {
        ActivityMonitor::new(ProbeConfig::default(), start)
    }

    #[test]
    fn test_record_implies_state() {
        let mut m = monitor(at(14, 0));
        let focused = m.record(ActivityKind::Study, 45, at(14, 1)).unwrap();
        assert_eq!(focused.mood, Some(Mood::Focused));
        assert_eq!(focused.focus_level, Some(Level::High));

        assert!(m.record(ActivityKind::Study, 10, at(14, 2)).is_none());
        assert_eq!(
            m.record(ActivityKind::Social, 0, at(14, 3)).unwrap().mood,
            Some(Mood::Happy)
        );
        let energized = m.record(ActivityKind::Contribution, 0, at(14, 4)).unwrap();
        assert_eq!(energized.motivation_level, Some(Level::High));
        assert!(m.record(ActivityKind::Idle, 0, at(14, 5)).is_none());
    }

    #[test]
    fn test_fresh_daytime_session_is_calm() {
        let m = monitor(at(14, 0));
        let p = m.infer(at(14, 5));
        assert_eq!(p.mood, Some(Mood::Neutral));
        assert_eq!(p.stress_level, Some(Level::Low));
        assert_eq!(p.motivation_level, Some(Level::Low));
    }

    #[test]
    fn test_long_session_is_stressful() {
        let mut m = monitor(at(9, 0));
        m.record(ActivityKind::Study, 0, at(10, 5));
        assert!(m.is_stressed(at(10, 6)));
        let p = m.infer(at(10, 6));
        assert_eq!(p.mood, Some(Mood::Stressed));
        assert_eq!(p.stress_level, Some(Level::High));
    }

    #[test]
    fn test_idle_gap_is_stressful() {
        let mut m = monitor(at(14, 0));
        m.record(ActivityKind::Study, 0, at(14, 0));
        assert!(!m.is_stressed(at(14, 30)));
        assert!(m.is_stressed(at(14, 31)));
    }

    #[test]
    fn test_late_night_window() {
        let m = monitor(at(14, 0));
        assert!(m.is_late_night(at(22, 0)));
        assert!(m.is_late_night(at(3, 0)));
        assert!(m.is_late_night(at(6, 59)));
        assert!(!m.is_late_night(at(7, 0)));
        assert!(!m.is_late_night(at(21, 59)));
    }

    #[test]
    fn test_motivation_counts_window() {
        let mut m = monitor(at(14, 0));
        for i in 0..4 {
            m.record(ActivityKind::Idle, 0, at(14, i));
        }
        assert_eq!(m.motivation(at(14, 5)), Level::Medium);
        // The burst slides out of the ten minute window.
        assert_eq!(m.motivation(at(14, 11)), Level::Low);
    }

    #[test]
    fn test_busy_window_is_happy() {
        let mut m = monitor(at(14, 0));
        for i in 0..12 {
            m.record(ActivityKind::Idle, 0, at(14, 0) + Duration::seconds(i * 10));
        }
        let now = at(14, 2) + Duration::seconds(10);
        assert_eq!(m.motivation(now), Level::High);
        assert_eq!(m.infer(now).mood, Some(Mood::Happy));
    }

    #[test]
    fn test_focus_from_rate() {
        let mut m = monitor(at(14, 0));
        for i in 0..10 {
            m.record(ActivityKind::Study, 0, at(14, 0) + Duration::seconds(i * 6));
        }
        assert_eq!(m.focus(at(14, 1)), Level::High);
        assert_eq!(m.focus(at(14, 4)), Level::Medium);
        assert_eq!(m.focus(at(14, 9)), Level::Low);
        assert_eq!(m.focus(at(14, 0)), Level::Low);
    }

    #[test]
    fn test_session_load_reasons() {
        let mut m = monitor(at(14, 0));
        assert_eq!(m.session_load(at(14, 1)).reason, LoadReason::Normal);
        assert_eq!(m.session_load(at(15, 1)).reason, LoadReason::Inactive);
        assert!(!m.suggest_break(at(15, 1)));

        for i in 0..51 {
            m.record(ActivityKind::Social, 0, at(15, 0) + Duration::seconds(i));
        }
        let load = m.session_load(at(15, 2));
        assert_eq!(load.reason, LoadReason::HighActivity);
        assert!(load.is_stressed);
        assert!(!m.suggest_break(at(15, 2)));

        m.record(ActivityKind::Study, 121, at(15, 3));
        assert_eq!(m.session_load(at(15, 4)).reason, LoadReason::LongSession);
        assert!(m.suggest_break(at(15, 4)));
    }

    #[test]
    fn test_reset_session() {
        let mut m = monitor(at(9, 0));
        m.record(ActivityKind::Study, 200, at(12, 0));
        m.reset_session(at(12, 30));
        assert_eq!(m.total_actions(), 0);
        assert_eq!(m.accumulated_minutes(), 0);
        assert!(!m.suggest_break(at(12, 31)));
        assert!(!m.is_stressed(at(12, 31)));
    }
}
