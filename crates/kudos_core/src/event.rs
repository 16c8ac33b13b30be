//! Product events that may deserve feedback.

use crate::effect::Position;
use crate::state::{Level, Mood, PartialState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of product events the engine knows about. Anything else arrives as
/// [`EventKind::Other`] and still gets (gentle) feedback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AchievementUnlocked,
    GoalReached,
    StreakMaintained,
    HelpProvided,
    ContentCreated,
    PostLiked,
    StudySessionCompleted,
    PeerInteraction,
    ChallengeCompleted,
    ConsistencyMaintained,
    PositiveFeedbackReceived,
    StressDetected,
    LowMotivation,
    FocusAchieved,
    BreakNeeded,
    Other(String),
}

static KNOWN: [EventKind; 15] = [
    EventKind::AchievementUnlocked,
    EventKind::GoalReached,
    EventKind::StreakMaintained,
    EventKind::HelpProvided,
    EventKind::ContentCreated,
    EventKind::PostLiked,
    EventKind::StudySessionCompleted,
    EventKind::PeerInteraction,
    EventKind::ChallengeCompleted,
    EventKind::ConsistencyMaintained,
    EventKind::PositiveFeedbackReceived,
    EventKind::StressDetected,
    EventKind::LowMotivation,
    EventKind::FocusAchieved,
    EventKind::BreakNeeded,
];

impl EventKind {
    /// All recognized kinds (excludes `Other`).
    pub fn known() -> &'static [EventKind] {
        &KNOWN
    }

    /// Never fails: unrecognized names become `Other(name)`.
    pub fn parse(s: &str) -> Self {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        KNOWN
            .iter()
            .find(|k| k.as_str() == needle)
            .cloned()
            .unwrap_or(EventKind::Other(needle))
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::AchievementUnlocked => "achievement_unlocked",
            EventKind::GoalReached => "goal_reached",
            EventKind::StreakMaintained => "streak_maintained",
            EventKind::HelpProvided => "help_provided",
            EventKind::ContentCreated => "content_created",
            EventKind::PostLiked => "post_liked",
            EventKind::StudySessionCompleted => "study_session_completed",
            EventKind::PeerInteraction => "peer_interaction",
            EventKind::ChallengeCompleted => "challenge_completed",
            EventKind::ConsistencyMaintained => "consistency_maintained",
            EventKind::PositiveFeedbackReceived => "positive_feedback_received",
            EventKind::StressDetected => "stress_detected",
            EventKind::LowMotivation => "low_motivation",
            EventKind::FocusAchieved => "focus_achieved",
            EventKind::BreakNeeded => "break_needed",
            EventKind::Other(name) => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EventKind::Other(_))
    }

    /// State change an event implies before feedback is chosen.
    pub fn implied_state(&self) -> Option<PartialState> {
        let partial = match self {
            EventKind::AchievementUnlocked | EventKind::GoalReached | EventKind::StreakMaintained => {
                PartialState::new()
                    .mood(Mood::Happy)
                    .motivation(Level::High)
                    .stress(Level::Low)
            }
            EventKind::StressDetected => PartialState::new().mood(Mood::Stressed).stress(Level::High),
            EventKind::LowMotivation => PartialState::new().mood(Mood::Sad).motivation(Level::Low),
            EventKind::FocusAchieved => PartialState::new().mood(Mood::Focused).focus(Level::High),
            EventKind::BreakNeeded => PartialState::new().mood(Mood::Tired).stress(Level::High),
            _ => return None,
        };
        Some(partial)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event as delivered by a detection probe or a product screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub kind: EventKind,
    /// Overrides the category's default message when present.
    pub message: Option<String>,
    pub position: Option<Position>,
}

impl FeedbackEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            message: None,
            position: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

impl From<EventKind> for FeedbackEvent {
    fn from(kind: EventKind) -> Self {
        FeedbackEvent::new(kind)
    }
}
