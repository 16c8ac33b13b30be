//! Inferred Psychological State
//!
//! The engine does not measure emotion; it keeps a coarse, session-scoped
//! guess made of four discrete fields:
//! - `mood`: the dominant felt tone (happy, stressed, tired, ...)
//! - `stress_level`, `focus_level`, `motivation_level`: low / medium / high
//!
//! Detection probes and UI interactions update it through [`PartialState`]
//! merges. Nothing here is persisted.

use crate::error::{KudosError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Mood
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Sad,
    #[default]
    Neutral,
    Stressed,
    Calm,
    Focused,
    Tired,
    Energized,
    Excited,
}

impl Mood {
    pub const ALL: [Mood; 9] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Neutral,
        Mood::Stressed,
        Mood::Calm,
        Mood::Focused,
        Mood::Tired,
        Mood::Energized,
        Mood::Excited,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
            Mood::Stressed => "stressed",
            Mood::Calm => "calm",
            Mood::Focused => "focused",
            Mood::Tired => "tired",
            Mood::Energized => "energized",
            Mood::Excited => "excited",
        }
    }

    /// Upbeat moods count as a motivation signal when deriving categories.
    pub fn is_upbeat(&self) -> bool {
        matches!(self, Mood::Happy | Mood::Excited | Mood::Energized)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = KudosError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == needle)
            .ok_or_else(|| KudosError::unknown("mood", s))
    }
}

// =============================================================================
// Level
// =============================================================================

/// Three-step scale shared by stress, focus and motivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }

    /// One step up, saturating at `High`.
    pub fn raised(self) -> Level {
        match self {
            Level::Low => Level::Medium,
            Level::Medium | Level::High => Level::High,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = KudosError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            _ => Err(KudosError::unknown("level", s)),
        }
    }
}

// =============================================================================
// PsychologicalState
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsychologicalState {
    pub mood: Mood,
    pub stress_level: Level,
    pub focus_level: Level,
    pub motivation_level: Level,
}

impl Default for PsychologicalState {
    fn default() -> Self {
        Self {
            mood: Mood::Neutral,
            stress_level: Level::Low,
            focus_level: Level::Low,
            motivation_level: Level::Medium,
        }
    }
}

impl PsychologicalState {
    /// Shallow-merge: only the fields present in `partial` are overwritten.
    /// Returns true if any field actually changed.
    pub fn apply(&mut self, partial: &PartialState) -> bool {
        let before = *self;
        if let Some(mood) = partial.mood {
            self.mood = mood;
        }
        if let Some(stress) = partial.stress_level {
            self.stress_level = stress;
        }
        if let Some(focus) = partial.focus_level {
            self.focus_level = focus;
        }
        if let Some(motivation) = partial.motivation_level {
            self.motivation_level = motivation;
        }
        *self != before
    }

    pub fn merged(&self, partial: &PartialState) -> Self {
        let mut next = *self;
        next.apply(partial);
        next
    }

    /// Compact one-line summary for logs and the demo CLI.
    pub fn describe(&self) -> String {
        format!(
            "mood={} stress={} focus={} motivation={}",
            self.mood, self.stress_level, self.focus_level, self.motivation_level
        )
    }
}

// =============================================================================
// PartialState
// =============================================================================

/// A sparse update to [`PsychologicalState`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialState {
    pub mood: Option<Mood>,
    pub stress_level: Option<Level>,
    pub focus_level: Option<Level>,
    pub motivation_level: Option<Level>,
}

impl PartialState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn stress(mut self, level: Level) -> Self {
        self.stress_level = Some(level);
        self
    }

    pub fn focus(mut self, level: Level) -> Self {
        self.focus_level = Some(level);
        self
    }

    pub fn motivation(mut self, level: Level) -> Self {
        self.motivation_level = Some(level);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mood.is_none()
            && self.stress_level.is_none()
            && self.focus_level.is_none()
            && self.motivation_level.is_none()
    }

    /// Parse whitespace-separated `key=value` pairs, e.g.
    /// `"mood=happy stress=high"`. Keys: mood, stress, focus, motivation.
    pub fn parse_assignments(input: &str) -> Result<Self> {
        let mut partial = PartialState::new();
        for token in input.split_whitespace() {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| KudosError::MalformedAssignment(token.to_string()))?;
            match key.trim().to_ascii_lowercase().as_str() {
                "mood" => partial.mood = Some(value.parse()?),
                "stress" | "stress_level" => partial.stress_level = Some(value.parse()?),
                "focus" | "focus_level" => partial.focus_level = Some(value.parse()?),
                "motivation" | "motivation_level" => {
                    partial.motivation_level = Some(value.parse()?)
                }
                _ => return Err(KudosError::unknown("state field", key)),
            }
        }
        Ok(partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let s = PsychologicalState::default();
        assert_eq!(s.mood, Mood::Neutral);
        assert_eq!(s.stress_level, Level::Low);
        assert_eq!(s.focus_level, Level::Low);
        assert_eq!(s.motivation_level, Level::Medium);
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let mut s = PsychologicalState::default();
        let changed = s.apply(&PartialState::new().stress(Level::High));
        assert!(changed);
        assert_eq!(s.stress_level, Level::High);
        assert_eq!(s.mood, Mood::Neutral);
        assert_eq!(s.motivation_level, Level::Medium);
    }

    #[test]
    fn test_apply_reports_no_change() {
        let mut s = PsychologicalState::default();
        assert!(!s.apply(&PartialState::new().mood(Mood::Neutral)));
        assert!(!s.apply(&PartialState::new()));
    }

    #[test]
    fn test_mood_parse_roundtrip() {
        for mood in Mood::ALL {
            assert_eq!(mood.as_str().parse::<Mood>().unwrap(), mood);
        }
        assert_eq!(" HAPPY ".parse::<Mood>().unwrap(), Mood::Happy);
        assert!("melancholic".parse::<Mood>().is_err());
    }

    #[test]
    fn test_level_raised_saturates() {
        assert_eq!(Level::Low.raised(), Level::Medium);
        assert_eq!(Level::Medium.raised(), Level::High);
        assert_eq!(Level::High.raised(), Level::High);
    }

    #[test]
    fn test_parse_assignments() {
        let p = PartialState::parse_assignments("mood=happy stress=high").unwrap();
        assert_eq!(p.mood, Some(Mood::Happy));
        assert_eq!(p.stress_level, Some(Level::High));
        assert!(p.focus_level.is_none());

        assert!(PartialState::parse_assignments("").unwrap().is_empty());
        assert!(matches!(
            PartialState::parse_assignments("mood"),
            Err(KudosError::MalformedAssignment(_))
        ));
        assert!(PartialState::parse_assignments("color=blue").is_err());
        assert!(PartialState::parse_assignments("stress=extreme").is_err());
    }

    #[test]
    fn test_describe_mentions_every_field() {
        let desc = PsychologicalState::default().describe();
        assert!(desc.contains("mood=neutral"));
        assert!(desc.contains("stress=low"));
        assert!(desc.contains("motivation=medium"));
    }

    #[test]
    fn test_state_json_roundtrip() {
        let s = PsychologicalState::default().merged(&PartialState::new().mood(Mood::Excited));
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"excited\""));
        let restored: PsychologicalState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, s);
    }
}
