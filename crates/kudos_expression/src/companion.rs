//! Study companion: reacts to answer outcomes during a study session.

use crate::resolver::FeedbackDescriptor;
use kudos_core::{EffectFamily, Icon, Intensity, KudosError, Level, Mood, PartialState, PsychologicalState};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyAction {
    Success,
    Error,
    Streak,
}

impl FromStr for StudyAction {
    type Err = KudosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(StudyAction::Success),
            "error" => Ok(StudyAction::Error),
            "streak" => Ok(StudyAction::Streak),
            _ => Err(KudosError::UnknownValue {
                kind: "study action",
                value: s.to_string(),
            }),
        }
    }
}

/// State change plus the effect to show for one study action.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanionResponse {
    pub merge: PartialState,
    pub descriptor: FeedbackDescriptor,
}

#[derive(Debug, Clone)]
pub struct StudyCompanion {
    error_streak: u32,
    threshold: u32,
}

impl StudyCompanion {
    pub fn new() -> Self {
        Self {
            error_streak: 0,
            threshold: 3,
        }
    }

    pub fn error_streak(&self) -> u32 {
        self.error_streak
    }

    /// Errors stay silent until the streak reaches the threshold, then
    /// every further error gets encouragement until a success.
    pub fn observe(&mut self, action: StudyAction, state: &PsychologicalState) -> Option<CompanionResponse> {
        match action {
            StudyAction::Error => {
                self.error_streak = self.error_streak.saturating_add(1);
                if self.error_streak < self.threshold {
                    return None;
                }
                Some(CompanionResponse {
                    merge: PartialState::new().mood(Mood::Sad),
                    descriptor: FeedbackDescriptor::new(EffectFamily::MotivationalText)
                        .with_intensity(Intensity::Low)
                        .with_icon(Icon::Heart)
                        .with_duration_ms(4000)
                        .with_message("Don't worry, mistakes = progress"),
                })
            }
            StudyAction::Success => {
                self.error_streak = 0;
                let motivation = match state.motivation_level {
                    Level::Low => Level::Medium,
                    other => other,
                };
                Some(CompanionResponse {
                    merge: PartialState::new().mood(Mood::Happy).motivation(motivation),
                    descriptor: FeedbackDescriptor::new(EffectFamily::SuccessGlow)
                        .with_icon(Icon::CheckCircle)
                        .with_duration_ms(3000)
                        .with_message("Great job! You're improving fast!"),
                })
            }
            StudyAction::Streak => Some(CompanionResponse {
                merge: PartialState::new().mood(Mood::Excited).motivation(Level::High),
                descriptor: FeedbackDescriptor::new(EffectFamily::Confetti)
                    .with_intensity(Intensity::High)
                    .with_icon(Icon::Flame)
                    .with_duration_ms(5000)
                    .with_message("Proud of your consistency!"),
            }),
        }
    }
}

impl Default for StudyCompanion {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_third_error_encourages() {
        let mut companion = StudyCompanion::new();
        let state = PsychologicalState::default();
        assert!(companion.observe(StudyAction::Error, &state).is_none());
        assert!(companion.observe(StudyAction::Error, &state).is_none());
        let r = companion.observe(StudyAction::Error, &state).unwrap();
        assert_eq!(r.merge.mood, Some(Mood::Sad));
        assert_eq!(r.descriptor.family, EffectFamily::MotivationalText);
        assert_eq!(r.descriptor.duration_ms, 4000);
        // Still encouraging on the fourth.
        assert!(companion.observe(StudyAction::Error, &state).is_some());
    }

    #[test]
    fn test_success_resets_streak_and_lifts_low_motivation() {
        let mut companion = StudyCompanion::new();
        let low = PsychologicalState::default().merged(&PartialState::new().motivation(Level::Low));
        companion.observe(StudyAction::Error, &low);
        companion.observe(StudyAction::Error, &low);
        let r = companion.observe(StudyAction::Success, &low).unwrap();
        assert_eq!(companion.error_streak(), 0);
        assert_eq!(r.merge.motivation_level, Some(Level::Medium));
        assert_eq!(r.descriptor.family, EffectFamily::SuccessGlow);

        let high = PsychologicalState::default().merged(&PartialState::new().motivation(Level::High));
        let r = companion.observe(StudyAction::Success, &high).unwrap();
        assert_eq!(r.merge.motivation_level, Some(Level::High));
        assert!(companion.observe(StudyAction::Error, &high).is_none());
    }

    #[test]
    fn test_streak_celebrates() {
        let mut companion = StudyCompanion::new();
        let r = companion
            .observe(StudyAction::Streak, &PsychologicalState::default())
            .unwrap();
        assert_eq!(r.merge.mood, Some(Mood::Excited));
        assert_eq!(r.merge.motivation_level, Some(Level::High));
        assert_eq!(r.descriptor.family, EffectFamily::Confetti);
        assert_eq!(r.descriptor.intensity, Intensity::High);
    }

    #[test]
    fn test_parse_action() {
        assert_eq!("Success".parse::<StudyAction>().unwrap(), StudyAction::Success);
        assert!("retry".parse::<StudyAction>().is_err());
    }
}
