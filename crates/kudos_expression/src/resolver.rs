//! Response Resolver
//!
//! Pure mapping from (event, current state) to one feedback descriptor.
//! The state is first reduced to a single derived category by a fixed
//! precedence, then the category picks family, intensity, message and icon
//! from [`category_response`].

use kudos_core::{EffectFamily, FeedbackEvent, Icon, Intensity, Level, Mood, Position, PsychologicalState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dominant inferred state, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsychCategory {
    Stressed,
    Sad,
    Motivated,
    Focused,
    DistractedOrTired,
    NeedingEncouragement,
}

impl PsychCategory {
    pub const ALL: [PsychCategory; 6] = [
        PsychCategory::Stressed,
        PsychCategory::Sad,
        PsychCategory::Motivated,
        PsychCategory::Focused,
        PsychCategory::DistractedOrTired,
        PsychCategory::NeedingEncouragement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PsychCategory::Stressed => "stressed",
            PsychCategory::Sad => "sad",
            PsychCategory::Motivated => "motivated",
            PsychCategory::Focused => "focused",
            PsychCategory::DistractedOrTired => "distracted_or_tired",
            PsychCategory::NeedingEncouragement => "needing_encouragement",
        }
    }
}

impl fmt::Display for PsychCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First match wins. Stress always outranks celebration.
pub fn derive_category(state: &PsychologicalState) -> PsychCategory {
    if state.stress_level == Level::High || state.mood == Mood::Stressed {
        PsychCategory::Stressed
    } else if state.mood == Mood::Sad {
        PsychCategory::Sad
    } else if state.mood.is_upbeat() || state.motivation_level == Level::High {
        PsychCategory::Motivated
    } else if state.focus_level == Level::High || state.mood == Mood::Focused {
        PsychCategory::Focused
    } else if state.mood == Mood::Tired {
        PsychCategory::DistractedOrTired
    } else {
        PsychCategory::NeedingEncouragement
    }
}

/// What to show, before the registry turns it into a live instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackDescriptor {
    pub family: EffectFamily,
    pub intensity: Intensity,
    pub message: Option<String>,
    pub icon: Icon,
    /// Zero means "use the registry default".
    pub duration_ms: u64,
    pub position: Option<Position>,
}

impl FeedbackDescriptor {
    /// Medium intensity, the family's default lifetime, no message.
    pub fn new(family: EffectFamily) -> Self {
        Self {
            family,
            intensity: Intensity::Medium,
            message: None,
            icon: Icon::default(),
            duration_ms: family.default_duration_ms(),
            position: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryResponse {
    pub family: EffectFamily,
    pub intensity: Intensity,
    pub message: &'static str,
    pub icon: Icon,
}

pub fn category_response(category: PsychCategory) -> CategoryResponse {
    let (family, intensity, message, icon) = match category {
        PsychCategory::Motivated => (
            EffectFamily::Confetti,
            Intensity::High,
            "Your determination is inspiring!",
            Icon::Trophy,
        ),
        PsychCategory::Stressed => (
            EffectFamily::SuccessGlow,
            Intensity::Low,
            "Take a breath - you're doing great",
            Icon::Heart,
        ),
        PsychCategory::Sad => (
            EffectFamily::GentleGlow,
            Intensity::Low,
            "One step at a time. You're stronger than you think",
            Icon::Heart,
        ),
        PsychCategory::Focused => (
            EffectFamily::Spotlight,
            Intensity::Low,
            "Great focus!",
            Icon::Target,
        ),
        PsychCategory::DistractedOrTired => (
            EffectFamily::MotivationalText,
            Intensity::Low,
            "Quick break?",
            Icon::Sparkles,
        ),
        PsychCategory::NeedingEncouragement => (
            EffectFamily::Sparkles,
            Intensity::Medium,
            "You've got this!",
            Icon::ThumbsUp,
        ),
    };
    CategoryResponse {
        family,
        intensity,
        message,
        icon,
    }
}

/// Response for event kinds the engine does not recognize.
pub const GENERIC_RESPONSE: CategoryResponse = CategoryResponse {
    family: EffectFamily::Sparkles,
    intensity: Intensity::Low,
    message: "Keep going!",
    icon: Icon::Star,
};

/// Descriptor for `event` under `state`, plus the category it came from
/// (`None` for unrecognized events).
pub fn resolve_with_category(
    event: &FeedbackEvent,
    state: &PsychologicalState,
) -> (Option<PsychCategory>, FeedbackDescriptor) {
    let (category, response) = if event.kind.is_recognized() {
        let category = derive_category(state);
        (Some(category), category_response(category))
    } else {
        tracing::debug!("Unrecognized event {}, using generic feedback", event.kind);
        (None, GENERIC_RESPONSE)
    };

    let descriptor = FeedbackDescriptor {
        family: response.family,
        intensity: response.intensity,
        message: Some(
            event
                .message
                .clone()
                .unwrap_or_else(|| response.message.to_string()),
        ),
        icon: response.icon,
        duration_ms: response.family.default_duration_ms(),
        position: event.position,
    };
    (category, descriptor)
}

pub fn resolve(event: &FeedbackEvent, state: &PsychologicalState) -> FeedbackDescriptor {
    resolve_with_category(event, state).1
}
