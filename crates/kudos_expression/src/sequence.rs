//! Celebration sequences
//!
//! Bigger moments stack several families with staggered starts, so the
//! screen builds up instead of everything appearing on one frame. Each
//! step is an ordinary registry entry spawned with `spawn_after`.

use crate::registry::{AnimationRegistry, EffectId};
use crate::resolver::FeedbackDescriptor;
use kudos_core::{EffectFamily, Icon, Intensity};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStep {
    Confetti,
    Balloons,
    Lights,
    Ribbons,
}

impl SequenceStep {
    fn family(self) -> EffectFamily {
        match self {
            SequenceStep::Confetti => EffectFamily::Confetti,
            SequenceStep::Balloons => EffectFamily::Balloons,
            SequenceStep::Lights => EffectFamily::StarBurst,
            SequenceStep::Ribbons => EffectFamily::Ribbons,
        }
    }

    fn start_delay(self) -> Duration {
        Duration::from_millis(match self {
            SequenceStep::Confetti => 100,
            SequenceStep::Ribbons => 200,
            SequenceStep::Balloons => 300,
            SequenceStep::Lights => 500,
        })
    }

    /// Share of the sequence duration this step stays on screen, in percent.
    fn duration_percent(self) -> u64 {
        match self {
            SequenceStep::Confetti => 80,
            SequenceStep::Balloons => 90,
            SequenceStep::Lights => 70,
            SequenceStep::Ribbons => 85,
        }
    }
}

/// Kind of milestone being celebrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    LevelUp,
    Badge,
    Milestone,
}

impl MilestoneKind {
    pub fn steps(self) -> &'static [SequenceStep] {
        match self {
            MilestoneKind::LevelUp => &[SequenceStep::Confetti, SequenceStep::Balloons],
            MilestoneKind::Badge => &[SequenceStep::Lights],
            MilestoneKind::Milestone => &[
                SequenceStep::Confetti,
                SequenceStep::Balloons,
                SequenceStep::Lights,
                SequenceStep::Ribbons,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CelebrationSequence {
    pub message: String,
    pub duration_ms: u64,
    pub steps: Vec<SequenceStep>,
}

impl CelebrationSequence {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration_ms: 8000,
            steps: vec![
                SequenceStep::Confetti,
                SequenceStep::Balloons,
                SequenceStep::Lights,
            ],
        }
    }

    pub fn milestone(kind: MilestoneKind, title: &str, description: &str) -> Self {
        Self {
            message: format!("{}\n{}", title, description),
            duration_ms: 5000,
            steps: kind.steps().to_vec(),
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_steps(mut self, steps: &[SequenceStep]) -> Self {
        self.steps = steps.to_vec();
        self
    }

    /// Step descriptors paired with their start delays, in step order.
    pub fn plan(&self) -> Vec<(FeedbackDescriptor, Duration)> {
        self.steps
            .iter()
            .map(|step| {
                let descriptor = FeedbackDescriptor::new(step.family())
                    .with_intensity(Intensity::High)
                    .with_icon(Icon::Trophy)
                    .with_duration_ms((self.duration_ms * step.duration_percent() / 100).max(1))
                    .with_message(self.message.clone());
                (descriptor, step.start_delay())
            })
            .collect()
    }

    pub fn spawn(&self, registry: &AnimationRegistry) -> Vec<EffectId> {
        self.plan()
            .into_iter()
            .map(|(descriptor, delay)| registry.spawn_after(descriptor, delay))
            .collect()
    }
}
