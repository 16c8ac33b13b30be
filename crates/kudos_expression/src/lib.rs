//! # Kudos Expression
//!
//! The "acting" half of the engine: turns events and inferred state into
//! on-screen feedback, and keeps that feedback bounded.
//!
//! - [`resolver`]: pure (event, state) -> descriptor mapping
//! - [`AnimationRegistry`]: live effects, timers and renderer snapshots
//! - [`AchievementLedger`]: idempotent unlocks with rarity-scaled celebrations
//! - [`NotificationThrottle`] and [`popup`]: mood popups, at most one per mood change
//! - [`FeedbackEngine`]: the facade hosts talk to

mod companion;
mod engine;
mod ledger;
pub mod popup;
mod registry;
pub mod resolver;
mod sequence;
mod throttle;
mod toast;

pub use companion::{CompanionResponse, StudyAction, StudyCompanion};
pub use engine::{FeedbackEngine, FeedbackOutcome, PopupOutcome};
pub use ledger::{celebration_for, AchievementLedger, UnlockOutcome, UnlockedAchievementRecord};
pub use registry::{
    AnimationRegistry, EffectGuard, EffectId, EffectInstance, EffectPhase, RegistryStats,
    SweepReport,
};
pub use resolver::{derive_category, resolve, FeedbackDescriptor, PsychCategory};
pub use sequence::{CelebrationSequence, MilestoneKind, SequenceStep};
pub use throttle::NotificationThrottle;
pub use toast::{LogToastSurface, Toast, ToastError, ToastSurface, ToastVariant};
