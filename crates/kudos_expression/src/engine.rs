//! Feedback Engine
//!
//! Public face of the feedback system. Owns (or is handed) one state store,
//! one animation registry, one achievement ledger and a toast surface, and
//! wires them together:
//!
//! ```text
//! event -> store.merge(implied) -> resolve(event, state) -> registry.spawn
//!                                                        -> toast (allow-listed kinds)
//! ```
//!
//! Every entry point is synchronous and never fails; degraded paths log and
//! return a plain outcome value.

use crate::companion::{StudyAction, StudyCompanion};
use crate::ledger::{AchievementLedger, UnlockOutcome};
use crate::popup::{pick_message, popup_title};
use crate::registry::{AnimationRegistry, EffectId};
use crate::resolver::{resolve_with_category, FeedbackDescriptor, PsychCategory};
use crate::sequence::{CelebrationSequence, MilestoneKind};
use crate::throttle::NotificationThrottle;
use crate::toast::{Toast, ToastSurface, ToastVariant};
use kudos_core::{
    AchievementCatalog, EffectFamily, EventKind, FeedbackEvent, FeedbackSettings, Icon, Intensity,
    KudosConfig, Level, Mood, PartialState,
};
use kudos_limbic::PsychologicalStateStore;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackOutcome {
    /// `None` when the event kind was not recognized.
    pub category: Option<PsychCategory>,
    pub descriptor: FeedbackDescriptor,
    pub effect: EffectId,
    pub toasted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupOutcome {
    Shown { mood: Mood, message: &'static str },
    /// Same mood as the last popup.
    Throttled,
    /// The surface refused; the mood stays eligible.
    Failed,
}

pub struct FeedbackEngine {
    store: Arc<PsychologicalStateStore>,
    registry: AnimationRegistry,
    ledger: AchievementLedger,
    throttle: Mutex<NotificationThrottle>,
    companion: Mutex<StudyCompanion>,
    toast: Arc<dyn ToastSurface>,
}

impl FeedbackEngine {
    /// Fresh session from config.
    pub fn new(config: &KudosConfig, catalog: AchievementCatalog, toast: Arc<dyn ToastSurface>) -> Self {
        Self::with_parts(
            Arc::new(PsychologicalStateStore::new()),
            AnimationRegistry::new(config.settings, &config.registry),
            Arc::new(catalog),
            toast,
        )
    }

    /// Assemble from explicitly constructed parts (tests, multi-view hosts).
    pub fn with_parts(
        store: Arc<PsychologicalStateStore>,
        registry: AnimationRegistry,
        catalog: Arc<AchievementCatalog>,
        toast: Arc<dyn ToastSurface>,
    ) -> Self {
        Self {
            ledger: AchievementLedger::new(catalog, registry.clone()),
            store,
            registry,
            throttle: Mutex::new(NotificationThrottle::new()),
            companion: Mutex::new(StudyCompanion::new()),
            toast,
        }
    }

    pub fn store(&self) -> &Arc<PsychologicalStateStore> {
        &self.store
    }

    pub fn registry(&self) -> &AnimationRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &AchievementLedger {
        &self.ledger
    }

    /// The event's implied state change is merged before resolving, so a
    /// goal reached while neutral is celebrated as "motivated".
    pub fn handle_event(&self, event: FeedbackEvent) -> FeedbackOutcome {
        if let Some(partial) = event.kind.implied_state() {
            self.store.merge(partial);
        }
        let state = self.store.get();
        let (category, descriptor) = resolve_with_category(&event, &state);
        let effect = self.registry.spawn(descriptor.clone());

        tracing::debug!(
            "Event {} under {} -> {} ({})",
            event.kind,
            state.describe(),
            descriptor.family,
            category.map_or("generic", |c| c.as_str())
        );

        let title = match event.kind {
            EventKind::AchievementUnlocked => Some("Achievement Unlocked!"),
            EventKind::GoalReached => Some("Goal Reached!"),
            _ => None,
        };
        let toasted = match title {
            Some(title) => {
                let description = event
                    .message
                    .clone()
                    .or_else(|| descriptor.message.clone())
                    .unwrap_or_default();
                self.show_toast(
                    Toast::new(title, description)
                        .variant(ToastVariant::Success)
                        .duration(Duration::from_millis(4000)),
                )
            }
            None => false,
        };

        FeedbackOutcome {
            category,
            descriptor,
            effect,
            toasted,
        }
    }

    pub fn unlock_achievement(&self, id: &str) -> UnlockOutcome {
        let outcome = self.ledger.unlock(id);
        if !outcome.was_newly_unlocked {
            return outcome;
        }
        if let Some(achievement) = self.ledger.catalog().get(id) {
            self.show_toast(
                Toast::new(
                    "Achievement Unlocked!",
                    format!("{} (+{} points)", achievement.title, achievement.points),
                )
                .variant(ToastVariant::Success),
            );
        }
        self.store
            .merge(PartialState::new().mood(Mood::Happy).motivation(Level::High));
        outcome
    }

    /// Popup for the current mood, unless that mood was already announced.
    pub fn notify_mood_if_changed(&self) -> PopupOutcome {
        let mood = self.store.get().mood;
        let eligible = self
            .throttle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .should_notify(mood);
        if !eligible {
            return PopupOutcome::Throttled;
        }

        let message = pick_message(mood, &mut rand::thread_rng());
        let toast = Toast::new(popup_title(mood), message).duration(Duration::from_millis(5000));
        match self.toast.show(&toast) {
            Ok(()) => {
                self.throttle
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .record_notified(mood);
                PopupOutcome::Shown { mood, message }
            }
            Err(e) => {
                tracing::warn!("Mood popup for {} not shown: {}", mood, e);
                PopupOutcome::Failed
            }
        }
    }

    /// Re-check the popup on every state change until the store goes away
    /// or the task is aborted. Needs a tokio runtime.
    pub fn spawn_mood_notifier(self: &Arc<Self>) -> JoinHandle<()> {
        let mut rx = self.store.subscribe();
        let engine = Arc::downgrade(self);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let Some(engine) = engine.upgrade() else {
                    break;
                };
                engine.notify_mood_if_changed();
            }
            tracing::debug!("Mood notifier stopped");
        })
    }

    pub fn study_action(&self, action: StudyAction) -> Option<EffectId> {
        let state = self.store.get();
        let response = self
            .companion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .observe(action, &state)?;
        self.store.merge(response.merge);
        Some(self.registry.spawn(response.descriptor))
    }

    /// One step more motivated, happy, and a confetti burst carrying `reason`.
    pub fn boost_motivation(&self, reason: &str) -> EffectId {
        let raised = self.store.get().motivation_level.raised();
        self.store
            .merge(PartialState::new().mood(Mood::Happy).motivation(raised));
        self.registry.spawn(
            FeedbackDescriptor::new(EffectFamily::Confetti)
                .with_icon(Icon::Zap)
                .with_duration_ms(5000)
                .with_message(reason),
        )
    }

    pub fn activate_calm_mode(&self) -> EffectId {
        self.store
            .merge(PartialState::new().mood(Mood::Calm).stress(Level::Low));
        self.registry.spawn(
            FeedbackDescriptor::new(EffectFamily::SuccessGlow)
                .with_intensity(Intensity::Low)
                .with_icon(Icon::Heart)
                .with_duration_ms(3000)
                .with_message("Take a deep breath. You've got this!"),
        )
    }

    /// Gentle wellness check: a quiet glow, then calm / stress low.
    pub fn handle_stress_detection(&self) -> EffectId {
        let effect = self.registry.spawn(
            FeedbackDescriptor::new(EffectFamily::GentleGlow)
                .with_intensity(Intensity::Low)
                .with_icon(Icon::Heart)
                .with_duration_ms(3000)
                .with_message("Wellness Check\nConsider taking a short break"),
        );
        self.store
            .merge(PartialState::new().mood(Mood::Calm).stress(Level::Low));
        effect
    }

    /// Like `boost_motivation`, but a single low-key text instead of confetti.
    pub fn handle_low_motivation(&self) -> EffectId {
        let raised = self.store.get().motivation_level.raised();
        self.store
            .merge(PartialState::new().mood(Mood::Happy).motivation(raised));
        self.registry.spawn(
            FeedbackDescriptor::new(EffectFamily::MotivationalText)
                .with_intensity(Intensity::Low)
                .with_icon(Icon::Zap)
                .with_duration_ms(3000)
                .with_message("You've Got This!\nRemember, every small step counts!"),
        )
    }

    /// Staggered multi-family celebration for a milestone.
    pub fn celebrate_milestone(&self, kind: MilestoneKind, title: &str, description: &str) -> Vec<EffectId> {
        let effects = CelebrationSequence::milestone(kind, title, description).spawn(&self.registry);
        self.store
            .merge(PartialState::new().mood(Mood::Happy).motivation(Level::High));
        effects
    }

    pub fn settings(&self) -> FeedbackSettings {
        self.registry.settings()
    }

    /// Turning animations off also clears whatever is on screen.
    pub fn apply_settings(&self, settings: FeedbackSettings) {
        self.registry.apply_settings(settings);
        if !settings.animations_enabled {
            self.registry.reset();
        }
    }

    /// Cancel every pending timer. The engine stays usable.
    pub fn shutdown(&self) {
        let stats = self.registry.stats();
        self.registry.reset();
        tracing::info!(
            "Feedback engine shut down (spawned {}, suppressed {}, expired {}, dismissed {})",
            stats.spawned,
            stats.suppressed,
            stats.expired,
            stats.dismissed
        );
    }

    fn show_toast(&self, toast: Toast) -> bool {
        match self.toast.show(&toast) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Toast {:?} not shown: {}", toast.title, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::ToastError;

    #[derive(Default)]
    struct Recorder {
        shown: Mutex<Vec<Toast>>,
    }

    impl ToastSurface for Recorder {
        fn show(&self, toast: &Toast) -> Result<(), ToastError> {
            self.shown.lock().unwrap().push(toast.clone());
            Ok(())
        }
    }

    fn engine() -> (FeedbackEngine, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let engine = FeedbackEngine::new(
            &KudosConfig::default(),
            AchievementCatalog::builtin(),
            recorder.clone(),
        );
        (engine, recorder)
    }

    #[test]
    fn test_goal_reached_celebrates_and_toasts() {
        let (engine, recorder) = engine();
        let outcome = engine.handle_event(FeedbackEvent::new(EventKind::GoalReached));
        assert_eq!(outcome.category, Some(PsychCategory::Motivated));
        assert_eq!(outcome.descriptor.family, EffectFamily::Confetti);
        assert!(outcome.toasted);
        assert_eq!(recorder.shown.lock().unwrap().len(), 1);
        assert_eq!(engine.store().get().motivation_level, Level::High);
    }

    #[test]
    fn test_post_liked_does_not_toast() {
        let (engine, recorder) = engine();
        let outcome = engine.handle_event(FeedbackEvent::new(EventKind::PostLiked));
        assert_eq!(outcome.category, Some(PsychCategory::NeedingEncouragement));
        assert!(!outcome.toasted);
        assert!(recorder.shown.lock().unwrap().is_empty());
    }

    #[test]
    fn test_stress_event_is_gentle() {
        let (engine, _) = engine();
        let outcome = engine.handle_event(FeedbackEvent::new(EventKind::StressDetected));
        assert_eq!(outcome.category, Some(PsychCategory::Stressed));
        assert_eq!(outcome.descriptor.family, EffectFamily::SuccessGlow);
    }

    #[test]
    fn test_unlock_toasts_once() {
        let (engine, recorder) = engine();
        assert!(engine.unlock_achievement("first_post").was_newly_unlocked);
        assert!(!engine.unlock_achievement("first_post").was_newly_unlocked);
        assert_eq!(recorder.shown.lock().unwrap().len(), 1);
        assert_eq!(engine.store().get().mood, Mood::Happy);
    }

    #[test]
    fn test_boost_raises_one_step() {
        let (engine, _) = engine();
        engine.store().merge(PartialState::new().motivation(Level::Low));
        engine.boost_motivation("Nice!");
        assert_eq!(engine.store().get().motivation_level, Level::Medium);
        engine.boost_motivation("Nice!");
        engine.boost_motivation("Nice!");
        assert_eq!(engine.store().get().motivation_level, Level::High);
    }

    #[test]
    fn test_calm_mode() {
        let (engine, _) = engine();
        engine.store().merge(PartialState::new().mood(Mood::Stressed).stress(Level::High));
        let id = engine.activate_calm_mode();
        let s = engine.store().get();
        assert_eq!((s.mood, s.stress_level), (Mood::Calm, Level::Low));
        assert_eq!(engine.registry().get(id).unwrap().family, EffectFamily::SuccessGlow);
    }

    #[test]
    fn test_disabling_animations_clears_screen() {
        let (engine, _) = engine();
        engine.handle_event(FeedbackEvent::new(EventKind::PostLiked));
        assert_eq!(engine.registry().list().len(), 1);
        engine.apply_settings(FeedbackSettings {
            animations_enabled: false,
            intensity: Intensity::Medium,
        });
        assert!(engine.registry().is_empty());
        engine.handle_event(FeedbackEvent::new(EventKind::PostLiked));
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn test_low_motivation_handler() {
        let (engine, recorder) = engine();
        engine.store().merge(PartialState::new().mood(Mood::Sad).motivation(Level::Low));
        let id = engine.handle_low_motivation();

        assert!(recorder.shown.lock().unwrap().is_empty());
        assert_eq!(engine.registry().len(), 1);
        let fx = engine.registry().get(id).unwrap();
        assert_eq!((fx.family, fx.intensity), (EffectFamily::MotivationalText, Intensity::Low));
        assert!(fx.message.unwrap().starts_with("You've Got This!"));

        let s = engine.store().get();
        assert_eq!((s.mood, s.motivation_level), (Mood::Happy, Level::Medium));
    }

    #[test]
    fn test_goal_toast_titled_per_kind() {
        let (engine, recorder) = engine();
        engine.handle_event(FeedbackEvent::new(EventKind::GoalReached));
        engine.handle_event(FeedbackEvent::new(EventKind::AchievementUnlocked));
        let titles: Vec<_> = recorder.shown.lock().unwrap().iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, vec!["Goal Reached!", "Achievement Unlocked!"]);
    }

    #[test]
    fn test_milestone_sequence() {
        let (engine, _) = engine();
        let ids = engine.celebrate_milestone(MilestoneKind::LevelUp, "Level 2", "Onwards");
        assert_eq!(ids.len(), 2);
        assert_eq!(engine.registry().len(), 2);
    }
}
