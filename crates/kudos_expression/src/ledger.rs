//! Achievement Ledger
//!
//! Tracks which catalog achievements this session has unlocked. Unlocking
//! is idempotent: only the first unlock of an id awards points and
//! celebrates, repeats report `was_newly_unlocked == false` and spawn
//! nothing.

use crate::registry::{AnimationRegistry, EffectId};
use crate::resolver::FeedbackDescriptor;
use chrono::{DateTime, Utc};
use kudos_core::{Achievement, AchievementCatalog, EffectFamily, Intensity, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievementRecord {
    pub achievement_id: String,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockOutcome {
    pub was_newly_unlocked: bool,
    pub points_awarded: u32,
    /// Celebration entries, empty on repeats.
    pub effects: Vec<EffectId>,
}

/// Celebration for an achievement, scaled by rarity. Epic and legendary
/// unlocks run two families at once.
pub fn celebration_for(achievement: &Achievement) -> Vec<FeedbackDescriptor> {
    let primary = |family, intensity, duration_ms, headline: &str| {
        FeedbackDescriptor::new(family)
            .with_intensity(intensity)
            .with_icon(achievement.icon)
            .with_duration_ms(duration_ms)
            .with_message(format!("{}\n{}", headline, achievement.title))
    };

    match achievement.rarity {
        Rarity::Common => vec![primary(
            EffectFamily::Sparkles,
            Intensity::Low,
            4000,
            "Achievement Unlocked!",
        )],
        Rarity::Rare => vec![primary(
            EffectFamily::Confetti,
            Intensity::Medium,
            5000,
            "Rare Achievement!",
        )],
        Rarity::Epic => vec![
            primary(EffectFamily::Confetti, Intensity::High, 6000, "Epic Achievement!"),
            FeedbackDescriptor::new(EffectFamily::Sparkles)
                .with_icon(achievement.icon)
                .with_duration_ms(5000)
                .with_message(achievement.description.clone()),
        ],
        Rarity::Legendary => vec![
            primary(
                EffectFamily::Confetti,
                Intensity::High,
                7000,
                "Legendary Achievement!",
            ),
            FeedbackDescriptor::new(EffectFamily::Balloons)
                .with_intensity(Intensity::High)
                .with_icon(achievement.icon)
                .with_duration_ms(8000)
                .with_message(achievement.description.clone()),
        ],
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    records: HashMap<String, UnlockedAchievementRecord>,
    order: Vec<String>,
    total_points: u64,
}

pub struct AchievementLedger {
    catalog: Arc<AchievementCatalog>,
    state: Mutex<LedgerState>,
    registry: AnimationRegistry,
}

impl AchievementLedger {
    pub fn new(catalog: Arc<AchievementCatalog>, registry: AnimationRegistry) -> Self {
        Self {
            catalog,
            state: Mutex::new(LedgerState::default()),
            registry,
        }
    }

    pub fn catalog(&self) -> &AchievementCatalog {
        &self.catalog
    }

    pub fn unlock(&self, id: &str) -> UnlockOutcome {
        let Some(achievement) = self.catalog.get(id) else {
            tracing::warn!("Unlock requested for unknown achievement {:?}", id);
            return UnlockOutcome::default();
        };

        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.records.contains_key(id) {
                tracing::debug!("Achievement {} already unlocked", id);
                return UnlockOutcome::default();
            }
            state.records.insert(
                id.to_string(),
                UnlockedAchievementRecord {
                    achievement_id: id.to_string(),
                    unlocked_at: Utc::now(),
                },
            );
            state.order.push(id.to_string());
            state.total_points += u64::from(achievement.points);
        }

        let effects = celebration_for(achievement)
            .into_iter()
            .map(|d| self.registry.spawn(d))
            .collect();

        tracing::info!(
            "Achievement unlocked: {} ({}, +{} points)",
            achievement.title,
            achievement.rarity,
            achievement.points
        );
        UnlockOutcome {
            was_newly_unlocked: true,
            points_awarded: achievement.points,
            effects,
        }
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .contains_key(id)
    }

    pub fn total_points(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total_points
    }

    /// Oldest first.
    pub fn unlocked(&self) -> Vec<UnlockedAchievementRecord> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .order
            .iter()
            .filter_map(|id| state.records.get(id).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kudos_core::Icon;

    fn ledger() -> (AchievementLedger, AnimationRegistry) {
        let registry = AnimationRegistry::default();
        let ledger = AchievementLedger::new(Arc::new(AchievementCatalog::builtin()), registry.clone());
        (ledger, registry)
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let (ledger, registry) = ledger();
        let first = ledger.unlock("first_login");
        assert!(first.was_newly_unlocked);
        assert_eq!(first.points_awarded, 10);
        assert_eq!(first.effects.len(), 1);

        let second = ledger.unlock("first_login");
        assert!(!second.was_newly_unlocked);
        assert_eq!(second.points_awarded, 0);
        assert!(second.effects.is_empty());

        assert_eq!(registry.list().len(), 1);
        assert_eq!(ledger.total_points(), 10);
        assert_eq!(ledger.unlocked().len(), 1);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (ledger, registry) = ledger();
        let outcome = ledger.unlock("moonwalker");
        assert!(!outcome.was_newly_unlocked);
        assert!(!ledger.is_unlocked("moonwalker"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_points_accumulate_in_order() {
        let (ledger, _registry) = ledger();
        ledger.unlock("week_streak");
        ledger.unlock("first_post");
        ledger.unlock("community_leader");
        assert_eq!(ledger.total_points(), 75 + 25 + 200);
        let ids: Vec<_> = ledger.unlocked().into_iter().map(|r| r.achievement_id).collect();
        assert_eq!(ids, vec!["week_streak", "first_post", "community_leader"]);
    }

    #[test]
    fn test_rarity_celebrations() {
        let base = |rarity| Achievement::new("x", "Title", "Desc", rarity, 1, Icon::Medal);

        let common = celebration_for(&base(Rarity::Common));
        assert_eq!(common.len(), 1);
        assert_eq!(common[0].family, EffectFamily::Sparkles);
        assert_eq!(common[0].intensity, Intensity::Low);
        assert_eq!(common[0].duration_ms, 4000);
        assert_eq!(common[0].message.as_deref(), Some("Achievement Unlocked!\nTitle"));

        let rare = celebration_for(&base(Rarity::Rare));
        assert_eq!((rare[0].family, rare[0].intensity, rare[0].duration_ms), (EffectFamily::Confetti, Intensity::Medium, 5000));

        let epic = celebration_for(&base(Rarity::Epic));
        assert_eq!(epic.len(), 2);
        assert_eq!((epic[0].intensity, epic[0].duration_ms), (Intensity::High, 6000));
        assert_eq!((epic[1].family, epic[1].duration_ms), (EffectFamily::Sparkles, 5000));

        let legendary = celebration_for(&base(Rarity::Legendary));
        assert_eq!(legendary.len(), 2);
        assert_eq!(legendary[0].duration_ms, 7000);
        assert_eq!(
            (legendary[1].family, legendary[1].intensity, legendary[1].duration_ms),
            (EffectFamily::Balloons, Intensity::High, 8000)
        );
        assert_eq!(legendary[1].message.as_deref(), Some("Desc"));
    }

    #[test]
    fn test_legendary_spawns_two_concurrent_effects() {
        let (ledger, registry) = ledger();
        let outcome = ledger.unlock("community_leader");
        assert_eq!(outcome.effects.len(), 2);
        let families: Vec<_> = registry.list().into_iter().map(|e| e.family).collect();
        assert_eq!(families, vec![EffectFamily::Confetti, EffectFamily::Balloons]);
    }
}
