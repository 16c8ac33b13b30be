//! Animation Registry
//!
//! Owns every on-screen effect and its lifetime. Each entry moves through
//! `Pending -> Active -> Expired | Dismissed`, and is removed exactly once.
//!
//! ## Timers
//!
//! Every live entry gets one tokio task that sleeps through the pending
//! delay and the lifetime. The task holds only a `Weak` to the registry and
//! re-checks existence and phase under the lock before each transition, so
//! an entry dismissed while its timer was waking is left alone. Timers are
//! aborted on dismiss, on [`EffectGuard`] drop, on `reset()` and when the
//! last registry handle goes away.
//!
//! Hosts without a runtime get no timers; they call [`AnimationRegistry::sweep`]
//! from their own frame loop, which applies the same guarded transitions.

use crate::resolver::FeedbackDescriptor;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use kudos_core::{scale, scale_duration, EffectFamily, FeedbackSettings, Icon, Intensity, KudosError, Position, RegistryConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Monotonic, never reused within a registry. Ordering == spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(u64);

impl EffectId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fx-{}", self.0)
    }
}

impl FromStr for EffectId {
    type Err = KudosError;

    /// Accepts `fx-7` or a bare `7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("fx-").unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(EffectId)
            .map_err(|_| KudosError::UnknownValue {
                kind: "effect id",
                value: s.to_string(),
            })
    }
}

/// A live effect as renderers see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    pub id: EffectId,
    pub family: EffectFamily,
    pub message: Option<String>,
    pub icon: Icon,
    /// Already scaled by the global intensity; always > 0.
    pub duration_ms: u64,
    pub intensity: Intensity,
    pub position: Option<Position>,
    pub created_at: DateTime<Utc>,
    /// Particles / balloons / bursts to draw.
    pub element_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectPhase {
    Pending,
    Active,
    Expired,
    Dismissed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub spawned: u64,
    /// Spawns swallowed because animations were disabled.
    pub suppressed: u64,
    pub expired: u64,
    pub dismissed: u64,
}

/// Transitions applied by one [`AnimationRegistry::sweep`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub activated: Vec<EffectId>,
    pub expired: Vec<EffectId>,
}

struct Slot {
    instance: EffectInstance,
    phase: EffectPhase,
    starts_at: Instant,
    lifetime: Duration,
    expires_at: Option<Instant>,
    timer: Option<JoinHandle<()>>,
}

impl Slot {
    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct Shared {
    slots: Mutex<BTreeMap<EffectId, Slot>>,
    next_id: AtomicU64,
    settings: ArcSwap<FeedbackSettings>,
    default_duration: Duration,
    snapshot_tx: watch::Sender<Vec<EffectInstance>>,
    spawned: AtomicU64,
    suppressed: AtomicU64,
    expired: AtomicU64,
    dismissed: AtomicU64,
}

impl Shared {
    fn slots(&self) -> MutexGuard<'_, BTreeMap<EffectId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn allocate_id(&self) -> EffectId {
        EffectId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Renderers only see Active entries. No-op when nothing visible changed.
    fn publish(&self, slots: &BTreeMap<EffectId, Slot>) {
        let next: Vec<EffectInstance> = slots
            .values()
            .filter(|s| s.phase == EffectPhase::Active)
            .map(|s| s.instance.clone())
            .collect();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn insert(self: &Arc<Self>, descriptor: FeedbackDescriptor, delay: Duration) -> EffectId {
        let id = self.allocate_id();
        let settings = **self.settings.load();
        if !settings.animations_enabled {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Animations disabled, {} ({}) suppressed", id, descriptor.family);
            return id;
        }

        let base = if descriptor.duration_ms == 0 {
            self.default_duration
        } else {
            Duration::from_millis(descriptor.duration_ms)
        };
        let lifetime = scale_duration(base, settings.intensity);
        let element_count = scale(
            scale(descriptor.family.base_count(), descriptor.intensity),
            settings.intensity,
        );

        let instance = EffectInstance {
            id,
            family: descriptor.family,
            message: descriptor.message,
            icon: descriptor.icon,
            duration_ms: u64::try_from(lifetime.as_millis()).unwrap_or(u64::MAX),
            intensity: descriptor.intensity,
            position: descriptor.position,
            created_at: Utc::now(),
            element_count,
        };

        let now = Instant::now();
        let pending = !delay.is_zero();
        let mut slots = self.slots();
        slots.insert(
            id,
            Slot {
                instance,
                phase: if pending {
                    EffectPhase::Pending
                } else {
                    EffectPhase::Active
                },
                starts_at: now + delay,
                lifetime,
                expires_at: (!pending).then(|| now + lifetime),
                timer: self.arm(id, delay, lifetime),
            },
        );
        self.spawned.fetch_add(1, Ordering::Relaxed);
        if !pending {
            self.publish(&slots);
        }
        drop(slots);

        tracing::debug!(
            "Spawned {} ({}, {} elements, {:?}, delay {:?})",
            id,
            descriptor.family,
            element_count,
            lifetime,
            delay
        );
        id
    }

    /// `None` outside a runtime; such hosts drive transitions with `sweep`.
    fn arm(self: &Arc<Self>, id: EffectId, delay: Duration, lifetime: Duration) -> Option<JoinHandle<()>> {
        let handle = Handle::try_current().ok()?;
        let weak = Arc::downgrade(self);
        Some(handle.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                if !shared.activate(id, Instant::now()) {
                    // A sweep got there first; keep its deadline.
                    let Some(deadline) = shared.deadline(id) else {
                        return;
                    };
                    drop(shared);
                    tokio::time::sleep_until(deadline).await;
                    if let Some(shared) = weak.upgrade() {
                        shared.expire(id, None, true);
                    }
                    return;
                }
            }
            tokio::time::sleep(lifetime).await;
            if let Some(shared) = weak.upgrade() {
                tracing::trace!("Timer fired for {}", id);
                shared.expire(id, None, true);
            }
        }))
    }

    /// Pending -> Active. False if the entry is gone or already active.
    fn activate(&self, id: EffectId, now: Instant) -> bool {
        let mut slots = self.slots();
        let Some(slot) = slots.get_mut(&id) else {
            return false;
        };
        if slot.phase != EffectPhase::Pending {
            return false;
        }
        slot.phase = EffectPhase::Active;
        slot.expires_at = Some(now + slot.lifetime);
        self.publish(&slots);
        tracing::debug!("{} is now active", id);
        true
    }

    /// Expiry instant of an active entry.
    fn deadline(&self, id: EffectId) -> Option<Instant> {
        self.slots()
            .get(&id)
            .filter(|s| s.phase == EffectPhase::Active)
            .and_then(|s| s.expires_at)
    }

    /// Active -> Expired. With `now`, only if the deadline has passed.
    /// Calls from outside the timer task abort it.
    fn expire(&self, id: EffectId, now: Option<Instant>, from_timer: bool) -> bool {
        let mut slots = self.slots();
        let due = match slots.get(&id) {
            Some(slot) if slot.phase == EffectPhase::Active => match (now, slot.expires_at) {
                (None, _) => true,
                (Some(now), Some(deadline)) => deadline <= now,
                (Some(_), None) => false,
            },
            _ => false,
        };
        if !due {
            return false;
        }
        if let Some(mut slot) = slots.remove(&id) {
            if from_timer {
                slot.timer.take();
            } else {
                slot.abort_timer();
            }
        }
        self.expired.fetch_add(1, Ordering::Relaxed);
        self.publish(&slots);
        tracing::debug!("{} {:?}", id, EffectPhase::Expired);
        true
    }

    fn dismiss(&self, id: EffectId) -> bool {
        let mut slots = self.slots();
        let Some(mut slot) = slots.remove(&id) else {
            return false;
        };
        slot.abort_timer();
        self.dismissed.fetch_add(1, Ordering::Relaxed);
        self.publish(&slots);
        tracing::debug!("{} {:?}", id, EffectPhase::Dismissed);
        true
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let slots = self.slots.get_mut().unwrap_or_else(PoisonError::into_inner);
        for slot in slots.values_mut() {
            slot.abort_timer();
        }
    }
}

/// Cloneable handle; all clones share one set of entries.
#[derive(Clone)]
pub struct AnimationRegistry {
    shared: Arc<Shared>,
}

impl AnimationRegistry {
    pub fn new(settings: FeedbackSettings, config: &RegistryConfig) -> Self {
        let (snapshot_tx, _rx) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                slots: Mutex::new(BTreeMap::new()),
                next_id: AtomicU64::new(1),
                settings: ArcSwap::from_pointee(settings),
                default_duration: Duration::from_millis(config.default_duration_ms.max(1)),
                snapshot_tx,
                spawned: AtomicU64::new(0),
                suppressed: AtomicU64::new(0),
                expired: AtomicU64::new(0),
                dismissed: AtomicU64::new(0),
            }),
        }
    }

    /// Show `descriptor` now. Never blocks and never fails.
    pub fn spawn(&self, descriptor: FeedbackDescriptor) -> EffectId {
        self.shared.insert(descriptor, Duration::ZERO)
    }

    /// Keep the entry invisible for `delay`, then start its lifetime.
    pub fn spawn_after(&self, descriptor: FeedbackDescriptor, delay: Duration) -> EffectId {
        self.shared.insert(descriptor, delay)
    }

    /// Spawn an effect owned by the returned guard; dropping the guard
    /// dismisses it.
    pub fn spawn_scoped(&self, descriptor: FeedbackDescriptor) -> EffectGuard {
        let id = self.spawn(descriptor);
        EffectGuard {
            id,
            registry: Arc::downgrade(&self.shared),
            armed: true,
        }
    }

    /// Remove a pending or active entry. False if it already expired, was
    /// dismissed, or never existed.
    pub fn dismiss(&self, id: EffectId) -> bool {
        self.shared.dismiss(id)
    }

    /// Active entries in spawn order.
    pub fn list(&self) -> Vec<EffectInstance> {
        self.shared
            .slots()
            .values()
            .filter(|s| s.phase == EffectPhase::Active)
            .map(|s| s.instance.clone())
            .collect()
    }

    pub fn get(&self, id: EffectId) -> Option<EffectInstance> {
        self.shared.slots().get(&id).map(|s| s.instance.clone())
    }

    /// `None` once the entry has been removed.
    pub fn phase(&self, id: EffectId) -> Option<EffectPhase> {
        self.shared.slots().get(&id).map(|s| s.phase)
    }

    /// Live entries, pending included.
    pub fn len(&self) -> usize {
        self.shared.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the active list on every visible change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<EffectInstance>> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Apply every transition due at `now`.
    pub fn sweep(&self, now: Instant) -> SweepReport {
        let mut report = SweepReport::default();
        let live: Vec<(EffectId, EffectPhase, Instant)> = self
            .shared
            .slots()
            .iter()
            .map(|(id, s)| (*id, s.phase, s.starts_at))
            .collect();

        // Each transition re-locks and re-checks; a timer may race us.
        for (id, phase, starts_at) in live {
            if phase == EffectPhase::Pending
                && starts_at <= now
                && self.shared.activate(id, starts_at)
            {
                report.activated.push(id);
            }
            if self.shared.expire(id, Some(now), false) {
                report.expired.push(id);
            }
        }
        report
    }

    /// Abort every timer and drop every entry.
    pub fn reset(&self) {
        let mut slots = self.shared.slots();
        let cleared = slots.len();
        for slot in slots.values_mut() {
            slot.abort_timer();
        }
        slots.clear();
        self.shared.publish(&slots);
        tracing::debug!("Registry reset, {} entries cleared", cleared);
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            spawned: self.shared.spawned.load(Ordering::Relaxed),
            suppressed: self.shared.suppressed.load(Ordering::Relaxed),
            expired: self.shared.expired.load(Ordering::Relaxed),
            dismissed: self.shared.dismissed.load(Ordering::Relaxed),
        }
    }

    /// Timer tasks still running for live entries.
    pub fn active_timers(&self) -> usize {
        self.shared
            .slots()
            .values()
            .filter(|s| s.timer.as_ref().is_some_and(|t| !t.is_finished()))
            .count()
    }

    pub fn settings(&self) -> FeedbackSettings {
        **self.shared.settings.load()
    }

    /// Takes effect for later spawns; live entries keep their parameters.
    pub fn apply_settings(&self, settings: FeedbackSettings) {
        self.shared.settings.store(Arc::new(settings));
        tracing::info!(
            "Feedback settings: animations {}, intensity {}",
            if settings.animations_enabled { "on" } else { "off" },
            settings.intensity
        );
    }
}

impl Default for AnimationRegistry {
    fn default() -> Self {
        Self::new(FeedbackSettings::default(), &RegistryConfig::default())
    }
}

/// Dismisses its effect when dropped, unless detached.
#[must_use = "dropping the guard dismisses the effect immediately"]
pub struct EffectGuard {
    id: EffectId,
    registry: Weak<Shared>,
    armed: bool,
}

impl EffectGuard {
    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Let the effect run out its normal lifetime.
    pub fn detach(mut self) -> EffectId {
        self.armed = false;
        self.id
    }
}

impl Drop for EffectGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(shared) = self.registry.upgrade() {
            shared.dismiss(self.id);
        }
    }
}
