use crate::achievement::AchievementCatalog;
use crate::intensity::{deserialize_lenient_intensity, Intensity};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KudosConfig {
    pub settings: FeedbackSettings,
    pub registry: RegistryConfig,
    pub catalog: CatalogConfig,
    pub probes: ProbeConfig,
}

impl KudosConfig {
    /// Parse `path`, then let `KUDOS_*` variables win over the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let mut config: KudosConfig =
            toml::from_str(&raw).with_context(|| format!("{} is not valid config", path.display()))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// A missing file is normal and quiet; a broken one is logged. Either
    /// way the host gets defaults plus env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default().with_env_overrides();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("{:#}, using defaults", e);
            Self::default().with_env_overrides()
        })
    }

    fn with_env_overrides(mut self) -> Self {
        self.apply_env_overrides();
        self
    }

    fn apply_env_overrides(&mut self) {
        let var = |name: &str| std::env::var(name).ok();
        if let Some(enabled) = var("KUDOS_ANIMATIONS").as_deref().and_then(parse_switch) {
            self.settings.animations_enabled = enabled;
        }
        if let Some(level) = var("KUDOS_INTENSITY") {
            self.settings.intensity = Intensity::parse_lenient(&level);
        }
        if let Some(path) = var("KUDOS_CATALOG") {
            self.catalog.path = Some(PathBuf::from(path));
        }
    }

    /// Catalog from `[catalog] path`, or the built-in one. A broken catalog
    /// file is reported and replaced by the built-in catalog.
    pub fn load_catalog(&self) -> AchievementCatalog {
        match &self.catalog.path {
            Some(path) => AchievementCatalog::load(path).unwrap_or_else(|e| {
                tracing::warn!("{}, using built-in achievements", e);
                AchievementCatalog::builtin()
            }),
            None => AchievementCatalog::builtin(),
        }
    }
}

fn parse_switch(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

/// Global presentation settings supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    /// When false every spawn is an inert no-op.
    pub animations_enabled: bool,
    #[serde(deserialize_with = "deserialize_lenient_intensity")]
    pub intensity: Intensity,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            animations_enabled: true,
            intensity: Intensity::Medium,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Lifetime used when a descriptor arrives with a zero duration.
    pub default_duration_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

/// Thresholds for activity-based state detection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Continuous session length that counts as a stress signal.
    pub long_session_mins: i64,
    /// Idle gap that counts as a stress signal.
    pub idle_mins: i64,
    /// Late night window, inclusive on both ends (local hours).
    pub late_night_start: u32,
    pub late_night_end: u32,
    /// Window for counting recent actions when inferring motivation.
    pub activity_window_mins: i64,
    /// Accumulated study/social minutes after which a break is suggested.
    pub session_load_mins: u32,
    pub high_activity_actions: u32,
    pub inactive_mins: i64,
    /// Actions kept for inference.
    pub recent_actions: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            long_session_mins: 60,
            idle_mins: 30,
            late_night_start: 22,
            late_night_end: 6,
            activity_window_mins: 10,
            session_load_mins: 120,
            high_activity_actions: 50,
            inactive_mins: 60,
            recent_actions: 10,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
