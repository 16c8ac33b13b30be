//! Intensity Policy
//!
//! One global dial (low / medium / high) proportionally scales every
//! effect's element count and duration. Effect families never re-implement
//! the ratio; they call [`scale`] / [`scale_duration`].
//!
//! | intensity | multiplier |
//! |-----------|-----------:|
//! | low       | ×0.5 (floored) |
//! | medium    | ×1.0 |
//! | high      | ×1.5 (floored) |

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    #[default]
    Medium,
    High,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        }
    }

    /// Parse a host-supplied value. Anything unrecognized is medium.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Intensity::Low,
            "medium" => Intensity::Medium,
            "high" => Intensity::High,
            other => {
                tracing::warn!("Unknown intensity {:?}, falling back to medium", other);
                Intensity::Medium
            }
        }
    }

    /// Nominal multiplier, for display only. Scaling itself is integer math.
    pub fn multiplier(&self) -> f32 {
        match self {
            Intensity::Low => 0.5,
            Intensity::Medium => 1.0,
            Intensity::High => 1.5,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `floor(base * multiplier)` without going through floating point.
fn scale_u64(base: u64, intensity: Intensity) -> u64 {
    match intensity {
        Intensity::Low => base / 2,
        Intensity::Medium => base,
        Intensity::High => base.saturating_add(base / 2),
    }
}

/// Scale a particle / burst / icon count.
pub fn scale(base_count: u32, intensity: Intensity) -> u32 {
    scale_u64(base_count as u64, intensity).min(u32::MAX as u64) as u32
}

/// Scale an effect lifetime to whole milliseconds, never below 1ms.
pub fn scale_duration(base: Duration, intensity: Intensity) -> Duration {
    let ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(scale_u64(ms, intensity).max(1))
}

/// Serde helper: unknown intensity strings in config files become medium
/// instead of failing the whole load.
pub fn deserialize_lenient_intensity<'de, D>(deserializer: D) -> Result<Intensity, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(Intensity::parse_lenient(&raw))
}
