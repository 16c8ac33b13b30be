//! Effect families and their presentation-independent parameters.
//!
//! Renderers decide what a "confetti" looks like. The engine only needs to
//! know how many elements a family spawns at medium intensity and how long
//! it lives by default, kept in one lookup table ([`FAMILY_TABLE`]).

use crate::error::{KudosError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectGroup {
    Celebratory,
    Appreciative,
    Fireworks,
    LevelUp,
}

/// Discriminants index [`FAMILY_TABLE`]; keep both in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectFamily {
    // celebratory
    Confetti,
    Balloons,
    Sparkles,
    Ribbons,
    PartyPopper,
    SuccessGlow,
    Spotlight,
    MotivationalText,
    // appreciative
    Hearts,
    ThankYou,
    FloatingStars,
    Applause,
    GentleGlow,
    // fireworks-style
    Fireworks,
    StarBurst,
    RocketTrail,
    // level-up-style
    LevelUp,
    Trophy,
    BadgeReveal,
    XpBurst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilySpec {
    pub family: EffectFamily,
    pub name: &'static str,
    pub group: EffectGroup,
    /// Elements (particles, balloons, bursts, icons) at medium intensity.
    pub base_count: u32,
    pub default_duration_ms: u64,
}

const fn row(
    family: EffectFamily,
    name: &'static str,
    group: EffectGroup,
    base_count: u32,
    default_duration_ms: u64,
) -> FamilySpec {
    FamilySpec {
        family,
        name,
        group,
        base_count,
        default_duration_ms,
    }
}

pub const FAMILY_TABLE: [FamilySpec; 20] = {
    use EffectFamily::*;
    use EffectGroup as G;
    [
        row(Confetti, "confetti", G::Celebratory, 200, 5000),
        row(Balloons, "balloons", G::Celebratory, 15, 6000),
        row(Sparkles, "sparkles", G::Celebratory, 20, 4000),
        row(Ribbons, "ribbons", G::Celebratory, 10, 7000),
        row(PartyPopper, "party_popper", G::Celebratory, 80, 3000),
        row(SuccessGlow, "success_glow", G::Celebratory, 1, 3000),
        row(Spotlight, "spotlight", G::Celebratory, 1, 3000),
        row(MotivationalText, "motivational_text", G::Celebratory, 1, 4000),
        row(Hearts, "hearts", G::Appreciative, 12, 3000),
        row(ThankYou, "thank_you", G::Appreciative, 8, 3500),
        row(FloatingStars, "floating_stars", G::Appreciative, 16, 4000),
        row(Applause, "applause", G::Appreciative, 6, 3000),
        row(GentleGlow, "gentle_glow", G::Appreciative, 1, 3500),
        row(Fireworks, "fireworks", G::Fireworks, 5, 5000),
        row(StarBurst, "star_burst", G::Fireworks, 30, 2500),
        row(RocketTrail, "rocket_trail", G::Fireworks, 4, 4500),
        row(LevelUp, "level_up", G::LevelUp, 1, 4000),
        row(Trophy, "trophy", G::LevelUp, 1, 4000),
        row(BadgeReveal, "badge_reveal", G::LevelUp, 1, 3500),
        row(XpBurst, "xp_burst", G::LevelUp, 24, 2500),
    ]
};

impl EffectFamily {
    pub const ALL: [EffectFamily; 20] = {
        let mut all = [EffectFamily::Confetti; 20];
        let mut i = 0;
        while i < 20 {
            all[i] = FAMILY_TABLE[i].family;
            i += 1;
        }
        all
    };

    pub fn spec(&self) -> &'static FamilySpec {
        &FAMILY_TABLE[*self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        self.spec().name
    }

    pub fn group(&self) -> EffectGroup {
        self.spec().group
    }

    pub fn base_count(&self) -> u32 {
        self.spec().base_count
    }

    pub fn default_duration_ms(&self) -> u64 {
        self.spec().default_duration_ms
    }
}

impl fmt::Display for EffectFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectFamily {
    type Err = KudosError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        FAMILY_TABLE
            .iter()
            .find(|spec| spec.name == needle)
            .map(|spec| spec.family)
            .ok_or_else(|| KudosError::unknown("effect family", s))
    }
}

// =============================================================================
// Icons & positions
// =============================================================================

/// Icon reference handed to renderers alongside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Trophy,
    Heart,
    Target,
    Sparkles,
    ThumbsUp,
    #[default]
    Star,
    Medal,
    Crown,
    Flame,
    Gift,
    Award,
    Zap,
    CheckCircle,
}

/// Screen anchor in percent of the viewport (0..=100 on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: clamp_percent(x),
            y: clamp_percent(y),
        }
    }

    pub fn center() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

fn clamp_percent(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 100.0)
    } else {
        50.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_discriminants() {
        for (i, spec) in FAMILY_TABLE.iter().enumerate() {
            assert_eq!(spec.family as usize, i, "{} is out of place", spec.name);
        }
    }

    #[test]
    fn test_every_family_has_positive_duration() {
        for family in EffectFamily::ALL {
            assert!(family.default_duration_ms() > 0, "{}", family);
        }
    }

    #[test]
    fn test_group_sizes() {
        let count = |g| EffectFamily::ALL.iter().filter(|f| f.group() == g).count();
        assert_eq!(count(EffectGroup::Celebratory), 8);
        assert_eq!(count(EffectGroup::Appreciative), 5);
        assert_eq!(count(EffectGroup::Fireworks), 3);
        assert_eq!(count(EffectGroup::LevelUp), 4);
    }

    #[test]
    fn test_family_parse() {
        assert_eq!("confetti".parse::<EffectFamily>().unwrap(), EffectFamily::Confetti);
        assert_eq!("success-glow".parse::<EffectFamily>().unwrap(), EffectFamily::SuccessGlow);
        assert!("laser_show".parse::<EffectFamily>().is_err());
    }

    #[test]
    fn test_family_serde_name_matches_table() {
        for family in EffectFamily::ALL {
            let json = serde_json::to_string(&family).unwrap();
            assert_eq!(json, format!("\"{}\"", family.as_str()));
        }
    }

    #[test]
    fn test_position_clamps() {
        let p = Position::new(-10.0, 250.0);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 100.0);

        let nan = Position::new(f32::NAN, f32::INFINITY);
        assert_eq!(nan, Position::center());
    }
}
