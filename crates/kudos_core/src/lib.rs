//! # Kudos Core
//!
//! Shared vocabulary for the motivational feedback engine: the inferred
//! psychological state, the global intensity policy, effect families,
//! product events, the achievement catalog and configuration.
//!
//! Everything here is plain data plus pure functions. Scheduling lives in
//! `kudos_expression`, state ownership in `kudos_limbic`.

pub mod achievement;
pub mod config;
pub mod effect;
pub mod error;
pub mod event;
pub mod intensity;
pub mod state;

pub use achievement::{Achievement, AchievementCatalog, Rarity};
pub use config::{CatalogConfig, FeedbackSettings, KudosConfig, ProbeConfig, RegistryConfig};
pub use effect::{EffectFamily, EffectGroup, FamilySpec, Icon, Position, FAMILY_TABLE};
pub use error::KudosError;
pub use event::{EventKind, FeedbackEvent};
pub use intensity::{scale, scale_duration, Intensity};
pub use state::{Level, Mood, PartialState, PsychologicalState};
