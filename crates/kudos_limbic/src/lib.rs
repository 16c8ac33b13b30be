//! # Kudos Limbic
//!
//! The "feeling" half of the engine: owns the session's inferred
//! psychological state and the probes that guess at it.
//!
//! - [`PsychologicalStateStore`]: the single mutable state, broadcast over
//!   a `watch` channel so resolvers and throttles re-evaluate on change
//! - [`probes::ActivityMonitor`]: activity patterns to state guesses
//!   (long sessions, idle gaps, late nights, action rates)
//!
//! Nothing here outlives the session.

pub mod probes;
mod store;

pub use probes::{ActivityKind, ActivityMonitor, LoadReason, SessionLoad};
pub use store::{MoodChange, PsychologicalStateStore};
