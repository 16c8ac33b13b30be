//! REPL command parsing and execution.

use anyhow::{bail, Context, Result};
use chrono::Local;
use kudos_core::{EventKind, FeedbackEvent, PartialState};
use kudos_expression::{EffectId, FeedbackEngine, MilestoneKind, PopupOutcome, StudyAction};
use kudos_limbic::{ActivityKind, ActivityMonitor};

pub const HELP: &str = "\
Commands:
  event <kind> [message]       feed a product event (e.g. goal_reached)
  merge key=value ...          update state (mood, stress, focus, motivation)
  unlock <achievement_id>      unlock an achievement
  study <success|error|streak> study companion feedback
  activity <kind> [minutes]    record study/social/contribution/idle activity
  check                        run activity inference and merge the result
  boost [reason]               boost motivation
  calm                         activate calm mode
  celebrate <levelup|badge|milestone> <title>
  list                         active effects
  dismiss <fx-id>              remove an effect
  state                        current psychological state
  popup                        mood popup (throttled)
  stats                        registry counters and points
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(FeedbackEvent),
    Merge(PartialState),
    Unlock(String),
    Study(StudyAction),
    Activity(ActivityKind, u32),
    Check,
    Boost(String),
    Calm,
    Celebrate(MilestoneKind, String),
    List,
    Dismiss(EffectId),
    State,
    Popup,
    Stats,
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "event" => {
                let (kind, message) = match rest.split_once(char::is_whitespace) {
                    Some((kind, message)) => (kind, Some(message.trim())),
                    None => (rest, None),
                };
                if kind.is_empty() {
                    bail!("usage: event <kind> [message]");
                }
                let mut event = FeedbackEvent::new(EventKind::parse(kind));
                if let Some(message) = message.filter(|m| !m.is_empty()) {
                    event = event.with_message(message);
                }
                Command::Event(event)
            }
            "merge" => Command::Merge(PartialState::parse_assignments(rest)?),
            "unlock" => {
                if rest.is_empty() {
                    bail!("usage: unlock <achievement_id>");
                }
                Command::Unlock(rest.to_string())
            }
            "study" => Command::Study(rest.parse()?),
            "activity" => {
                let mut parts = rest.split_whitespace();
                let kind = match parts.next().map(str::to_ascii_lowercase).as_deref() {
                    Some("study") => ActivityKind::Study,
                    Some("social") => ActivityKind::Social,
                    Some("contribution") => ActivityKind::Contribution,
                    Some("idle") => ActivityKind::Idle,
                    _ => bail!("usage: activity <study|social|contribution|idle> [minutes]"),
                };
                let minutes = match parts.next() {
                    Some(m) => m.parse().with_context(|| format!("invalid minutes: {}", m))?,
                    None => 0,
                };
                Command::Activity(kind, minutes)
            }
            "check" => Command::Check,
            "boost" => Command::Boost(if rest.is_empty() {
                "Keep it up!".to_string()
            } else {
                rest.to_string()
            }),
            "calm" => Command::Calm,
            "celebrate" => {
                let (kind, title) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let kind = match kind.to_ascii_lowercase().as_str() {
                    "levelup" | "level_up" => MilestoneKind::LevelUp,
                    "badge" => MilestoneKind::Badge,
                    "milestone" => MilestoneKind::Milestone,
                    _ => bail!("usage: celebrate <levelup|badge|milestone> <title>"),
                };
                let title = title.trim();
                Command::Celebrate(kind, if title.is_empty() { "Milestone".into() } else { title.into() })
            }
            "list" | "ls" => Command::List,
            "dismiss" => Command::Dismiss(rest.parse()?),
            "state" => Command::State,
            "popup" => Command::Popup,
            "stats" => Command::Stats,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command {:?} (try 'help')", other),
        };
        Ok(Some(command))
    }
}

/// Session context the REPL keeps next to the engine.
pub struct Session {
    pub engine: std::sync::Arc<FeedbackEngine>,
    pub monitor: ActivityMonitor,
}

impl Session {
    /// Runs one command and returns what to print.
    pub fn execute(&mut self, command: Command) -> Result<String> {
        let engine = &self.engine;
        let out = match command {
            Command::Event(event) => {
                let outcome = engine.handle_event(event);
                format!(
                    "{} -> {} {} ({}){}",
                    outcome.category.map_or("generic", |c| c.as_str()),
                    outcome.effect,
                    outcome.descriptor.family,
                    outcome.descriptor.intensity,
                    if outcome.toasted { " +toast" } else { "" }
                )
            }
            Command::Merge(partial) => {
                engine.store().merge(partial);
                engine.store().get().describe()
            }
            Command::Unlock(id) => {
                let outcome = engine.unlock_achievement(&id);
                if outcome.was_newly_unlocked {
                    format!("unlocked {} (+{} points)", id, outcome.points_awarded)
                } else {
                    format!("{} not newly unlocked", id)
                }
            }
            Command::Study(action) => match engine.study_action(action) {
                Some(id) => format!("companion: {}", id),
                None => "companion: (quiet)".to_string(),
            },
            Command::Activity(kind, minutes) => {
                match self.monitor.record(kind, minutes, Local::now()) {
                    Some(partial) => {
                        engine.store().merge(partial);
                        engine.store().get().describe()
                    }
                    None => format!("recorded {}", kind),
                }
            }
            Command::Check => {
                let now = Local::now();
                engine.store().merge(self.monitor.infer(now));
                let load = self.monitor.session_load(now);
                format!(
                    "{} | load {} | break {}",
                    engine.store().get().describe(),
                    serde_json::to_string(&load)?,
                    if self.monitor.suggest_break(now) { "suggested" } else { "not needed" }
                )
            }
            Command::Boost(reason) => format!("boost: {}", engine.boost_motivation(&reason)),
            Command::Calm => format!("calm: {}", engine.activate_calm_mode()),
            Command::Celebrate(kind, title) => {
                let ids = engine.celebrate_milestone(kind, &title, "Great job on reaching this milestone");
                let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
                format!("sequence: {}", ids.join(", "))
            }
            Command::List => serde_json::to_string_pretty(&engine.registry().list())?,
            Command::Dismiss(id) => {
                if engine.registry().dismiss(id) {
                    format!("dismissed {}", id)
                } else {
                    format!("{} is not live", id)
                }
            }
            Command::State => serde_json::to_string_pretty(&engine.store().get())?,
            Command::Popup => match engine.notify_mood_if_changed() {
                PopupOutcome::Shown { mood, message } => format!("popup ({}): {}", mood, message),
                PopupOutcome::Throttled => "popup: throttled".to_string(),
                PopupOutcome::Failed => "popup: failed".to_string(),
            },
            Command::Stats => format!(
                "{} | points {}",
                serde_json::to_string(&engine.registry().stats())?,
                engine.ledger().total_points()
            ),
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        };
        Ok(out)
    }
}
