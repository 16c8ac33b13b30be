//! Motivational popup copy, keyed by mood.

use kudos_core::Mood;
use rand::seq::SliceRandom;
use rand::Rng;

/// Title shown above the popup message.
pub fn popup_title(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy | Mood::Excited => "You're on a roll!",
        Mood::Energized => "Full of energy!",
        Mood::Stressed => "Take it easy",
        Mood::Sad => "We're here for you",
        Mood::Tired => "Time for a breather?",
        Mood::Calm => "Nice and steady",
        Mood::Focused => "In the zone",
        Mood::Neutral => "Keep it up",
    }
}

pub fn popup_messages(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy | Mood::Excited => &[
            "Keep spreading those positive vibes!",
            "Your energy is contagious!",
            "You're doing amazing!",
        ],
        Mood::Energized => &[
            "Your determination is inspiring!",
            "Keep pushing forward! You're unstoppable",
            "Excellence is a habit. You're building it!",
        ],
        Mood::Calm => &[
            "Stay peaceful and focused",
            "You're in the flow",
            "Inner peace brings clarity",
        ],
        Mood::Stressed => &[
            "You've got this",
            "One step at a time. You're stronger than you think",
            "It's okay to take a break. Self-care matters",
        ],
        Mood::Sad => &[
            "Remember, you're part of a community",
            "Reach out to your campus friends. They're here for you",
            "You're never alone in this journey",
        ],
        Mood::Focused => &[
            "Deep work mode activated!",
            "Your concentration is impressive!",
            "Flow state achieved! Keep it up!",
        ],
        Mood::Tired => &[
            "A short walk can work wonders",
            "Rest is part of the process",
            "Hydrate, stretch, then come back stronger",
        ],
        Mood::Neutral => &[
            "Ready for your next move?",
            "What will you accomplish today?",
            "Your journey continues!",
        ],
    }
}

/// Pick one message for `mood`.
pub fn pick_message<R: Rng + ?Sized>(mood: Mood, rng: &mut R) -> &'static str {
    popup_messages(mood)
        .choose(rng)
        .copied()
        .unwrap_or("Your journey continues!")
}
