//! Starter habits surfaced before the user has created anything.

use serde::Serialize;

/// A suggested habit: stable id, display label, and the name inserted when
/// the suggestion is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopularHabit {
    pub id: &'static str,
    pub label: &'static str,
    pub value: &'static str,
}

pub const POPULAR_HABITS: &[PopularHabit] = &[
    PopularHabit {
        id: "read",
        label: "📚 Reading",
        value: "Reading",
    },
    PopularHabit {
        id: "workout",
        label: "💪 Morning Exercise",
        value: "Morning Exercise",
    },
    PopularHabit {
        id: "meditate",
        label: "🧘 10 min Meditation",
        value: "10 min Meditation",
    },
    PopularHabit {
        id: "water",
        label: "💧 8 glass of water",
        value: "8 glass of water",
    },
    PopularHabit {
        id: "journal",
        label: "✍️ Writing Journal",
        value: "Writing Journal",
    },
];

/// Look up a suggestion by its stable id.
pub fn find(id: &str) -> Option<&'static PopularHabit> {
    POPULAR_HABITS.iter().find(|h| h.id == id)
}
