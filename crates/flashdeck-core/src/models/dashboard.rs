use serde::{Deserialize, Serialize};

use super::{Deck, StudySession};

/// Home screen data: decks ordered by recent study plus recent activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dashboard {
    pub decks: Vec<Deck>,
    pub recent_sessions: Vec<StudySession>,
}

impl Dashboard {
    pub fn new(mut decks: Vec<Deck>, recent_sessions: Vec<StudySession>) -> Self {
        decks.sort_by(Deck::cmp_recent_study);
        Self {
            decks,
            recent_sessions,
        }
    }

    /// Decks with at least one card waiting for review, in dashboard order.
    pub fn due_decks(&self) -> Vec<&Deck> {
        self.decks.iter().filter(|d| d.has_due_cards()).collect()
    }

    pub fn total_due_cards(&self) -> u32 {
        self.decks.iter().filter_map(|d| d.due_card_count).sum()
    }
}
