use serde::{Deserialize, Serialize};

use crate::utils::accuracy_percent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub deck_id: String,
    #[serde(default)]
    pub deck_name: String,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub cards_studied: u32,
    #[serde(default)]
    pub cards_correct: u32,
    #[serde(default)]
    pub time_spent_seconds: u64,
}

impl StudySession {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.cards_correct, self.cards_studied)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReview {
    pub id: String,
    pub card_id: String,
    pub session_id: String,
    /// Recall rating, 0-5.
    pub result: u8,
    #[serde(default)]
    pub time_spent_seconds: u64,
    pub reviewed_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReviewRequest {
    pub card: CardRef,
    pub result: u8,
    pub time_spent_seconds: u64,
}

impl CardReviewRequest {
    pub fn new(card_id: impl Into<String>, result: u8, time_spent_seconds: u64) -> Self {
        Self {
            card: CardRef { id: card_id.into() },
            result,
            time_spent_seconds,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSessionRequest {
    pub cards_reviewed: u32,
    pub correct_responses: u32,
    pub incorrect_responses: u32,
    pub total_time_seconds: u64,
}

/// Lowest review result that counts as a correct recall.
pub const CORRECT_RESULT_THRESHOLD: u8 = 3;

/// Running totals for a study session, reported when it completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTally {
    pub reviewed: u32,
    pub correct: u32,
    pub seconds: u64,
}

impl SessionTally {
    pub fn record(&mut self, result: u8, time_spent_seconds: u64) {
        self.reviewed += 1;
        if result >= CORRECT_RESULT_THRESHOLD {
            self.correct += 1;
        }
        self.seconds += time_spent_seconds;
    }

    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.correct, self.reviewed)
    }

    pub fn completion(&self) -> CompleteSessionRequest {
        CompleteSessionRequest {
            cards_reviewed: self.reviewed,
            correct_responses: self.correct,
            incorrect_responses: self.reviewed - self.correct,
            total_time_seconds: self.seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStatistics {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub completed_sessions: u32,
    #[serde(default)]
    pub total_cards_studied: u32,
    #[serde(default)]
    pub total_time_spent_minutes: f64,
    #[serde(default)]
    pub average_correct_percentage: f64,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
}
