use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub card_count: u32,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_studied: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_card_count: Option<u32>,
}

impl Deck {
    pub fn has_due_cards(&self) -> bool {
        self.due_card_count.unwrap_or(0) > 0
    }

    pub fn last_studied_at(&self) -> Option<DateTime<Utc>> {
        self.last_studied.as_deref().and_then(parse_timestamp)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn display_card_count(&self) -> String {
        match self.card_count {
            1 => "1 card".to_string(),
            n => format!("{} cards", n),
        }
    }

    /// Most recently studied first. Never-studied decks come after every
    /// studied one, newest created first among themselves.
    pub fn cmp_recent_study(a: &Deck, b: &Deck) -> Ordering {
        match (a.last_studied_at(), b.last_studied_at()) {
            (Some(a_studied), Some(b_studied)) => b_studied.cmp(&a_studied),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.created_at().cmp(&a.created_at()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeckCreateRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeckUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
