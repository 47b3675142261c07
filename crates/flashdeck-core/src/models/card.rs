use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub difficulty: f64,
    /// Computed by the backend scheduler; never set client-side.
    pub next_review_date: String,
    #[serde(default)]
    pub review_count: u32,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Card {
    pub fn next_review_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.next_review_date)
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at().map(|at| at <= now).unwrap_or(true)
    }

    pub fn tags_display(&self) -> String {
        self.tags.join(", ")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CardCreateRequest {
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CardUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
