//! Study session endpoints. Review scheduling happens server-side; these
//! calls only report results and read back what the backend computed.

use super::{ApiClient, ApiError, ApiRequest};
use crate::models::{
    Card, CardReview, CardReviewRequest, CompleteSessionRequest, StudySession, StudyStatistics,
};
use crate::validation::{require, validate_review_result};

impl ApiClient {
    pub async fn start_session(&self, deck_id: &str) -> Result<StudySession, ApiError> {
        require("Deck id", deck_id)?;
        self.fetch(ApiRequest::post(&["study", "start", deck_id])).await
    }

    /// Cards in the deck whose next review date has passed.
    pub async fn cards_due(&self, deck_id: &str) -> Result<Vec<Card>, ApiError> {
        require("Deck id", deck_id)?;
        self.fetch(ApiRequest::get(&["study", "cards-due", deck_id])).await
    }

    pub async fn submit_review(
        &self,
        session_id: &str,
        review: &CardReviewRequest,
    ) -> Result<CardReview, ApiError> {
        require("Session id", session_id)?;
        require("Card id", &review.card.id)?;
        validate_review_result(review.result)?;

        let request = ApiRequest::post(&["study", "sessions", session_id, "review"]).json(review)?;
        self.fetch(request).await
    }

    pub async fn complete_session(
        &self,
        session_id: &str,
        summary: &CompleteSessionRequest,
    ) -> Result<StudySession, ApiError> {
        require("Session id", session_id)?;
        let request = ApiRequest::post(&["study", "sessions", session_id, "complete"]).json(summary)?;
        self.fetch(request).await
    }

    pub async fn list_sessions(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<StudySession>, ApiError> {
        let request = ApiRequest::get(&["study", "sessions"])
            .query_opt("limit", limit)
            .query_opt("offset", offset);
        self.fetch(request).await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<StudySession, ApiError> {
        require("Session id", session_id)?;
        self.fetch(ApiRequest::get(&["study", "sessions", session_id])).await
    }

    /// Aggregate statistics, optionally for a period such as `week` or `month`.
    pub async fn statistics(&self, period: Option<&str>) -> Result<StudyStatistics, ApiError> {
        let request = ApiRequest::get(&["study", "statistics"]).query_opt("period", period);
        self.fetch(request).await
    }
}
