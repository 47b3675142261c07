//! Deck endpoints and the dashboard summary built from them.

use super::{ApiClient, ApiError, ApiRequest};
use crate::models::{Dashboard, Deck, DeckCreateRequest, DeckUpdateRequest};
use crate::validation::{require, validate_limit};

impl ApiClient {
    pub async fn list_decks(&self) -> Result<Vec<Deck>, ApiError> {
        self.fetch(ApiRequest::get(&["decks"])).await
    }

    pub async fn get_deck(&self, deck_id: &str) -> Result<Deck, ApiError> {
        require("Deck id", deck_id)?;
        self.fetch(ApiRequest::get(&["decks", deck_id])).await
    }

    pub async fn create_deck(&self, data: &DeckCreateRequest) -> Result<Deck, ApiError> {
        require("Deck name", &data.name)?;

        let request = ApiRequest::post(&["decks"]).json(data)?;
        self.fetch(request).await
    }

    pub async fn update_deck(&self, deck_id: &str, data: &DeckUpdateRequest) -> Result<Deck, ApiError> {
        require("Deck id", deck_id)?;
        if let Some(name) = &data.name {
            require("Deck name", name)?;
        }

        let request = ApiRequest::put(&["decks", deck_id]).json(data)?;
        self.fetch(request).await
    }

    pub async fn delete_deck(&self, deck_id: &str) -> Result<(), ApiError> {
        require("Deck id", deck_id)?;
        self.acknowledge(ApiRequest::delete(&["decks", deck_id])).await?;
        Ok(())
    }

    /// Decks and recent sessions, fetched concurrently.
    pub async fn dashboard(&self, recent_limit: u32) -> Result<Dashboard, ApiError> {
        validate_limit("Recent session limit", recent_limit)?;

        let (decks, sessions) =
            futures::try_join!(self.list_decks(), self.list_sessions(Some(recent_limit), None))?;
        Ok(Dashboard::new(decks, sessions))
    }
}
