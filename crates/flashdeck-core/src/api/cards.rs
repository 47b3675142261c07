use super::{ApiClient, ApiError, ApiRequest};
use crate::models::{Card, CardCreateRequest, CardUpdateRequest};
use crate::validation::require;

impl ApiClient {
    pub async fn list_cards(&self, deck_id: &str) -> Result<Vec<Card>, ApiError> {
        require("Deck id", deck_id)?;
        self.fetch(ApiRequest::get(&["decks", deck_id, "cards"])).await
    }

    pub async fn get_card(&self, deck_id: &str, card_id: &str) -> Result<Card, ApiError> {
        require("Deck id", deck_id)?;
        require("Card id", card_id)?;
        self.fetch(ApiRequest::get(&["decks", deck_id, "cards", card_id])).await
    }

    pub async fn create_card(&self, deck_id: &str, data: &CardCreateRequest) -> Result<Card, ApiError> {
        require("Deck id", deck_id)?;
        require("Front", &data.front)?;
        require("Back", &data.back)?;

        let request = ApiRequest::post(&["decks", deck_id, "cards"]).json(data)?;
        self.fetch(request).await
    }

    pub async fn update_card(
        &self,
        deck_id: &str,
        card_id: &str,
        data: &CardUpdateRequest,
    ) -> Result<Card, ApiError> {
        require("Deck id", deck_id)?;
        require("Card id", card_id)?;
        if let Some(front) = &data.front {
            require("Front", front)?;
        }
        if let Some(back) = &data.back {
            require("Back", back)?;
        }

        let request = ApiRequest::put(&["decks", deck_id, "cards", card_id]).json(data)?;
        self.fetch(request).await
    }

    pub async fn delete_card(&self, deck_id: &str, card_id: &str) -> Result<(), ApiError> {
        require("Deck id", deck_id)?;
        require("Card id", card_id)?;
        self.acknowledge(ApiRequest::delete(&["decks", deck_id, "cards", card_id]))
            .await?;
        Ok(())
    }
}
