//! Endpoint wrappers against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use flashdeck_core::auth::{MemoryTokenStore, SessionManager, SessionStatus, StoredTokens};
use flashdeck_core::models::{
    CardCreateRequest, CardReviewRequest, CompleteSessionRequest, DeckCreateRequest,
    DeckUpdateRequest, LoginRequest, RegisterRequest,
};
use flashdeck_core::validation::ValidationError;
use flashdeck_core::{ApiClient, ApiError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn signed_in() -> StoredTokens {
    StoredTokens {
        access_token: Some("access".into()),
        refresh_token: Some("refresh".into()),
        token_expiry: None,
    }
}

fn client_with(server: &MockServer, stored: StoredTokens) -> ApiClient {
    let session = SessionManager::new(Box::new(MemoryTokenStore::with_tokens(stored))).unwrap();
    ApiClient::with_session(
        &format!("{}/api", server.uri()),
        Duration::from_secs(5),
        Arc::new(session),
    )
    .unwrap()
}

fn deck_json(id: &str, last_studied: Option<&str>, due: u32) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Deck {id}"),
        "description": "",
        "cardCount": 10,
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z",
        "lastStudied": last_studied,
        "dueCardCount": due
    })
}

fn card_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "front": "hola",
        "back": "hello",
        "difficulty": 2.5,
        "nextReviewDate": "2025-05-06T00:00:00Z",
        "reviewCount": 0,
        "createdAt": "2025-05-01T00:00:00Z",
        "updatedAt": "2025-05-01T00:00:00Z"
    })
}

fn session_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "deckId": "d1",
        "deckName": "Spanish",
        "startedAt": "2025-05-06T10:00:00Z",
        "cardsStudied": 0,
        "cardsCorrect": 0,
        "timeSpentSeconds": 0
    })
}

#[tokio::test]
async fn test_login_stores_tokens_without_sending_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "ada", "password": "Secret1!"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "a1",
            "refreshToken": "r1",
            "tokenType": "Bearer",
            "expiresIn": 900
        })))
        .mount(&server)
        .await;

    let client = client_with(&server, StoredTokens::default());
    let tokens = client
        .login(&LoginRequest {
            username: "ada".into(),
            password: "Secret1!".into(),
        })
        .await
        .unwrap();

    assert_eq!(tokens.access_token, "a1");
    assert!(client.is_authenticated());
    assert_eq!(client.session().status(), SessionStatus::Active);

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_failed_login_does_not_enter_refresh_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_with(&server, StoredTokens::default());
    let err = client
        .login(&LoginRequest {
            username: "ada".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized), "{err:?}");
    assert_eq!(client.session().status(), SessionStatus::SignedOut);
}

#[tokio::test]
async fn test_validation_errors_make_no_network_call() {
    let server = MockServer::start().await;
    let client = client_with(&server, signed_in());

    let err = client
        .create_deck(&DeckCreateRequest {
            name: "   ".into(),
            description: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(ValidationError::Required("Deck name"))));

    let err = client
        .signup(&RegisterRequest {
            username: "ada".into(),
            email: "not-an-email".into(),
            password: "Secret1!".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(ValidationError::InvalidEmail)));

    let err = client
        .submit_review("s1", &CardReviewRequest::new("c1", 9, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(ValidationError::ReviewResultOutOfRange(9))));

    let err = client
        .create_card(
            "d1",
            &CardCreateRequest {
                front: "hola".into(),
                back: String::new(),
                notes: None,
                tags: vec![],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Back is required");

    let err = client.dashboard(0).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation(ValidationError::LimitTooSmall("Recent session limit"))
    ));

    for err in [
        client.get_deck(" ").await.map(|_| ()).unwrap_err(),
        client.list_cards("").await.map(|_| ()).unwrap_err(),
        client.get_card("d1", "").await.map(|_| ()).unwrap_err(),
        client.cards_due("").await.map(|_| ()).unwrap_err(),
        client.get_session("").await.map(|_| ()).unwrap_err(),
    ] {
        assert!(matches!(err, ApiError::Validation(ValidationError::Required(_))), "{err:?}");
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_clears_tokens_even_when_backend_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(body_json(json!({"refreshToken": "refresh"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, signed_in());
    client.logout().await.unwrap();

    assert!(!client.is_authenticated());
    assert!(client.session().refresh_token().is_none());
    assert_eq!(client.session().status(), SessionStatus::SignedOut);
}

#[tokio::test]
async fn test_deck_crud() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/decks"))
        .and(header("authorization", "Bearer access"))
        .and(body_json(json!({"name": "Spanish", "description": "Verbs"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(deck_json("d1", None, 0)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/decks/d1"))
        .and(body_json(json!({"description": "Irregular verbs"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(deck_json("d1", None, 0)))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/decks/d1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, signed_in());

    let deck = client
        .create_deck(&DeckCreateRequest {
            name: "Spanish".into(),
            description: "Verbs".into(),
        })
        .await
        .unwrap();
    assert_eq!(deck.id, "d1");

    let update = DeckUpdateRequest {
        description: Some("Irregular verbs".into()),
        ..Default::default()
    };
    client.update_deck("d1", &update).await.unwrap();
    client.delete_deck("d1").await.unwrap();
}

#[tokio::test]
async fn test_path_segments_are_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/decks/a%20b%2Fc/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([card_json("c1")])))
        .mount(&server)
        .await;

    let client = client_with(&server, signed_in());
    let cards = client.list_cards("a b/c").await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].front, "hola");
}

#[tokio::test]
async fn test_study_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/study/start/d1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_json("s1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/study/cards-due/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([card_json("c1"), card_json("c2")])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/study/sessions/s1/review"))
        .and(body_json(json!({"card": {"id": "c1"}, "result": 4, "timeSpentSeconds": 7})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "r1",
            "cardId": "c1",
            "sessionId": "s1",
            "result": 4,
            "timeSpentSeconds": 7,
            "reviewedAt": "2025-05-06T10:01:00Z",
            "nextReviewDate": "2025-05-10T10:01:00Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/study/sessions/s1/complete"))
        .and(body_json(json!({
            "cardsReviewed": 2,
            "correctResponses": 1,
            "incorrectResponses": 1,
            "totalTimeSeconds": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s1",
            "deckId": "d1",
            "deckName": "Spanish",
            "startedAt": "2025-05-06T10:00:00Z",
            "completedAt": "2025-05-06T10:02:00Z",
            "cardsStudied": 2,
            "cardsCorrect": 1,
            "timeSpentSeconds": 20
        })))
        .mount(&server)
        .await;

    let client = client_with(&server, signed_in());

    let session = client.start_session("d1").await.unwrap();
    let due = client.cards_due("d1").await.unwrap();
    assert_eq!(due.len(), 2);

    let review = client
        .submit_review(&session.id, &CardReviewRequest::new("c1", 4, 7))
        .await
        .unwrap();
    assert_eq!(review.next_review_date.as_deref(), Some("2025-05-10T10:01:00Z"));

    let completed = client
        .complete_session(
            &session.id,
            &CompleteSessionRequest {
                cards_reviewed: 2,
                correct_responses: 1,
                incorrect_responses: 1,
                total_time_seconds: 20,
            },
        )
        .await
        .unwrap();
    assert!(completed.is_completed());
    assert_eq!(completed.accuracy(), 50);
}

#[tokio::test]
async fn test_history_and_statistics_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/study/sessions"))
        .and(query_param("limit", "5"))
        .and(query_param("offset", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([session_json("s1")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/study/statistics"))
        .and(query_param("period", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "period": "week",
            "completedSessions": 4,
            "totalCardsStudied": 80,
            "totalTimeSpentMinutes": 35.0,
            "averageCorrectPercentage": 72.5,
            "currentStreak": 2,
            "longestStreak": 6
        })))
        .mount(&server)
        .await;

    let client = client_with(&server, signed_in());

    let sessions = client.list_sessions(Some(5), Some(10)).await.unwrap();
    assert_eq!(sessions[0].id, "s1");

    let stats = client.statistics(Some("week")).await.unwrap();
    assert_eq!(stats.total_cards_studied, 80);
    assert_eq!(stats.longest_streak, 6);
}

#[tokio::test]
async fn test_dashboard_orders_decks_and_lists_due() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/decks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            deck_json("never", None, 0),
            deck_json("older", Some("2025-03-01T00:00:00Z"), 4),
            deck_json("recent", Some("2025-04-01T00:00:00Z"), 0),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/study/sessions"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([session_json("s9")])))
        .mount(&server)
        .await;

    let client = client_with(&server, signed_in());
    let dashboard = client.dashboard(3).await.unwrap();

    let order: Vec<&str> = dashboard.decks.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(order, vec!["recent", "older", "never"]);
    let due: Vec<&str> = dashboard.due_decks().iter().map(|d| d.id.as_str()).collect();
    assert_eq!(due, vec!["older"]);
    assert_eq!(dashboard.total_due_cards(), 4);
    assert_eq!(dashboard.recent_sessions.len(), 1);
}

#[tokio::test]
async fn test_password_reset_acknowledgement() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password"))
        .and(body_json(json!({"email": "ada@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Reset email sent"})))
        .mount(&server)
        .await;

    let client = client_with(&server, StoredTokens::default());
    let message = client.request_password_reset("ada@example.com").await.unwrap();
    assert_eq!(message.as_deref(), Some("Reset email sent"));
}
