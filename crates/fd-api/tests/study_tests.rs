use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::common::{self, TestClient, TestStateBuilder};

/// A deck with two cards; returns `(deck_id, [card ids])`
async fn seed_deck(client: &TestClient, token: &str) -> (i64, Vec<i64>) {
    let deck: Value = client
        .post_json("/decks", &json!({ "title": "Verbs" }), Some(token))
        .await
        .json();
    let deck_id = deck["id"].as_i64().unwrap();

    let body: Value = client
        .post_json(
            &format!("/decks/{deck_id}/cards/batch"),
            &json!({ "cards": [{ "front": "ser", "back": "to be" }, { "front": "ir", "back": "to go" }] }),
            Some(token),
        )
        .await
        .json();
    let cards = body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();

    (deck_id, cards)
}

#[tokio::test]
async fn test_record_answers_and_read_stats() {
    let Some(state) = TestStateBuilder::new().build().await else {
        return;
    };
    let pool = state.pool.clone();
    let client = TestClient::new(state);
    let user = common::new_user();
    let token = common::free_token(&user);
    let (deck_id, cards) = seed_deck(&client, &token).await;

    // Ids may arrive as strings
    let response = client
        .post_json(
            "/study-sessions",
            &json!({ "deck_id": deck_id.to_string(), "card_id": cards[0], "correct": true, "response_time": 1200 }),
            Some(&token),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    let recorded: Value = response.json();
    assert_eq!(recorded["correct"], true);
    assert_eq!(recorded["response_time"], 1200);

    client
        .post_json(
            "/study-sessions",
            &json!({ "deck_id": deck_id, "card_id": cards[1], "correct": false, "response_time": 800 }),
            Some(&token),
        )
        .await
        .assert_status(StatusCode::CREATED);
    client
        .post_json(
            "/study-sessions",
            &json!({ "deck_id": deck_id, "card_id": cards[1], "correct": true }),
            Some(&token),
        )
        .await
        .assert_status(StatusCode::CREATED);

    let stats: Value = client.get("/study-stats", Some(&token)).await.json();
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["correct"], 2);
    assert_eq!(stats["incorrect"], 1);
    assert_eq!(stats["average_response_time_ms"], 1000.0);

    let scoped: Value = client
        .get(&format!("/study-stats?deck_id={deck_id}"), Some(&token))
        .await
        .json();
    assert_eq!(scoped["total"], 3);

    let recent: Vec<Value> = client
        .get("/study-sessions/recent?limit=2", Some(&token))
        .await
        .json();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["deck_title"], "Verbs");

    let history: Vec<Value> = client
        .get(&format!("/decks/{deck_id}/study-sessions"), Some(&token))
        .await
        .json();
    assert_eq!(history.len(), 3);

    let dashboard: Value = client.get("/dashboard", Some(&token)).await.json();
    assert_eq!(dashboard["studied_cards"], 3);

    common::db::cleanup_user(&pool, &user).await.unwrap();
}

#[tokio::test]
async fn test_answers_for_foreign_or_mismatched_cards_are_rejected() {
    let Some(state) = TestStateBuilder::new().build().await else {
        return;
    };
    let pool = state.pool.clone();
    let client = TestClient::new(state);
    let owner = common::new_user();
    let intruder = common::new_user();
    let owner_token = common::free_token(&owner);
    let intruder_token = common::free_token(&intruder);
    let (deck_id, cards) = seed_deck(&client, &owner_token).await;
    let (other_deck, _) = seed_deck(&client, &owner_token).await;

    client
        .post_json(
            "/study-sessions",
            &json!({ "deck_id": deck_id, "card_id": cards[0], "correct": true }),
            Some(&intruder_token),
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Card exists but belongs to a different deck
    client
        .post_json(
            "/study-sessions",
            &json!({ "deck_id": other_deck, "card_id": cards[0], "correct": true }),
            Some(&owner_token),
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);

    client
        .get(&format!("/decks/{deck_id}/study-sessions"), Some(&intruder_token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Scoped stats only for decks the caller owns
    let response = client
        .get(&format!("/study-stats?deck_id={deck_id}"), Some(&intruder_token))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "not_found");
    client
        .get("/study-stats?deck_id=999999999", Some(&owner_token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    client
        .get(&format!("/study-stats?deck_id={deck_id}"), Some(&owner_token))
        .await
        .assert_status(StatusCode::OK);

    let stats: Value = client.get("/study-stats", Some(&owner_token)).await.json();
    assert_eq!(stats["total"], 0);
    assert_eq!(stats["average_response_time_ms"], Value::Null);

    common::db::cleanup_user(&pool, &owner).await.unwrap();
}

#[tokio::test]
async fn test_recent_limit_is_bounded() {
    let Some(state) = TestStateBuilder::new().build().await else {
        return;
    };
    let client = TestClient::new(state);
    let token = common::free_token(&common::new_user());

    client
        .get("/study-sessions/recent?limit=0", Some(&token))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    client
        .get("/study-sessions/recent?limit=101", Some(&token))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    client
        .get("/study-sessions/recent", Some(&token))
        .await
        .assert_status(StatusCode::OK);
}
