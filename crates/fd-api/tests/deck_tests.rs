use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::common::{self, TestClient, TestStateBuilder};

#[tokio::test]
async fn test_deck_crud_flow() {
    let Some(state) = TestStateBuilder::new().build().await else {
        return;
    };
    let pool = state.pool.clone();
    let client = TestClient::new(state);
    let user = common::new_user();
    let token = common::free_token(&user);

    let response = client
        .post_json(
            "/decks",
            &json!({ "title": "Rust basics", "description": "Ownership and borrowing" }),
            Some(&token),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    let deck: Value = response.json();
    let deck_id = deck["id"].as_i64().unwrap();
    assert_eq!(deck["title"], "Rust basics");
    assert_eq!(deck["is_public"], false);
    assert_eq!(deck["user_id"], user.as_str());

    let response = client.get("/decks", Some(&token)).await;
    response.assert_status(StatusCode::OK);
    let decks: Vec<Value> = response.json();
    assert_eq!(decks.len(), 1);

    let response = client.get(&format!("/decks/{deck_id}"), Some(&token)).await;
    response.assert_status(StatusCode::OK);
    let detail: Value = response.json();
    assert_eq!(detail["title"], "Rust basics");
    assert_eq!(detail["cards"], json!([]));

    // Partial update keeps the description
    let response = client
        .patch_json(
            &format!("/decks/{deck_id}"),
            &json!({ "title": "Rust ownership" }),
            Some(&token),
        )
        .await;
    response.assert_status(StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["title"], "Rust ownership");
    assert_eq!(updated["description"], "Ownership and borrowing");

    // The cached detail view must not survive the update
    let detail: Value = client.get(&format!("/decks/{deck_id}"), Some(&token)).await.json();
    assert_eq!(detail["title"], "Rust ownership");

    let response = client.delete(&format!("/decks/{deck_id}"), Some(&token)).await;
    response.assert_status(StatusCode::OK);

    let response = client.get(&format!("/decks/{deck_id}"), Some(&token)).await;
    response.assert_status(StatusCode::NOT_FOUND);

    common::db::cleanup_user(&pool, &user).await.unwrap();
}

#[tokio::test]
async fn test_other_users_deck_is_not_found() {
    let Some(state) = TestStateBuilder::new().build().await else {
        return;
    };
    let pool = state.pool.clone();
    let client = TestClient::new(state);
    let owner = common::new_user();
    let intruder = common::new_user();
    let owner_token = common::free_token(&owner);
    let intruder_token = common::free_token(&intruder);

    let deck: Value = client
        .post_json("/decks", &json!({ "title": "Private" }), Some(&owner_token))
        .await
        .json();
    let uri = format!("/decks/{}", deck["id"]);

    let response = client.get(&uri, Some(&intruder_token)).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "Deck not found or unauthorized");

    client
        .patch_json(&uri, &json!({ "title": "Mine now" }), Some(&intruder_token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    client
        .delete(&uri, Some(&intruder_token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let still_there: Value = client.get(&uri, Some(&owner_token)).await.json();
    assert_eq!(still_there["title"], "Private");

    let intruder_decks: Vec<Value> = client.get("/decks", Some(&intruder_token)).await.json();
    assert!(intruder_decks.is_empty());

    common::db::cleanup_user(&pool, &owner).await.unwrap();
}

#[tokio::test]
async fn test_free_plan_deck_limit() {
    let Some(state) = TestStateBuilder::new().build().await else {
        return;
    };
    let pool = state.pool.clone();
    let client = TestClient::new(state);
    let user = common::new_user();
    let token = common::free_token(&user);

    for title in ["One", "Two", "Three"] {
        client
            .post_json("/decks", &json!({ "title": title }), Some(&token))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = client
        .post_json("/decks", &json!({ "title": "Four" }), Some(&token))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "deck_limit_reached");
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("(3 decks)"));

    let decks: Vec<Value> = client.get("/decks", Some(&token)).await.json();
    assert_eq!(decks.len(), 3);
    assert!(decks.iter().all(|d| d["title"] != "Four"));

    // Same user on the pro plan is not limited
    let pro = common::pro_token(&user);
    client
        .post_json("/decks", &json!({ "title": "Four" }), Some(&pro))
        .await
        .assert_status(StatusCode::CREATED);

    common::db::cleanup_user(&pool, &user).await.unwrap();
}

#[tokio::test]
async fn test_deck_limit_is_configurable() {
    let Some(state) = TestStateBuilder::new().free_deck_limit(1).build().await else {
        return;
    };
    let pool = state.pool.clone();
    let client = TestClient::new(state);
    let user = common::new_user();
    let token = common::free_token(&user);

    client
        .post_json("/decks", &json!({ "title": "Only" }), Some(&token))
        .await
        .assert_status(StatusCode::CREATED);
    let response = client
        .post_json("/decks", &json!({ "title": "Extra" }), Some(&token))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert!(response.json::<Value>()["message"].as_str().unwrap().contains("(1 decks)"));

    common::db::cleanup_user(&pool, &user).await.unwrap();
}

#[tokio::test]
async fn test_dashboard_counts() {
    let Some(state) = TestStateBuilder::new().build().await else {
        return;
    };
    let pool = state.pool.clone();
    let client = TestClient::new(state);
    let user = common::new_user();
    let token = common::free_token(&user);

    let empty: Value = client.get("/dashboard", Some(&token)).await.json();
    assert_eq!(empty["total_decks"], 0);
    assert_eq!(empty["total_cards"], 0);

    let deck: Value = client
        .post_json("/decks", &json!({ "title": "Counted" }), Some(&token))
        .await
        .json();
    client
        .post_json(
            &format!("/decks/{}/cards/batch", deck["id"]),
            &json!({ "cards": [{ "front": "a", "back": "1" }, { "front": "b", "back": "2" }] }),
            Some(&token),
        )
        .await
        .assert_status(StatusCode::CREATED);

    // Writes invalidate the cached dashboard
    let dashboard: Value = client.get("/dashboard", Some(&token)).await.json();
    assert_eq!(dashboard["total_decks"], 1);
    assert_eq!(dashboard["total_cards"], 2);
    assert_eq!(dashboard["studied_cards"], 0);

    common::db::cleanup_user(&pool, &user).await.unwrap();
}
