use sqlx::{Executor, PgConnection, Postgres};

use crate::models::{Card, Deck, DeckChanges, DeckWithCards, NewDeck};

/// Number of decks owned by a user (used for plan quotas).
pub async fn count_for_user<'e, E>(executor: E, user_id: &str) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM flashcard_decks
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn list_for_user<'e, E>(executor: E, user_id: &str) -> Result<Vec<Deck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, title, description, user_id, is_public, created_at, updated_at
            FROM flashcard_decks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Fetch a deck only if it belongs to `user_id`.
pub async fn find_owned<'e, E>(
    executor: E,
    user_id: &str,
    deck_id: i64,
) -> Result<Option<Deck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, title, description, user_id, is_public, created_at, updated_at
            FROM flashcard_decks
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(deck_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Ownership guard: does `deck_id` exist and belong to `user_id`?
pub async fn is_owned_by<'e, E>(executor: E, user_id: &str, deck_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(
                SELECT 1 FROM flashcard_decks
                WHERE id = $1 AND user_id = $2
            )
        "#,
    )
    .bind(deck_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn create<'e, E>(executor: E, user_id: &str, deck: &NewDeck) -> Result<Deck, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO flashcard_decks (title, description, is_public, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, user_id, is_public, created_at, updated_at
        "#,
    )
    .bind(&deck.title)
    .bind(&deck.description)
    .bind(deck.is_public)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Apply the supplied fields to an owned deck and bump `updated_at`.
///
/// Returns `None` when the deck does not exist or belongs to someone else.
pub async fn update_owned<'e, E>(
    executor: E,
    user_id: &str,
    deck_id: i64,
    changes: &DeckChanges,
) -> Result<Option<Deck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE flashcard_decks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                is_public = COALESCE($5, is_public),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, title, description, user_id, is_public, created_at, updated_at
        "#,
    )
    .bind(deck_id)
    .bind(user_id)
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(changes.is_public)
    .fetch_optional(executor)
    .await
}

/// Delete an owned deck. Cards and study sessions go with it (FK cascade).
pub async fn delete_owned<'e, E>(
    executor: E,
    user_id: &str,
    deck_id: i64,
) -> Result<Option<Deck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            DELETE FROM flashcard_decks
            WHERE id = $1 AND user_id = $2
            RETURNING id, title, description, user_id, is_public, created_at, updated_at
        "#,
    )
    .bind(deck_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Load an owned deck and its cards, most recently edited cards first.
pub async fn find_with_cards(
    conn: &mut PgConnection,
    user_id: &str,
    deck_id: i64,
) -> Result<Option<DeckWithCards>, sqlx::Error> {
    let Some(deck) = find_owned(&mut *conn, user_id, deck_id).await? else {
        return Ok(None);
    };

    let cards: Vec<Card> = sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, front, back, deck_id, "order", created_at, updated_at
            FROM flashcard_cards
            WHERE deck_id = $1
            ORDER BY updated_at DESC, id DESC
        "#,
    )
    .bind(deck_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(DeckWithCards { deck, cards }))
}
