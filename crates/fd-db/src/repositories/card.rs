use sqlx::{Executor, PgConnection, PgPool, Postgres};

use super::deck;
use crate::models::{Card, CardChanges, NewCard};

/// Ownership guard: does `card_id` exist in a deck owned by `user_id`?
pub async fn is_owned_by<'e, E>(executor: E, user_id: &str, card_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(
                SELECT 1
                FROM flashcard_cards c
                JOIN flashcard_decks d ON d.id = c.deck_id
                WHERE c.id = $1 AND d.user_id = $2
            )
        "#,
    )
    .bind(card_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Card count for an owned deck; 0 when the deck is not the user's.
pub async fn count_for_deck<'e, E>(executor: E, user_id: &str, deck_id: i64) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM flashcard_cards c
            JOIN flashcard_decks d ON d.id = c.deck_id
            WHERE c.deck_id = $1 AND d.user_id = $2
        "#,
    )
    .bind(deck_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn list_for_deck<'e, E>(
    executor: E,
    user_id: &str,
    deck_id: i64,
) -> Result<Vec<Card>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT c.id, c.front, c.back, c.deck_id, c."order", c.created_at, c.updated_at
            FROM flashcard_cards c
            JOIN flashcard_decks d ON d.id = c.deck_id
            WHERE c.deck_id = $1 AND d.user_id = $2
            ORDER BY c.updated_at DESC, c.id DESC
        "#,
    )
    .bind(deck_id)
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn find_owned<'e, E>(
    executor: E,
    user_id: &str,
    card_id: i64,
) -> Result<Option<Card>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT c.id, c.front, c.back, c.deck_id, c."order", c.created_at, c.updated_at
            FROM flashcard_cards c
            JOIN flashcard_decks d ON d.id = c.deck_id
            WHERE c.id = $1 AND d.user_id = $2
        "#,
    )
    .bind(card_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Insert a card into an owned deck. `None` if the deck is not the user's.
pub async fn create(
    conn: &mut PgConnection,
    user_id: &str,
    deck_id: i64,
    card: &NewCard,
) -> Result<Option<Card>, sqlx::Error> {
    if !deck::is_owned_by(&mut *conn, user_id, deck_id).await? {
        return Ok(None);
    }

    let card = sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO flashcard_cards (front, back, deck_id, "order")
            VALUES ($1, $2, $3, $4)
            RETURNING id, front, back, deck_id, "order", created_at, updated_at
        "#,
    )
    .bind(&card.front)
    .bind(&card.back)
    .bind(deck_id)
    .bind(card.order.unwrap_or(0))
    .fetch_one(&mut *conn)
    .await?;

    Ok(Some(card))
}

/// Insert many cards into an owned deck, all or nothing.
///
/// The ownership check and the multi-row insert share one transaction. Each
/// card's `order` is its position in `cards` unless set explicitly. Returns
/// `None` (and inserts nothing) if the deck is not the user's.
pub async fn create_batch(
    pool: &PgPool,
    user_id: &str,
    deck_id: i64,
    cards: &[NewCard],
) -> Result<Option<Vec<Card>>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    if !deck::is_owned_by(&mut *tx, user_id, deck_id).await? {
        tx.rollback().await?;
        return Ok(None);
    }

    if cards.is_empty() {
        tx.commit().await?;
        return Ok(Some(Vec::new()));
    }

    let fronts: Vec<String> = cards.iter().map(|c| c.front.clone()).collect();
    let backs: Vec<String> = cards.iter().map(|c| c.back.clone()).collect();
    let orders: Vec<i32> = cards
        .iter()
        .enumerate()
        .map(|(index, c)| c.order.unwrap_or(index as i32))
        .collect();

    let mut inserted: Vec<Card> = sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO flashcard_cards (front, back, deck_id, "order")
            SELECT t.front, t.back, $1, t.position
            FROM UNNEST($2::text[], $3::text[], $4::int4[]) AS t(front, back, position)
            RETURNING id, front, back, deck_id, "order", created_at, updated_at
        "#,
    )
    .bind(deck_id)
    .bind(&fronts)
    .bind(&backs)
    .bind(&orders)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    inserted.sort_by_key(|c| (c.order, c.id));
    Ok(Some(inserted))
}

/// Apply the supplied fields to an owned card and bump `updated_at`.
pub async fn update_owned(
    conn: &mut PgConnection,
    user_id: &str,
    card_id: i64,
    changes: &CardChanges,
) -> Result<Option<Card>, sqlx::Error> {
    if !is_owned_by(&mut *conn, user_id, card_id).await? {
        return Ok(None);
    }

    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE flashcard_cards
            SET front = COALESCE($2, front),
                back = COALESCE($3, back),
                "order" = COALESCE($4, "order"),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, front, back, deck_id, "order", created_at, updated_at
        "#,
    )
    .bind(card_id)
    .bind(&changes.front)
    .bind(&changes.back)
    .bind(changes.order)
    .fetch_optional(&mut *conn)
    .await
}

/// Delete an owned card. Its study sessions go with it (FK cascade).
pub async fn delete_owned(
    conn: &mut PgConnection,
    user_id: &str,
    card_id: i64,
) -> Result<Option<Card>, sqlx::Error> {
    if !is_owned_by(&mut *conn, user_id, card_id).await? {
        return Ok(None);
    }

    sqlx::query_as(
        // language=PostgreSQL
        r#"
            DELETE FROM flashcard_cards
            WHERE id = $1
            RETURNING id, front, back, deck_id, "order", created_at, updated_at
        "#,
    )
    .bind(card_id)
    .fetch_optional(&mut *conn)
    .await
}
