use sqlx::{Executor, PgConnection, Postgres};

use super::deck;
use crate::models::{NewStudySession, RecentSession, StudySession, StudyStats};

/// Append one answer to the study log.
///
/// The card must belong to the referenced deck and the deck to `user_id`;
/// otherwise nothing is written and `None` is returned.
pub async fn record(
    conn: &mut PgConnection,
    user_id: &str,
    session: &NewStudySession,
) -> Result<Option<StudySession>, sqlx::Error> {
    let card_in_owned_deck: bool = sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(
                SELECT 1
                FROM flashcard_cards c
                JOIN flashcard_decks d ON d.id = c.deck_id
                WHERE c.id = $1 AND d.id = $2 AND d.user_id = $3
            )
        "#,
    )
    .bind(session.card_id)
    .bind(session.deck_id)
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;

    if !card_in_owned_deck {
        return Ok(None);
    }

    let recorded = sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO flashcard_study_sessions (user_id, deck_id, card_id, correct, response_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, deck_id, card_id, correct, response_time, studied_at
        "#,
    )
    .bind(user_id)
    .bind(session.deck_id)
    .bind(session.card_id)
    .bind(session.correct)
    .bind(session.response_time)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Some(recorded))
}

pub async fn recent_for_user<'e, E>(
    executor: E,
    user_id: &str,
    limit: i64,
) -> Result<Vec<RecentSession>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                s.id,
                s.deck_id,
                s.card_id,
                s.correct,
                s.response_time,
                s.studied_at,
                d.title AS deck_title,
                c.front AS card_front
            FROM flashcard_study_sessions s
            JOIN flashcard_decks d ON d.id = s.deck_id
            JOIN flashcard_cards c ON c.id = s.card_id
            WHERE s.user_id = $1
            ORDER BY s.studied_at DESC, s.id DESC
            LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// The user's answers for one owned deck, newest first.
pub async fn list_for_deck(
    conn: &mut PgConnection,
    user_id: &str,
    deck_id: i64,
) -> Result<Option<Vec<StudySession>>, sqlx::Error> {
    if !deck::is_owned_by(&mut *conn, user_id, deck_id).await? {
        return Ok(None);
    }

    let sessions = sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, deck_id, card_id, correct, response_time, studied_at
            FROM flashcard_study_sessions
            WHERE user_id = $1 AND deck_id = $2
            ORDER BY studied_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(deck_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(sessions))
}

/// Aggregate the user's answers, optionally for a single deck.
pub async fn stats_for_user<'e, E>(
    executor: E,
    user_id: &str,
    deck_id: Option<i64>,
) -> Result<StudyStats, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE correct) AS correct,
                COUNT(*) FILTER (WHERE NOT correct) AS incorrect,
                AVG(response_time)::float8 AS average_response_time_ms
            FROM flashcard_study_sessions
            WHERE user_id = $1
                AND ($2::bigint IS NULL OR deck_id = $2)
        "#,
    )
    .bind(user_id)
    .bind(deck_id)
    .fetch_one(executor)
    .await
}
