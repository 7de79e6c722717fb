use sqlx::{Executor, PgConnection, Postgres};

use super::deck;
use crate::models::DashboardStats;

/// Cards across every deck the user owns.
pub async fn total_cards_for_user<'e, E>(executor: E, user_id: &str) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM flashcard_cards c
            JOIN flashcard_decks d ON d.id = c.deck_id
            WHERE d.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Number of answers the user has recorded.
pub async fn studied_cards_for_user<'e, E>(executor: E, user_id: &str) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM flashcard_study_sessions
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn dashboard(conn: &mut PgConnection, user_id: &str) -> Result<DashboardStats, sqlx::Error> {
    let decks = deck::list_for_user(&mut *conn, user_id).await?;
    let total_cards = total_cards_for_user(&mut *conn, user_id).await?;
    let studied_cards = studied_cards_for_user(&mut *conn, user_id).await?;

    Ok(DashboardStats {
        total_decks: decks.len() as i64,
        total_cards,
        studied_cards,
        decks,
    })
}
