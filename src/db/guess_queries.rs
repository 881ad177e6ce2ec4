// src/db/guess_queries.rs
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::is_unique_violation;
use crate::errors::GuessError;
use crate::models::game::{Game, GameWithGuess, GameWithGuessRow};

/// Resolve the caller's participant record inside one pool. Guesses always
/// hang off a membership, never off the raw user.
pub async fn find_participant_id(
    pg: &PgPool,
    pool_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM participants WHERE pool_id = $1 AND user_id = $2",
    )
    .bind(pool_id)
    .bind(user_id)
    .fetch_optional(pg)
    .await
}

pub async fn find_game(pg: &PgPool, game_id: Uuid) -> Result<Option<Game>, sqlx::Error> {
    sqlx::query_as::<_, Game>(
        r#"
        SELECT id, date, first_team_country_code, second_team_country_code
        FROM games
        WHERE id = $1
        "#,
    )
    .bind(game_id)
    .fetch_optional(pg)
    .await
}

/// Insert a guess. The unique index on (game_id, participant_id) is the
/// sole authority on "one guess per participant per game"; a violation maps
/// to AlreadyGuessed so concurrent duplicates get exactly one success.
pub async fn insert_guess(
    pg: &PgPool,
    game_id: Uuid,
    participant_id: Uuid,
    first_team_points: i32,
    second_team_points: i32,
) -> Result<Uuid, GuessError> {
    let guess_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO guesses (id, game_id, participant_id, first_team_points, second_team_points, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(guess_id)
    .bind(game_id)
    .bind(participant_id)
    .bind(first_team_points)
    .bind(second_team_points)
    .bind(Utc::now())
    .execute(pg)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            tracing::warn!(
                "Duplicate guess for game {} by participant {}",
                game_id,
                participant_id
            );
            GuessError::AlreadyGuessed
        } else {
            GuessError::Database(e)
        }
    })?;

    Ok(guess_id)
}

/// All tournament games, latest kickoff first, each joined with the given
/// participant's guess. A NULL participant matches no guesses, so a caller
/// who never joined the pool simply sees bare games.
pub async fn list_games_with_guess(
    pg: &PgPool,
    participant_id: Option<Uuid>,
) -> Result<Vec<GameWithGuess>, sqlx::Error> {
    let rows = sqlx::query_as::<_, GameWithGuessRow>(
        r#"
        SELECT
            ga.id,
            ga.date,
            ga.first_team_country_code,
            ga.second_team_country_code,
            gu.id AS guess_id,
            gu.first_team_points,
            gu.second_team_points,
            gu.created_at AS guessed_at
        FROM games ga
        LEFT JOIN guesses gu
            ON gu.game_id = ga.id AND gu.participant_id = $1
        ORDER BY ga.date DESC
        "#,
    )
    .bind(participant_id)
    .fetch_all(pg)
    .await?;

    Ok(rows.into_iter().map(GameWithGuess::from).collect())
}
