// src/models/game.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::guess::GuessView;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Game {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub first_team_country_code: String,
    pub second_team_country_code: String,
}

/// Flat row shape for the games-with-guess listing (LEFT JOIN on guesses).
#[derive(Debug, FromRow)]
pub struct GameWithGuessRow {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub first_team_country_code: String,
    pub second_team_country_code: String,
    pub guess_id: Option<Uuid>,
    pub first_team_points: Option<i32>,
    pub second_team_points: Option<i32>,
    pub guessed_at: Option<DateTime<Utc>>,
}

/// A game together with the calling participant's guess, if any.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GameWithGuess {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub first_team_country_code: String,
    pub second_team_country_code: String,
    pub guess: Option<GuessView>,
}

impl From<GameWithGuessRow> for GameWithGuess {
    fn from(row: GameWithGuessRow) -> Self {
        let guess = match (row.guess_id, row.first_team_points, row.second_team_points) {
            (Some(id), Some(first), Some(second)) => Some(GuessView {
                id,
                first_team_points: first,
                second_team_points: second,
                created_at: row.guessed_at,
            }),
            _ => None,
        };
        GameWithGuess {
            id: row.id,
            date: row.date,
            first_team_country_code: row.first_team_country_code,
            second_team_country_code: row.second_team_country_code,
            guess,
        }
    }
}
