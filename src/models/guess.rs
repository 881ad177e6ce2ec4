// src/models/guess.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Guess {
    pub id: Uuid,
    pub game_id: Uuid,
    pub participant_id: Uuid,
    pub first_team_points: i32,
    pub second_team_points: i32,
    pub created_at: DateTime<Utc>,
}

/// Request to submit a score guess for a game
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubmitGuessRequest {
    pub first_team_points: i32,
    pub second_team_points: i32,
}

impl SubmitGuessRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.first_team_points < 0 || self.second_team_points < 0 {
            return Err("Points cannot be negative".to_string());
        }
        Ok(())
    }
}

/// Guess as embedded in game listings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GuessView {
    pub id: Uuid,
    pub first_team_points: i32,
    pub second_team_points: i32,
    pub created_at: Option<DateTime<Utc>>,
}
