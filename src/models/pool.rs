// src/models/pool.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::join_code;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Pool {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Participant {
    pub id: Uuid,
    pub pool_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// Request to create a new pool
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreatePoolRequest {
    pub title: String,
}

impl CreatePoolRequest {
    pub fn validate(&self) -> Result<(), String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Pool title cannot be empty".to_string());
        }
        if title.len() > 100 {
            return Err("Pool title cannot exceed 100 characters".to_string());
        }
        Ok(())
    }
}

/// Request to join a pool by its share code
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JoinPoolRequest {
    pub code: String,
}

impl JoinPoolRequest {
    pub fn validate(&self) -> Result<(), String> {
        let code = join_code::normalize(&self.code);
        if code.len() != join_code::CODE_LENGTH {
            return Err(format!(
                "Pool code must be {} characters",
                join_code::CODE_LENGTH
            ));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err("Pool code must be alphanumeric".to_string());
        }
        Ok(())
    }
}

/// Response for pool creation
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePoolResponse {
    pub code: String,
}

/// The pool's owner as shown in pool details
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct PoolOwner {
    pub id: Uuid,
    pub username: String,
}

/// One entry of the bounded participant preview
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct ParticipantPreview {
    pub id: Uuid,
    pub username: String,
}

/// Pool with owner, participant count and a bounded participant preview
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PoolDetail {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub owner: Option<PoolOwner>,
    pub created_at: DateTime<Utc>,
    pub participant_count: i64,
    pub participants: Vec<ParticipantPreview>,
}
