// src/handlers/guess_handler.rs
use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{guess_queries, pool_queries};
use crate::errors::{GuessError, PoolError};
use crate::game::guess_window;
use crate::middleware::auth::Claims;
use crate::models::guess::SubmitGuessRequest;

/// Submit a score guess for one game of a pool.
///
/// The caller must be a participant of the pool; the guess hangs off that
/// membership, never off the raw user. The window check runs here, at
/// submission time, against the server clock.
#[tracing::instrument(
    name = "Submit guess",
    skip(request, pool, claims),
    fields(user = %claims.username)
)]
pub async fn submit_guess(
    path: web::Path<(Uuid, Uuid)>, // (pool_id, game_id)
    request: web::Json<SubmitGuessRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let (pool_id, game_id) = path.into_inner();

    if let Err(validation_error) = request.validate() {
        tracing::warn!("Submit guess validation failed: {}", validation_error);
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": validation_error
        })));
    }

    let user_id = match claims.user_id() {
        Some(id) => id,
        None => {
            tracing::error!("Invalid user ID in claims: {}", claims.sub);
            return Ok(HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "Invalid user ID"
            })));
        }
    };

    let participant_id = match guess_queries::find_participant_id(&pool, pool_id, user_id).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            return Ok(HttpResponse::Forbidden().json(json!({
                "success": false,
                "message": GuessError::NotAParticipant.to_string()
            })));
        }
        Err(e) => {
            tracing::error!("Failed to resolve participant: {:?}", e);
            return Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to resolve participant"
            })));
        }
    };

    let game = match guess_queries::find_game(&pool, game_id).await {
        Ok(Some(game)) => game,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(json!({
                "success": false,
                "message": GuessError::GameNotFound.to_string()
            })));
        }
        Err(e) => {
            tracing::error!("Failed to fetch game {}: {:?}", game_id, e);
            return Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to fetch game"
            })));
        }
    };

    if !guess_window::can_guess(Utc::now(), game.date) {
        tracing::info!("Rejected guess for game {} past kickoff", game_id);
        return Ok(HttpResponse::Conflict().json(json!({
            "success": false,
            "message": GuessError::GuessWindowClosed.to_string()
        })));
    }

    match guess_queries::insert_guess(
        &pool,
        game_id,
        participant_id,
        request.first_team_points,
        request.second_team_points,
    )
    .await
    {
        Ok(guess_id) => {
            tracing::info!("Stored guess {} for game {}", guess_id, game_id);
            Ok(HttpResponse::Created().json(json!({
                "success": true,
                "message": "Guess submitted successfully"
            })))
        }
        Err(GuessError::AlreadyGuessed) => Ok(HttpResponse::Conflict().json(json!({
            "success": false,
            "message": GuessError::AlreadyGuessed.to_string()
        }))),
        Err(e) => {
            tracing::error!("Failed to insert guess for game {}: {:?}", game_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to submit guess"
            })))
        }
    }
}

/// List the tournament games for a pool, each with the caller's guess.
pub async fn get_pool_games(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();

    let user_id = match claims.user_id() {
        Some(id) => id,
        None => {
            tracing::error!("Invalid user ID in claims: {}", claims.sub);
            return Ok(HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "Invalid user ID"
            })));
        }
    };

    match pool_queries::find_pool_by_id(&pool, pool_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(json!({
                "success": false,
                "message": PoolError::PoolNotFound.to_string()
            })));
        }
        Err(e) => {
            tracing::error!("Failed to look up pool {}: {:?}", pool_id, e);
            return Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to look up pool"
            })));
        }
    }

    let participant_id = match guess_queries::find_participant_id(&pool, pool_id, user_id).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to resolve participant: {:?}", e);
            return Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to resolve participant"
            })));
        }
    };

    match guess_queries::list_games_with_guess(&pool, participant_id).await {
        Ok(games) => Ok(HttpResponse::Ok().json(json!({ "games": games }))),
        Err(e) => {
            tracing::error!("Failed to list games for pool {}: {:?}", pool_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to list games"
            })))
        }
    }
}
