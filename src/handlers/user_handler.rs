// src/handlers/user_handler.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;

use crate::middleware::auth::Claims;
use crate::models::user::UserInfo;

/// Return the authenticated caller's user record.
pub async fn get_me(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
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

    match sqlx::query_as::<_, UserInfo>(
        "SELECT id, username, email, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(json!({ "user": user }))),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "User not found"
        }))),
        Err(e) => {
            tracing::error!("Failed to fetch user: {:?}", e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to fetch user"
            })))
        }
    }
}

/// Global user count.
pub async fn count_users(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool.get_ref())
        .await
    {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({ "count": count }))),
        Err(e) => {
            tracing::error!("Failed to count users: {:?}", e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to count users"
            })))
        }
    }
}
