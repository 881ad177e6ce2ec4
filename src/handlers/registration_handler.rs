use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;

use crate::db::helpers::is_unique_violation;
use crate::models::user::RegistrationRequest;
use crate::utils::password::hash_password;

#[tracing::instrument(
    name = "Adding a new user",
    // Don't show arguments
    skip(user_form, pool),
    fields(
        username = %user_form.username,
        email = %user_form
    )
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
) -> HttpResponse {
    if let Err(validation_error) = user_form.validate() {
        tracing::warn!("Registration validation failed: {}", validation_error);
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": validation_error
        }));
    }

    match insert_user(&user_form, &pool).await {
        Ok(_) => HttpResponse::Ok().finish(),
        Err(e) if is_unique_violation(&e) => {
            tracing::warn!("Registration conflict for username {}", user_form.username);
            HttpResponse::Conflict().json(json!({
                "success": false,
                "message": "Username or email already taken"
            }))
        }
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

pub async fn insert_user(
    user_form: &web::Json<RegistrationRequest>,
    pool: &PgPool,
) -> Result<(), sqlx::Error> {
    let user_id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO users (id, username, password_hash, email, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(user_id)
    .bind(user_form.username.trim())
    .bind(hash_password(user_form.password.expose_secret()))
    .bind(&user_form.email)
    .bind(Utc::now())
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute user insert query: {:?}", e);
        e
    })?;

    Ok(())
}
