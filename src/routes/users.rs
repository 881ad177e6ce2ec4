// src/routes/users.rs
use actix_web::{get, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::handlers::user_handler;
use crate::middleware::auth::Claims;

/// Current user's record (mounted under the authenticated /me scope)
#[get("")]
async fn me(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    user_handler::get_me(pool, claims).await
}

/// Global user count
#[get("/users/count")]
async fn count_users(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    user_handler::count_users(pool).await
}
