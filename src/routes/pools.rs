// src/routes/pools.rs
use actix_web::{get, post, web, HttpRequest, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::{guess_handler, pool_handler};
use crate::middleware::auth::Claims;
use crate::models::guess::SubmitGuessRequest;
use crate::models::pool::{CreatePoolRequest, JoinPoolRequest};

/// Create a new pool (optional authentication)
#[post("/pools")]
async fn create_pool(
    req: HttpRequest,
    request: web::Json<CreatePoolRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    pool_handler::create_pool(req, request, pool).await
}

/// Global pool count
#[get("/pools/count")]
async fn count_pools(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    pool_handler::count_pools(pool).await
}

/// Join a pool by its share code
#[post("/join")]
async fn join_pool(
    request: web::Json<JoinPoolRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    pool_handler::join_pool(request, pool, claims).await
}

/// List the caller's pools
#[get("")]
async fn list_pools(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    pool_handler::list_pools(pool, claims).await
}

/// Get one pool with participant preview and count
#[get("/{pool_id}")]
async fn get_pool(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    pool_handler::get_pool(path, pool).await
}

/// List the games of a pool with the caller's guesses
#[get("/{pool_id}/games")]
async fn get_pool_games(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    guess_handler::get_pool_games(path, pool, claims).await
}

/// Submit a score guess for a game
#[post("/{pool_id}/games/{game_id}/guesses")]
async fn submit_guess(
    path: web::Path<(Uuid, Uuid)>,
    request: web::Json<SubmitGuessRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    guess_handler::submit_guess(path, request, pool, claims).await
}
