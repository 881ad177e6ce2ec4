// src/handlers/pool_handler.rs
use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::pool_queries;
use crate::errors::PoolError;
use crate::middleware::auth::{maybe_claims_from_request, Claims};
use crate::models::pool::{CreatePoolRequest, CreatePoolResponse, JoinPoolRequest};
use crate::utils::join_code;

/// How often pool creation retries a colliding code before giving up. With a
/// 31-character alphabet and 6 positions a collision is already rare; five
/// consecutive ones mean something is badly wrong.
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Create a new pool.
///
/// Authentication is optional here: a request without an Authorization
/// header creates an ownerless pool whose first joiner becomes owner. A
/// request with a token that fails verification is rejected instead of
/// silently falling back to ownerless creation.
#[tracing::instrument(
    name = "Create pool",
    skip(req, request, pool),
    fields(title = %request.title)
)]
pub async fn create_pool(
    req: HttpRequest,
    request: web::Json<CreatePoolRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    if let Err(validation_error) = request.validate() {
        tracing::warn!("Create pool validation failed: {}", validation_error);
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": validation_error
        })));
    }

    let owner_id = maybe_claims_from_request(&req)?.and_then(|claims| claims.user_id());
    let title = request.title.trim();

    match pool_queries::insert_pool_with_unique_code(
        &pool,
        title,
        owner_id,
        join_code::generate,
        MAX_CODE_ATTEMPTS,
    )
    .await
    {
        Ok((pool_id, code)) => {
            tracing::info!("Created pool {} with code {}", pool_id, code);
            Ok(HttpResponse::Created().json(CreatePoolResponse { code }))
        }
        Err(PoolError::CodeGenerationExhausted) => {
            tracing::error!(
                "Gave up creating a pool after {} code collisions",
                MAX_CODE_ATTEMPTS
            );
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": PoolError::CodeGenerationExhausted.to_string()
            })))
        }
        Err(e) => {
            tracing::error!("Failed to insert pool: {:?}", e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to create pool"
            })))
        }
    }
}

/// Join a pool by its share code. The first joiner of an ownerless pool
/// becomes its owner.
#[tracing::instrument(
    name = "Join pool",
    skip(request, pool, claims),
    fields(user = %claims.username, code = %request.code)
)]
pub async fn join_pool(
    request: web::Json<JoinPoolRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    if let Err(validation_error) = request.validate() {
        tracing::warn!("Join pool validation failed: {}", validation_error);
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

    let code = join_code::normalize(&request.code);
    let found = match pool_queries::find_pool_by_code(&pool, &code).await {
        Ok(Some(found)) => found,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(json!({
                "success": false,
                "message": PoolError::PoolNotFound.to_string()
            })));
        }
        Err(e) => {
            tracing::error!("Failed to look up pool by code: {:?}", e);
            return Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to look up pool"
            })));
        }
    };

    // Friendly pre-check; the unique index on (pool_id, user_id) backstops
    // the race and maps to the same error below.
    match pool_queries::participant_exists(&pool, found.id, user_id).await {
        Ok(true) => {
            return Ok(HttpResponse::Conflict().json(json!({
                "success": false,
                "message": PoolError::AlreadyJoined.to_string()
            })));
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Failed to check existing membership: {:?}", e);
            return Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to check membership"
            })));
        }
    }

    match pool_queries::join_pool(&pool, found.id, user_id).await {
        Ok(()) => {
            tracing::info!("User {} joined pool {}", user_id, found.id);
            Ok(HttpResponse::Created().json(json!({
                "success": true,
                "message": "Joined pool successfully"
            })))
        }
        Err(PoolError::AlreadyJoined) => Ok(HttpResponse::Conflict().json(json!({
            "success": false,
            "message": PoolError::AlreadyJoined.to_string()
        }))),
        Err(e) => {
            tracing::error!("Failed to join pool {}: {:?}", found.id, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to join pool"
            })))
        }
    }
}

/// Get one pool with its participant preview and count.
pub async fn get_pool(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();

    match pool_queries::get_pool_detail(&pool, pool_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(json!({ "pool": detail }))),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": PoolError::PoolNotFound.to_string()
        }))),
        Err(e) => {
            tracing::error!("Failed to get pool {}: {:?}", pool_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to get pool"
            })))
        }
    }
}

/// List every pool the caller participates in.
pub async fn list_pools(
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

    match pool_queries::list_pools_for_user(&pool, user_id).await {
        Ok(pools) => Ok(HttpResponse::Ok().json(json!({ "pools": pools }))),
        Err(e) => {
            tracing::error!("Failed to list pools for user {}: {:?}", user_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to list pools"
            })))
        }
    }
}

/// Global pool count.
pub async fn count_pools(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    match pool_queries::count_pools(&pool).await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({ "count": count }))),
        Err(e) => {
            tracing::error!("Failed to count pools: {:?}", e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to count pools"
            })))
        }
    }
}
