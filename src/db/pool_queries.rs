// src/db/pool_queries.rs
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::is_unique_violation;
use crate::errors::PoolError;
use crate::models::pool::{ParticipantPreview, Pool, PoolDetail, PoolOwner};

/// How many participants a pool detail response previews.
pub const PARTICIPANT_PREVIEW_LIMIT: i64 = 4;

/// Insert an ownerless pool (unauthenticated creation).
pub async fn insert_pool(pg: &PgPool, title: &str, code: &str) -> Result<Uuid, sqlx::Error> {
    let pool_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO pools (id, title, code, owner_id, created_at)
        VALUES ($1, $2, $3, NULL, $4)
        "#,
    )
    .bind(pool_id)
    .bind(title)
    .bind(code)
    .bind(Utc::now())
    .execute(pg)
    .await?;

    Ok(pool_id)
}

/// Insert a pool owned by its creator together with the creator's own
/// participant row. Both rows commit or neither does.
pub async fn insert_pool_with_owner(
    pg: &PgPool,
    title: &str,
    code: &str,
    owner_id: Uuid,
) -> Result<Uuid, sqlx::Error> {
    let pool_id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pg.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO pools (id, title, code, owner_id, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(pool_id)
    .bind(title)
    .bind(code)
    .bind(owner_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO participants (id, pool_id, user_id, joined_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(pool_id)
    .bind(owner_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(pool_id)
}

/// Insert a pool under a freshly generated code, retrying on a code
/// collision up to `max_attempts` times. The unique index on pools.code is
/// the authority; a generated code is only known to be unique once the
/// insert sticks. Any non-collision database error aborts immediately.
pub async fn insert_pool_with_unique_code(
    pg: &PgPool,
    title: &str,
    owner_id: Option<Uuid>,
    mut next_code: impl FnMut() -> String,
    max_attempts: u32,
) -> Result<(Uuid, String), PoolError> {
    for attempt in 1..=max_attempts {
        let code = next_code();
        let inserted = match owner_id {
            Some(owner_id) => insert_pool_with_owner(pg, title, &code, owner_id).await,
            None => insert_pool(pg, title, &code).await,
        };

        match inserted {
            Ok(pool_id) => return Ok((pool_id, code)),
            Err(e) if is_unique_violation(&e) => {
                tracing::warn!("Pool code collision on attempt {}: {}", attempt, code);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(PoolError::CodeGenerationExhausted)
}

/// Look up a pool by its normalized share code.
pub async fn find_pool_by_code(pg: &PgPool, code: &str) -> Result<Option<Pool>, sqlx::Error> {
    sqlx::query_as::<_, Pool>(
        "SELECT id, title, code, owner_id, created_at FROM pools WHERE code = $1",
    )
    .bind(code)
    .fetch_optional(pg)
    .await
}

pub async fn find_pool_by_id(pg: &PgPool, pool_id: Uuid) -> Result<Option<Pool>, sqlx::Error> {
    sqlx::query_as::<_, Pool>(
        "SELECT id, title, code, owner_id, created_at FROM pools WHERE id = $1",
    )
    .bind(pool_id)
    .fetch_optional(pg)
    .await
}

pub async fn participant_exists(
    pg: &PgPool,
    pool_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM participants WHERE pool_id = $1 AND user_id = $2",
    )
    .bind(pool_id)
    .bind(user_id)
    .fetch_one(pg)
    .await?;

    Ok(count > 0)
}

/// Join a pool: conditional owner assignment plus participant insert in a
/// single transaction.
///
/// The UPDATE only flips owner_id while it is still NULL, so of N racing
/// joiners exactly one becomes owner; the losers' update touches zero rows
/// and they still join as plain participants. A duplicate membership hits
/// the unique index on (pool_id, user_id) and rolls the whole join back.
pub async fn join_pool(pg: &PgPool, pool_id: Uuid, user_id: Uuid) -> Result<(), PoolError> {
    let mut tx = pg.begin().await?;

    sqlx::query("UPDATE pools SET owner_id = $1 WHERE id = $2 AND owner_id IS NULL")
        .bind(user_id)
        .bind(pool_id)
        .execute(&mut *tx)
        .await?;

    let insert = sqlx::query(
        r#"
        INSERT INTO participants (id, pool_id, user_id, joined_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(pool_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await;

    if let Err(e) = insert {
        if is_unique_violation(&e) {
            return Err(PoolError::AlreadyJoined);
        }
        return Err(e.into());
    }

    tx.commit().await?;
    Ok(())
}

pub async fn count_pools(pg: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pools")
        .fetch_one(pg)
        .await
}

#[derive(sqlx::FromRow)]
struct PoolWithOwnerRow {
    id: Uuid,
    title: String,
    code: String,
    owner_id: Option<Uuid>,
    owner_username: Option<String>,
    created_at: DateTime<Utc>,
}

/// Pool detail: the pool itself, its owner (if assigned), the aggregate
/// participant count and a bounded preview of participants in join order.
pub async fn get_pool_detail(pg: &PgPool, pool_id: Uuid) -> Result<Option<PoolDetail>, sqlx::Error> {
    let pool = sqlx::query_as::<_, PoolWithOwnerRow>(
        r#"
        SELECT p.id, p.title, p.code, p.owner_id, u.username AS owner_username, p.created_at
        FROM pools p
        LEFT JOIN users u ON u.id = p.owner_id
        WHERE p.id = $1
        "#,
    )
    .bind(pool_id)
    .fetch_optional(pg)
    .await?;

    let pool = match pool {
        Some(pool) => pool,
        None => return Ok(None),
    };

    let participant_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM participants WHERE pool_id = $1",
    )
    .bind(pool_id)
    .fetch_one(pg)
    .await?;

    let participants = sqlx::query_as::<_, ParticipantPreview>(
        r#"
        SELECT pa.id, u.username
        FROM participants pa
        JOIN users u ON u.id = pa.user_id
        WHERE pa.pool_id = $1
        ORDER BY pa.joined_at ASC
        LIMIT $2
        "#,
    )
    .bind(pool_id)
    .bind(PARTICIPANT_PREVIEW_LIMIT)
    .fetch_all(pg)
    .await?;

    let owner = match (pool.owner_id, pool.owner_username) {
        (Some(id), Some(username)) => Some(PoolOwner { id, username }),
        _ => None,
    };

    Ok(Some(PoolDetail {
        id: pool.id,
        title: pool.title,
        code: pool.code,
        owner,
        created_at: pool.created_at,
        participant_count,
        participants,
    }))
}

#[derive(sqlx::FromRow)]
struct PoolSummaryRow {
    id: Uuid,
    title: String,
    code: String,
    owner_id: Option<Uuid>,
    owner_username: Option<String>,
    created_at: DateTime<Utc>,
    participant_count: i64,
}

#[derive(sqlx::FromRow)]
struct PreviewRow {
    pool_id: Uuid,
    id: Uuid,
    username: String,
}

/// Every pool the user participates in, oldest membership first. Fetched in
/// two queries regardless of how many pools the user is in: one for the
/// pools with their owner and count, one windowed query for all previews.
pub async fn list_pools_for_user(pg: &PgPool, user_id: Uuid) -> Result<Vec<PoolDetail>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PoolSummaryRow>(
        r#"
        SELECT p.id, p.title, p.code, p.owner_id, u.username AS owner_username, p.created_at,
               (SELECT COUNT(*) FROM participants pc WHERE pc.pool_id = p.id) AS participant_count
        FROM participants pa
        JOIN pools p ON p.id = pa.pool_id
        LEFT JOIN users u ON u.id = p.owner_id
        WHERE pa.user_id = $1
        ORDER BY pa.joined_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pg)
    .await?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let pool_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let previews = sqlx::query_as::<_, PreviewRow>(
        r#"
        SELECT pool_id, id, username
        FROM (
            SELECT pa.pool_id, pa.id, u.username,
                   ROW_NUMBER() OVER (PARTITION BY pa.pool_id ORDER BY pa.joined_at ASC) AS rn
            FROM participants pa
            JOIN users u ON u.id = pa.user_id
            WHERE pa.pool_id = ANY($1)
        ) ranked
        WHERE rn <= $2
        ORDER BY pool_id, rn
        "#,
    )
    .bind(&pool_ids)
    .bind(PARTICIPANT_PREVIEW_LIMIT)
    .fetch_all(pg)
    .await?;

    let mut previews_by_pool: HashMap<Uuid, Vec<ParticipantPreview>> = HashMap::new();
    for row in previews {
        previews_by_pool
            .entry(row.pool_id)
            .or_default()
            .push(ParticipantPreview {
                id: row.id,
                username: row.username,
            });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let owner = match (row.owner_id, row.owner_username) {
                (Some(id), Some(username)) => Some(PoolOwner { id, username }),
                _ => None,
            };
            PoolDetail {
                id: row.id,
                title: row.title,
                code: row.code,
                owner,
                created_at: row.created_at,
                participant_count: row.participant_count,
                participants: previews_by_pool.remove(&row.id).unwrap_or_default(),
            }
        })
        .collect())
}
