//! Database operations for `sync_runs`.

use catmirror_core::SyncCounts;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const SYNC_RUN_COLUMNS: &str = "id, public_id, trigger_source, status, started_at, completed_at, \
     categories_created, categories_updated, categories_skipped, \
     products_created, products_updated, products_skipped, write_failures, error_message";

/// A row from the `sync_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SyncRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub trigger_source: String,
    /// `running`, `succeeded`, or `failed`.
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub categories_created: i32,
    pub categories_updated: i32,
    pub categories_skipped: i32,
    pub products_created: i32,
    pub products_updated: i32,
    pub products_skipped: i32,
    pub write_failures: i32,
    pub error_message: Option<String>,
}

/// Inserts a new run in `running` status and returns it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn start_sync_run(pool: &PgPool, trigger_source: &str) -> Result<SyncRunRow, DbError> {
    let row = sqlx::query_as::<_, SyncRunRow>(&format!(
        "INSERT INTO sync_runs (public_id, trigger_source, status) \
         VALUES ($1, $2, 'running') \
         RETURNING {SYNC_RUN_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(trigger_source)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a running run as `succeeded` and stores its counters.
///
/// # Errors
///
/// Returns [`DbError::InvalidSyncRunTransition`] if the run is not `running`,
/// or [`DbError::Sqlx`] if the update fails.
pub async fn complete_sync_run(pool: &PgPool, id: i64, counts: &SyncCounts) -> Result<(), DbError> {
    finish_sync_run(pool, id, "succeeded", counts, None).await
}

/// Marks a running run as `failed`, storing the counters reached so far and
/// the failure message.
///
/// # Errors
///
/// Returns [`DbError::InvalidSyncRunTransition`] if the run is not `running`,
/// or [`DbError::Sqlx`] if the update fails.
pub async fn fail_sync_run(
    pool: &PgPool,
    id: i64,
    counts: &SyncCounts,
    error_message: &str,
) -> Result<(), DbError> {
    finish_sync_run(pool, id, "failed", counts, Some(error_message)).await
}

async fn finish_sync_run(
    pool: &PgPool,
    id: i64,
    status: &str,
    counts: &SyncCounts,
    error_message: Option<&str>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE sync_runs SET \
             status             = $1, \
             completed_at       = NOW(), \
             categories_created = $2, \
             categories_updated = $3, \
             categories_skipped = $4, \
             products_created   = $5, \
             products_updated   = $6, \
             products_skipped   = $7, \
             write_failures     = $8, \
             error_message      = $9 \
         WHERE id = $10 AND status = 'running'",
    )
    .bind(status)
    .bind(to_i32(counts.categories_created))
    .bind(to_i32(counts.categories_updated))
    .bind(to_i32(counts.categories_skipped))
    .bind(to_i32(counts.products_created))
    .bind(to_i32(counts.products_updated))
    .bind(to_i32(counts.products_skipped))
    .bind(to_i32(counts.write_failures))
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidSyncRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Fetches a single run by internal id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_sync_run(pool: &PgPool, id: i64) -> Result<Option<SyncRunRow>, DbError> {
    let row = sqlx::query_as::<_, SyncRunRow>(&format!(
        "SELECT {SYNC_RUN_COLUMNS} FROM sync_runs WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Lists the most recent runs, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_sync_runs(pool: &PgPool, limit: i64) -> Result<Vec<SyncRunRow>, DbError> {
    let rows = sqlx::query_as::<_, SyncRunRow>(&format!(
        "SELECT {SYNC_RUN_COLUMNS} FROM sync_runs ORDER BY started_at DESC, id DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn to_i32(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
