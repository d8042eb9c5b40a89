//! Runs a built statement against the pool and classifies failures.

use crate::error::{AppError, AppResult};
use crate::sql::QueryBuf;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::FromRow;

pub(crate) async fn fetch_optional<T>(pool: &PgPool, q: QueryBuf) -> AppResult<Option<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in q.params {
        query = query.bind(p);
    }
    query.fetch_optional(pool).await.map_err(|e| failed(e, &q.sql))
}

pub(crate) async fn fetch_one<T>(pool: &PgPool, q: QueryBuf) -> AppResult<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in q.params {
        query = query.bind(p);
    }
    query.fetch_one(pool).await.map_err(|e| failed(e, &q.sql))
}

pub(crate) async fn fetch_all<T>(pool: &PgPool, q: QueryBuf) -> AppResult<Vec<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in q.params {
        query = query.bind(p);
    }
    query.fetch_all(pool).await.map_err(|e| failed(e, &q.sql))
}

/// Executes without reading rows; returns the number of rows affected.
pub(crate) async fn execute(pool: &PgPool, q: QueryBuf) -> AppResult<u64> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in q.params {
        query = query.bind(p);
    }
    let done = query.execute(pool).await.map_err(|e| failed(e, &q.sql))?;
    Ok(done.rows_affected())
}

fn failed(e: sqlx::Error, sql: &str) -> AppError {
    let err = AppError::from(e);
    tracing::warn!(kind = ?err.kind(), error = %err, sql = %sql, "query failed");
    err
}
