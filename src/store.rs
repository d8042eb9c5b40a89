//! Pool construction and schema bootstrap for the LightBnB tables.

use crate::config::DbConfig;
use crate::error::AppError;
use sqlx::ConnectOptions;
use sqlx::PgPool;

/// Table DDL in dependency order. Every statement is idempotent.
const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password VARCHAR(255) NOT NULL
        )
        "#,
    ),
    (
        "properties",
        r#"
        CREATE TABLE IF NOT EXISTS properties (
            id SERIAL PRIMARY KEY,
            owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            thumbnail_photo_url VARCHAR(255) NOT NULL,
            cover_photo_url VARCHAR(255) NOT NULL,
            cost_per_night INTEGER NOT NULL DEFAULT 0,
            parking_spaces INTEGER NOT NULL DEFAULT 0,
            number_of_bathrooms INTEGER NOT NULL DEFAULT 0,
            number_of_bedrooms INTEGER NOT NULL DEFAULT 0,
            country VARCHAR(255) NOT NULL,
            street VARCHAR(255) NOT NULL,
            city VARCHAR(255) NOT NULL,
            province VARCHAR(255) NOT NULL,
            post_code VARCHAR(255) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE
        )
        "#,
    ),
    (
        "reservations",
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id SERIAL PRIMARY KEY,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
            guest_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    ),
    (
        "property_reviews",
        r#"
        CREATE TABLE IF NOT EXISTS property_reviews (
            id SERIAL PRIMARY KEY,
            guest_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
            reservation_id INTEGER NOT NULL REFERENCES reservations(id) ON DELETE CASCADE,
            rating SMALLINT NOT NULL DEFAULT 0,
            message TEXT
        )
        "#,
    ),
];

/// Build the pool from config. The pool is the only shared handle; callers pass `&PgPool` to each service call.
pub async fn connect(config: &DbConfig) -> Result<PgPool, AppError> {
    let opts = config.connect_options()?;
    let pool = config.pool_options().connect_with(opts).await?;
    tracing::info!(max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

/// Create users, properties, reservations and property_reviews if missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    for (table, ddl) in SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!(table, "table ensured");
    }
    Ok(())
}

/// Connects to the `postgres` database on the same server and creates the target database if missing.
pub async fn ensure_database_exists(config: &DbConfig) -> Result<(), AppError> {
    let opts = config.connect_options()?;
    let db_name = opts.get_database().unwrap_or("").to_string();
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let mut conn: sqlx::PgConnection = opts.database("postgres").connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "database created");
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
