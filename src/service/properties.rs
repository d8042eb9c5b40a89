//! Property search and insert.

use super::exec;
use crate::error::AppResult;
use crate::models::{NewProperty, Property, PropertyListing, PropertySearch};
use crate::sql::{insert_property, select_properties, select_property_by_id, DEFAULT_LIMIT};
use sqlx::PgPool;

pub struct PropertyService;

impl PropertyService {
    /// Reviewed properties matching `search`, cheapest first, at most `limit` rows (default 10).
    pub async fn list(
        pool: &PgPool,
        search: &PropertySearch,
        limit: Option<i64>,
    ) -> AppResult<Vec<PropertyListing>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let q = select_properties(search, limit).inspect_err(|e| {
            tracing::warn!(kind = ?e.kind(), error = %e, "property search rejected");
        })?;
        exec::fetch_all(pool, q).await
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> AppResult<Option<Property>> {
        exec::fetch_optional(pool, select_property_by_id(id)).await
    }

    /// Insert the fourteen columns of `property`. Returns rows affected; the new row is not read back.
    pub async fn create(pool: &PgPool, property: &NewProperty) -> AppResult<u64> {
        let affected = exec::execute(pool, insert_property(property)).await?;
        tracing::info!(owner_id = property.owner_id, title = %property.title, "property created");
        Ok(affected)
    }
}
