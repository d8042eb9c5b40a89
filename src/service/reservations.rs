use super::exec;
use crate::error::AppResult;
use crate::models::ReservationDetails;
use crate::sql::{select_reservations_for_guest, DEFAULT_LIMIT};
use sqlx::PgPool;

pub struct ReservationService;

impl ReservationService {
    /// Reservations of `guest_id` with guest and property fields, at most `limit` rows (default 10).
    pub async fn list_for_guest(
        pool: &PgPool,
        guest_id: i32,
        limit: Option<i64>,
    ) -> AppResult<Vec<ReservationDetails>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        exec::fetch_all(pool, select_reservations_for_guest(guest_id, limit)).await
    }
}
