//! Users: lookup by email or id, and insert.

use super::exec;
use crate::error::AppResult;
use crate::models::{NewUser, User};
use crate::sql::{insert_user, select_user_by_email, select_user_by_id};
use sqlx::PgPool;

pub struct UserService;

impl UserService {
    /// Exact, case-as-stored match on email. `Ok(None)` when no user has it.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> AppResult<Option<User>> {
        exec::fetch_optional(pool, select_user_by_email(email)).await
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> AppResult<Option<User>> {
        exec::fetch_optional(pool, select_user_by_id(id)).await
    }

    /// Insert and return the stored row. A taken email fails with
    /// [`AppError::ConstraintViolation`](crate::AppError::ConstraintViolation).
    pub async fn create(pool: &PgPool, user: &NewUser) -> AppResult<User> {
        let created: User = exec::fetch_one(pool, insert_user(user)).await?;
        tracing::info!(user_id = created.id, "user created");
        Ok(created)
    }
}
