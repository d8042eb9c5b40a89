//! Values bound positionally to a PostgreSQL statement.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value that can be bound to a PostgreSQL query. Each variant reports its own wire type.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    I32(i32),
    I64(i64),
    F64(f64),
    String(String),
}

impl From<i32> for PgBindValue {
    fn from(v: i32) -> Self {
        PgBindValue::I32(v)
    }
}

impl From<i64> for PgBindValue {
    fn from(v: i64) -> Self {
        PgBindValue::I64(v)
    }
}

impl From<f64> for PgBindValue {
    fn from(v: f64) -> Self {
        PgBindValue::F64(v)
    }
}

impl From<&str> for PgBindValue {
    fn from(v: &str) -> Self {
        PgBindValue::String(v.to_owned())
    }
}

impl From<String> for PgBindValue {
    fn from(v: String) -> Self {
        PgBindValue::String(v)
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::I32(n) => <i32 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::String(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::I32(_) => <i32 as Type<Postgres>>::type_info(),
            PgBindValue::I64(_) => <i64 as Type<Postgres>>::type_info(),
            PgBindValue::F64(_) => <f64 as Type<Postgres>>::type_info(),
            PgBindValue::String(_) => <String as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }

    fn compatible(_ty: &PgTypeInfo) -> bool {
        true
    }
}
