//! Builds parameterized SELECT and INSERT statements for users, reservations and properties.

use super::params::PgBindValue;
use crate::error::{AppError, AppResult};
use crate::models::{FilterComposition, NewProperty, NewUser, PropertySearch};

/// Price filters are multiplied by this before comparison with `cost_per_night`.
pub const PRICE_SCALE: i64 = 99;

/// Row cap used when the caller does not pass a limit.
pub const DEFAULT_LIMIT: i64 = 10;

const USER_COLUMNS: &str = "id, name, email, password";

const PROPERTY_COLUMNS: &str = "properties.id, properties.owner_id, properties.title, \
    properties.description, properties.thumbnail_photo_url, properties.cover_photo_url, \
    properties.cost_per_night, properties.parking_spaces, properties.number_of_bathrooms, \
    properties.number_of_bedrooms, properties.country, properties.street, properties.city, \
    properties.province, properties.post_code, properties.active";

/// Insert order of the property columns; values are pushed in the same order.
const PROPERTY_INSERT_COLUMNS: [&str; 14] = [
    "owner_id",
    "title",
    "description",
    "number_of_bedrooms",
    "number_of_bathrooms",
    "parking_spaces",
    "cost_per_night",
    "thumbnail_photo_url",
    "cover_photo_url",
    "street",
    "country",
    "city",
    "province",
    "post_code",
];

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Stores the value and returns its placeholder, e.g. `$3`.
    fn push_param(&mut self, v: impl Into<PgBindValue>) -> String {
        self.params.push(v.into());
        format!("${}", self.params.len())
    }
}

/// SELECT user by exact email.
pub fn select_user_by_email(email: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(email);
    q.sql = format!("SELECT {} FROM users WHERE email = {} LIMIT 1", USER_COLUMNS, ph);
    q
}

/// SELECT user by primary key.
pub fn select_user_by_id(id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(id);
    q.sql = format!("SELECT {} FROM users WHERE id = {}", USER_COLUMNS, ph);
    q
}

/// INSERT user returning the stored row. Email uniqueness is left to the table constraint.
pub fn insert_user(user: &NewUser) -> QueryBuf {
    let mut q = QueryBuf::new();
    let name = q.push_param(user.name.as_str());
    let email = q.push_param(user.email.as_str());
    let password = q.push_param(user.password.as_str());
    q.sql = format!(
        "INSERT INTO users (name, email, password) VALUES ({}, {}, {}) RETURNING {}",
        name, email, password, USER_COLUMNS
    );
    q
}

/// Reservations of one guest, joined with the guest and the property.
pub fn select_reservations_for_guest(guest_id: i32, limit: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let guest = q.push_param(guest_id);
    let limit = q.push_param(limit);
    q.sql = format!(
        "SELECT reservations.id AS reservation_id, reservations.start_date, reservations.end_date, \
         reservations.guest_id, users.name AS guest_name, users.email AS guest_email, {} \
         FROM reservations \
         JOIN users ON users.id = reservations.guest_id \
         JOIN properties ON properties.id = reservations.property_id \
         WHERE reservations.guest_id = {} \
         LIMIT {}",
        PROPERTY_COLUMNS, guest, limit
    );
    q
}

/// Property search: properties joined with their reviews, grouped per property,
/// cheapest first. Which filters apply depends on `search.composition`; the limit
/// placeholder always comes last. Fails when a scaled price bound does not fit in `i64`.
pub fn select_properties(search: &PropertySearch, limit: i64) -> AppResult<QueryBuf> {
    let mut q = QueryBuf::new();
    let conditions = match search.composition {
        FilterComposition::Legacy => legacy_conditions(&mut q, search)?,
        FilterComposition::Independent => independent_conditions(&mut q, search)?,
    };
    let where_clause: String = conditions.iter().map(|c| format!(" AND {}", c)).collect();
    let limit = q.push_param(limit);
    q.sql = format!(
        "SELECT {}, avg(property_reviews.rating)::float8 AS average_rating \
         FROM properties \
         JOIN property_reviews ON properties.id = property_reviews.property_id \
         WHERE 1=1{} \
         GROUP BY properties.id \
         ORDER BY properties.cost_per_night \
         LIMIT {}",
        PROPERTY_COLUMNS, where_clause, limit
    );
    Ok(q)
}

fn city_pattern(city: &str) -> String {
    format!("%{}%", city)
}

fn scaled_price(field: &str, price: i64) -> AppResult<i64> {
    price.checked_mul(PRICE_SCALE).ok_or_else(|| {
        AppError::Validation(format!("{} {} is out of range", field, price))
    })
}

/// All four filters as one clause, else city alone, else nothing.
fn legacy_conditions(q: &mut QueryBuf, search: &PropertySearch) -> AppResult<Vec<String>> {
    Ok(match (
        search.city(),
        search.minimum_price(),
        search.maximum_price(),
        search.minimum_rating(),
    ) {
        (Some(city), Some(min), Some(max), Some(rating)) => {
            let min = scaled_price("minimum_price_per_night", min)?;
            let max = scaled_price("maximum_price_per_night", max)?;
            vec![
                format!("properties.city LIKE {}", q.push_param(city_pattern(city))),
                format!("properties.cost_per_night > {}", q.push_param(min)),
                format!("properties.cost_per_night < {}", q.push_param(max)),
                format!("property_reviews.rating > {}", q.push_param(rating)),
            ]
        }
        (Some(city), ..) => vec![format!(
            "properties.city LIKE {}",
            q.push_param(city_pattern(city))
        )],
        _ => Vec::new(),
    })
}

fn independent_conditions(q: &mut QueryBuf, search: &PropertySearch) -> AppResult<Vec<String>> {
    let mut conditions = Vec::new();
    if let Some(city) = search.city() {
        conditions.push(format!("properties.city LIKE {}", q.push_param(city_pattern(city))));
    }
    if let Some(min) = search.minimum_price() {
        let min = scaled_price("minimum_price_per_night", min)?;
        conditions.push(format!("properties.cost_per_night > {}", q.push_param(min)));
    }
    if let Some(max) = search.maximum_price() {
        let max = scaled_price("maximum_price_per_night", max)?;
        conditions.push(format!("properties.cost_per_night < {}", q.push_param(max)));
    }
    if let Some(rating) = search.minimum_rating() {
        conditions.push(format!("property_reviews.rating > {}", q.push_param(rating)));
    }
    Ok(conditions)
}

/// INSERT of the fourteen property columns. No RETURNING.
pub fn insert_property(p: &NewProperty) -> QueryBuf {
    let mut q = QueryBuf::new();
    let placeholders = vec![
        q.push_param(p.owner_id),
        q.push_param(p.title.as_str()),
        q.push_param(p.description.as_str()),
        q.push_param(p.number_of_bedrooms),
        q.push_param(p.number_of_bathrooms),
        q.push_param(p.parking_spaces),
        q.push_param(p.cost_per_night),
        q.push_param(p.thumbnail_photo_url.as_str()),
        q.push_param(p.cover_photo_url.as_str()),
        q.push_param(p.street.as_str()),
        q.push_param(p.country.as_str()),
        q.push_param(p.city.as_str()),
        q.push_param(p.province.as_str()),
        q.push_param(p.post_code.as_str()),
    ];
    q.sql = format!(
        "INSERT INTO properties ({}) VALUES ({})",
        PROPERTY_INSERT_COLUMNS.join(", "),
        placeholders.join(", ")
    );
    q
}

/// SELECT one property by primary key.
pub fn select_property_by_id(id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(id);
    q.sql = format!("SELECT {} FROM properties WHERE properties.id = {}", PROPERTY_COLUMNS, ph);
    q
}
