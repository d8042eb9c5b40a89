//! Records read from and written to the LightBnB tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Stored as provided by the caller.
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
}

/// The fourteen insertable property columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub number_of_bedrooms: i32,
    pub number_of_bathrooms: i32,
    pub parking_spaces: i32,
    pub cost_per_night: i32,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub street: String,
    pub country: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

/// A property row from the search, with the mean of its review ratings.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PropertyListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: Option<f64>,
}

/// A reservation joined with its guest and the reserved property.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ReservationDetails {
    pub reservation_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guest_id: i32,
    pub guest_name: String,
    pub guest_email: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
}

/// How the search filters are combined into the WHERE clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterComposition {
    /// All four filters together, or city alone, or nothing.
    #[default]
    Legacy,
    /// Every present filter adds its own condition.
    Independent,
}

/// Optional search filters. Prices are whole currency units and are scaled by
/// [`PRICE_SCALE`](crate::sql::PRICE_SCALE) before comparison with `cost_per_night`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySearch {
    pub city: Option<String>,
    pub minimum_price_per_night: Option<i64>,
    pub maximum_price_per_night: Option<i64>,
    pub minimum_rating: Option<f64>,
    #[serde(default)]
    pub composition: FilterComposition,
}

impl PropertySearch {
    /// City filter, if set to a non-empty value.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.is_empty())
    }

    /// Lower price bound, if set to a non-zero value.
    pub fn minimum_price(&self) -> Option<i64> {
        self.minimum_price_per_night.filter(|p| *p != 0)
    }

    /// Upper price bound, if set to a non-zero value.
    pub fn maximum_price(&self) -> Option<i64> {
        self.maximum_price_per_night.filter(|p| *p != 0)
    }

    /// Rating floor, if set to a non-zero value.
    pub fn minimum_rating(&self) -> Option<f64> {
        self.minimum_rating.filter(|r| *r != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_zero_filters_count_as_absent() {
        let search = PropertySearch {
            city: Some(String::new()),
            minimum_price_per_night: Some(0),
            maximum_price_per_night: Some(0),
            minimum_rating: Some(0.0),
            ..Default::default()
        };
        assert_eq!(search.city(), None);
        assert_eq!(search.minimum_price(), None);
        assert_eq!(search.maximum_price(), None);
        assert_eq!(search.minimum_rating(), None);
    }

    #[test]
    fn composition_defaults_to_legacy_when_omitted() {
        let search: PropertySearch = serde_json::from_str(r#"{"city":"Toronto"}"#).unwrap();
        assert_eq!(search.composition, FilterComposition::Legacy);
        assert_eq!(search.city(), Some("Toronto"));
    }

    #[test]
    fn user_password_is_not_serialized() {
        let user = User {
            id: 1,
            name: "Devin Sanders".into(),
            email: "tristanjacobs@gmail.com".into(),
            password: "secret".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "tristanjacobs@gmail.com");
    }
}
