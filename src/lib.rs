//! LightBnB data access: users, properties and reservations on PostgreSQL.

pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod sql;
pub mod store;

pub use config::DbConfig;
pub use error::{AppError, AppResult, ConfigError, ErrorKind, OptionExt};
pub use models::{
    FilterComposition, NewProperty, NewUser, Property, PropertyListing, PropertySearch,
    ReservationDetails, User,
};
pub use service::{PropertyService, ReservationService, UserService};
pub use store::{connect, ensure_database_exists, ensure_schema};
