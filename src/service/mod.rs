//! Query-layer services. Each call borrows the injected pool for one round trip.

mod exec;
mod properties;
mod reservations;
mod users;
pub use properties::PropertyService;
pub use reservations::ReservationService;
pub use users::UserService;
