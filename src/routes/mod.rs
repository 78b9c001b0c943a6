pub mod health_check;
pub mod users;
pub mod items;
pub mod bookings;
pub mod requests;

pub use health_check::health_check;
