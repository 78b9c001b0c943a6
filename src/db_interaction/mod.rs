pub mod users;
pub mod items;
pub mod bookings;
pub mod comments;
pub mod requests;
