pub mod users;
pub mod items;
pub mod bookings;
pub mod requests;

use actix_web::error::ErrorBadRequest;

pub(crate) fn validation_error(e: validator::ValidationErrors) -> actix_web::Error {
    ErrorBadRequest(serde_json::json!({"error": e.to_string()}))
}
