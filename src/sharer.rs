use actix_web::{error::ErrorBadRequest, FromRequest};
use futures_util::future::{ready, Ready};

pub const SHARER_HEADER: &str = "X-Sharer-User-Id";

// Extractor for the id of the user issuing the request, carried in
// the X-Sharer-User-Id header
#[derive(Debug, Clone, Copy)]
pub struct SharerId(pub i64);

impl FromRequest for SharerId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let header = match req.headers().get(SHARER_HEADER) {
            Some(header) => header,
            None => return ready(Err(ErrorBadRequest(
                serde_json::json!({"error": "Missing X-Sharer-User-Id header"})
            )))
        };

        let user_id = header.to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<i64>().ok());

        match user_id {
            Some(id) if id > 0 => ready(Ok(SharerId(id))),
            _ => ready(Err(ErrorBadRequest(
                serde_json::json!({"error": "X-Sharer-User-Id must be a positive integer"})
            )))
        }
    }
}
