use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError}, web, HttpResponse};
use serde::Deserialize;

use crate::{
    db_interaction::bookings::{bookings_by_state, get_booking, owner_bookings_by_state},
    models::BookingState,
    sharer::SharerId,
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct StateQuery{
    pub state: Option<String>
}

impl StateQuery{
    fn parse(&self) -> Result<BookingState, actix_web::Error>{
        let raw = self.state.as_deref().unwrap_or("ALL");

        BookingState::from(raw).ok_or_else(|| ErrorBadRequest(
            serde_json::json!({"error": format!("Unknown state: {}", raw)})
        ))
    }
}

#[tracing::instrument(
    "Getting booking by id",
    skip(pool)
)]
pub async fn get_booking_by_id(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    let booking_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let booking = get_booking(conn, sharer.0, booking_id).await?;

    Ok(HttpResponse::Ok().json(booking))
}

#[tracing::instrument(
    "Listing bookings of the caller",
    skip(pool)
)]
pub async fn get_bookings_by_state(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    query: web::Query<StateQuery>
) -> Result<HttpResponse, actix_web::Error>{
    let state = query.parse()?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let bookings = bookings_by_state(conn, sharer.0, state).await?;

    Ok(HttpResponse::Ok().json(bookings))
}

#[tracing::instrument(
    "Listing bookings of the caller's items",
    skip(pool)
)]
pub async fn get_owner_bookings(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    query: web::Query<StateQuery>
) -> Result<HttpResponse, actix_web::Error>{
    let state = query.parse()?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let bookings = owner_bookings_by_state(conn, sharer.0, state).await?;

    Ok(HttpResponse::Ok().json(bookings))
}
