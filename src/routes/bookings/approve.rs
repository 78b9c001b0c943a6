use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;

use crate::{
    db_interaction::bookings::approve_booking,
    sharer::SharerId,
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct ApproveQuery{
    pub approved: bool
}

#[tracing::instrument(
    "Approving or rejecting booking",
    skip(pool)
)]
pub async fn approve(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    path: web::Path<i64>,
    query: web::Query<ApproveQuery>
) -> Result<HttpResponse, actix_web::Error>{
    let booking_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let booking = approve_booking(conn, sharer.0, booking_id, query.approved).await?;

    Ok(HttpResponse::Ok().json(booking))
}
