use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::{
    db_interaction::bookings::cancel_booking,
    sharer::SharerId,
    utils::{get_pooled_connection, DbPool}
};

#[tracing::instrument(
    "Canceling booking",
    skip(pool)
)]
pub async fn cancel(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    let booking_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let booking = cancel_booking(conn, sharer.0, booking_id).await?;

    Ok(HttpResponse::Ok().json(booking))
}
