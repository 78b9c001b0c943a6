use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::{
    db_interaction::bookings::insert_booking,
    sharer::SharerId,
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct CreateBookingBody{
    #[serde(rename = "itemId")]
    pub item_id: i64,
    #[serde(rename = "start")]
    pub start_date: NaiveDateTime,
    #[serde(rename = "end")]
    pub end_date: NaiveDateTime
}

#[tracing::instrument(
    "Creating booking",
    skip(pool)
)]
pub async fn create_booking(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    body: web::Json<CreateBookingBody>
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let body = body.into_inner();
    let booking = insert_booking(
        conn,
        sharer.0,
        body.item_id,
        body.start_date,
        body.end_date
    ).await?;

    Ok(HttpResponse::Ok().json(booking))
}
