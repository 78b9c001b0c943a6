use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;

use crate::{
    db_interaction::items::insert_item,
    sharer::SharerId,
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct CreateItemBody{
    pub name: String,
    pub description: String,
    pub available: bool,
    #[serde(rename = "requestId")]
    pub request_id: Option<i64>
}

#[tracing::instrument(
    "Creating item",
    skip(pool, body)
)]
pub async fn create_item(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    body: web::Json<CreateItemBody>
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let body = body.into_inner();
    let item = insert_item(
        conn,
        sharer.0,
        body.name,
        body.description,
        body.available,
        body.request_id
    ).await?;

    Ok(HttpResponse::Ok().json(item))
}
