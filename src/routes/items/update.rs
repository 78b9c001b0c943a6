use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;

use crate::{
    db_interaction::items::{update_item, ItemChanges},
    sharer::SharerId,
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct UpdateItemBody{
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>
}

#[tracing::instrument(
    "Updating item",
    skip(pool, body)
)]
pub async fn patch_item(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    path: web::Path<i64>,
    body: web::Json<UpdateItemBody>
) -> Result<HttpResponse, actix_web::Error>{
    let item_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let body = body.into_inner();
    let item = update_item(
        conn,
        sharer.0,
        item_id,
        ItemChanges{
            name: body.name,
            description: body.description,
            available: body.available
        }
    ).await?;

    Ok(HttpResponse::Ok().json(item))
}
