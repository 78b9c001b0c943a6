use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::{
    db_interaction::items::{get_item_details, get_user_items},
    sharer::SharerId,
    utils::{get_pooled_connection, DbPool}
};

#[tracing::instrument(
    "Getting item by id",
    skip(pool)
)]
pub async fn get_item(
    pool: web::Data<DbPool>,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    let item_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let item = get_item_details(conn, item_id).await?;

    Ok(HttpResponse::Ok().json(item))
}

#[tracing::instrument(
    "Listing items of the caller",
    skip(pool)
)]
pub async fn get_own_items(
    pool: web::Data<DbPool>,
    sharer: SharerId
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let items = get_user_items(conn, sharer.0).await?;

    Ok(HttpResponse::Ok().json(items))
}
