use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::{
    db_interaction::requests::{get_request_by_id, requests_by_user, requests_of_others},
    sharer::SharerId,
    utils::{get_pooled_connection, DbPool}
};

#[tracing::instrument(
    "Listing requests of the caller",
    skip(pool)
)]
pub async fn get_own_requests(
    pool: web::Data<DbPool>,
    sharer: SharerId
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let requests = requests_by_user(conn, sharer.0).await?;

    Ok(HttpResponse::Ok().json(requests))
}

#[tracing::instrument(
    "Listing requests of other users",
    skip(pool)
)]
pub async fn get_other_requests(
    pool: web::Data<DbPool>,
    sharer: SharerId
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let requests = requests_of_others(conn, sharer.0).await?;

    Ok(HttpResponse::Ok().json(requests))
}

#[tracing::instrument(
    "Getting request by id",
    skip(pool)
)]
pub async fn get_request(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    let request_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let request = get_request_by_id(conn, sharer.0, request_id).await?;

    Ok(HttpResponse::Ok().json(request))
}
