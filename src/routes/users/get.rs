use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::{
    db_interaction::users::{get_all_users, get_user_by_id},
    utils::{get_pooled_connection, DbPool}
};

#[tracing::instrument(
    "Listing users",
    skip(pool)
)]
pub async fn get_users(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let users = get_all_users(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(users))
}

#[tracing::instrument(
    "Getting user by id",
    skip(pool)
)]
pub async fn get_user(
    pool: web::Data<DbPool>,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    let user_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let user = get_user_by_id(conn, user_id).await?;

    Ok(HttpResponse::Ok().json(user))
}
