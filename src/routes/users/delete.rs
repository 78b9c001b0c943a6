use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::{
    db_interaction::users::delete_user,
    utils::{get_pooled_connection, DbPool}
};

#[tracing::instrument(
    "Deleting user",
    skip(pool)
)]
pub async fn remove_user(
    pool: web::Data<DbPool>,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    let user_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    delete_user(conn, user_id).await?;

    Ok(HttpResponse::Ok().finish())
}
