use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;

use crate::{
    db_interaction::users::{update_user, UserChanges},
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct UpdateUserBody{
    pub name: Option<String>,
    pub email: Option<String>
}

#[tracing::instrument(
    "Updating user",
    skip(pool, body)
)]
pub async fn patch_user(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<UpdateUserBody>
) -> Result<HttpResponse, actix_web::Error>{
    let user_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let body = body.into_inner();
    let user = update_user(
        conn,
        user_id,
        UserChanges{ name: body.name, email: body.email }
    ).await?;

    Ok(HttpResponse::Ok().json(user))
}
