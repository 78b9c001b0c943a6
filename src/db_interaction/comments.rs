use std::{error::Error, fmt::Debug};

use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use serde::Serialize;
use thiserror::Error;

use crate::{
    db_interaction::{items::find_item, users::find_user},
    models::{Comment, NewComment},
    schema::{bookings, comments},
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection}
};

#[derive(Serialize, Debug)]
pub struct CommentDto{
    pub id: i64,
    pub text: String,
    pub author: i64,
    pub item: i64,
    pub created: chrono::NaiveDateTime
}

impl From<Comment> for CommentDto{
    fn from(comment: Comment) -> Self{
        CommentDto{
            id: comment.id,
            text: comment.text,
            author: comment.author_id,
            item: comment.item_id,
            created: comment.created
        }
    }
}

pub fn comments_for_item(
    conn: &mut DbConnection,
    item_id: i64
) -> Result<Vec<Comment>, diesel::result::Error>{
    comments::table
        .filter(comments::item_id.eq(item_id))
        .order(comments::created.asc())
        .load::<Comment>(conn)
}

#[derive(Error)]
pub enum CommentInsertError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find user with id {0}")]
    UserNotFound(i64),
    #[error("Failed to find item with id {0}")]
    ItemNotFound(i64),
    #[error("User {0} has no finished booking of item {1}, commenting is not allowed")]
    NoFinishedBooking(i64, i64)
}

impl Debug for CommentInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for CommentInsertError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            CommentInsertError::UserNotFound(_) | CommentInsertError::ItemNotFound(_) =>
                HttpResponse::NotFound().json(serde_json::json!({"notFound": self.to_string()})),
            CommentInsertError::NoFinishedBooking(_, _) =>
                HttpResponse::BadRequest().json(serde_json::json!({"error validation": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Inserting comment",
    skip(conn, text)
)]
pub async fn insert_comment(
    mut conn: DbConnection,
    user_id: i64,
    item_id: i64,
    text: String
) -> Result<CommentDto, CommentInsertError>{
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Comment, CommentInsertError, _>(|conn| {
            let author = find_user(conn, user_id)?
                .ok_or(CommentInsertError::UserNotFound(user_id))?;
            let item = find_item(conn, item_id)?
                .ok_or(CommentInsertError::ItemNotFound(item_id))?;

            let now = Utc::now().naive_utc();

            // Only a booker whose approved booking already ended may comment
            let finished_booking = bookings::table
                .filter(bookings::booker_id.eq(author.id))
                .filter(bookings::item_id.eq(item.id))
                .filter(bookings::status.eq("APPROVED"))
                .filter(bookings::end_date.le(now))
                .select(bookings::id)
                .first::<i64>(conn)
                .optional()?;

            if finished_booking.is_none() {
                return Err(CommentInsertError::NoFinishedBooking(user_id, item_id));
            }

            let new_comment = NewComment{
                text,
                author_id: author.id,
                item_id: item.id,
                created: now
            };

            let comment = diesel::insert_into(comments::table)
                .values(&new_comment)
                .get_result::<Comment>(conn)?;

            Ok(comment)
        })
    })
    .await??;

    Ok(res.into())
}
