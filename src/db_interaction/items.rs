use std::{error::Error, fmt::Debug};

use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use diesel::{BoolExpressionMethods, Connection, ExpressionMethods, OptionalExtension, PgTextExpressionMethods, QueryDsl, RunQueryDsl};
use serde::Serialize;
use thiserror::Error;

use crate::{
    db_interaction::{
        bookings::{find_last_booking, find_next_booking, BookingShortDto},
        comments::{comments_for_item, CommentDto},
        users::find_user
    },
    models::{Item, NewItem},
    schema::{items, requests},
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection}
};

#[derive(Serialize, Debug)]
pub struct ItemDto{
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    #[serde(rename = "requestId")]
    pub request_id: Option<i64>
}

impl From<Item> for ItemDto{
    fn from(item: Item) -> Self{
        ItemDto{
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id
        }
    }
}

// Owner view of an item, with comments and the closest bookings
#[derive(Serialize, Debug)]
pub struct ItemDetailsDto{
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner: i64,
    pub comments: Vec<CommentDto>,
    #[serde(rename = "lastBooking")]
    pub last_booking: Option<BookingShortDto>,
    #[serde(rename = "nextBooking")]
    pub next_booking: Option<BookingShortDto>
}

pub fn find_item(conn: &mut DbConnection, item_id: i64) -> Result<Option<Item>, diesel::result::Error>{
    items::table
        .find(item_id)
        .first::<Item>(conn)
        .optional()
}

fn item_details(
    conn: &mut DbConnection,
    item: Item
) -> Result<ItemDetailsDto, diesel::result::Error>{
    let now = Utc::now().naive_utc();

    let comments = comments_for_item(conn, item.id)?
        .into_iter()
        .map(CommentDto::from)
        .collect();

    let last_booking = find_last_booking(conn, item.id, now)?;
    let next_booking = find_next_booking(conn, item.id, now)?;

    Ok(ItemDetailsDto{
        id: item.id,
        name: item.name,
        description: item.description,
        available: item.available,
        owner: item.owner_id,
        comments,
        last_booking: last_booking.map(BookingShortDto::from),
        next_booking: next_booking.map(BookingShortDto::from)
    })
}

#[derive(Error)]
pub enum ItemInsertError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find user with id {0}")]
    OwnerNotFound(i64),
    #[error("Failed to find request with id {0}")]
    RequestNotFound(i64)
}

impl Debug for ItemInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for ItemInsertError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            ItemInsertError::OwnerNotFound(_) | ItemInsertError::RequestNotFound(_) =>
                HttpResponse::NotFound().json(serde_json::json!({"notFound": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Inserting item",
    skip(conn, name, description)
)]
pub async fn insert_item(
    mut conn: DbConnection,
    owner_id: i64,
    name: String,
    description: String,
    available: bool,
    request_id: Option<i64>
) -> Result<ItemDto, ItemInsertError>{
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Item, ItemInsertError, _>(|conn| {
            let owner = find_user(conn, owner_id)?
                .ok_or(ItemInsertError::OwnerNotFound(owner_id))?;

            if let Some(request_id) = request_id {
                requests::table
                    .find(request_id)
                    .select(requests::id)
                    .first::<i64>(conn)
                    .optional()?
                    .ok_or(ItemInsertError::RequestNotFound(request_id))?;
            }

            let new_item = NewItem{
                name,
                description,
                available,
                owner_id: owner.id,
                request_id
            };

            let item = diesel::insert_into(items::table)
                .values(&new_item)
                .get_result::<Item>(conn)?;

            Ok(item)
        })
    })
    .await??;

    Ok(res.into())
}

#[derive(Error)]
pub enum ItemUpdateError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find user with id {0}")]
    UserNotFound(i64),
    #[error("Failed to find item with id {0}")]
    ItemNotFound(i64),
    #[error("User {0} does not own the item and cannot edit it")]
    NotOwner(i64)
}

impl Debug for ItemUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for ItemUpdateError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            ItemUpdateError::UserNotFound(_) | ItemUpdateError::ItemNotFound(_) =>
                HttpResponse::NotFound().json(serde_json::json!({"notFound": self.to_string()})),
            ItemUpdateError::NotOwner(_) =>
                HttpResponse::BadRequest().json(serde_json::json!({"error validation": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

// Changes requested by PATCH /items/{itemId}, absent fields stay untouched
#[derive(Debug, Default)]
pub struct ItemChanges{
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>
}

#[tracing::instrument(
    "Updating item",
    skip(conn, changes)
)]
pub async fn update_item(
    mut conn: DbConnection,
    user_id: i64,
    item_id: i64,
    changes: ItemChanges
) -> Result<ItemDto, ItemUpdateError>{
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Item, ItemUpdateError, _>(|conn| {
            find_user(conn, user_id)?
                .ok_or(ItemUpdateError::UserNotFound(user_id))?;

            let old_item = find_item(conn, item_id)?
                .ok_or(ItemUpdateError::ItemNotFound(item_id))?;

            if old_item.owner_id != user_id {
                return Err(ItemUpdateError::NotOwner(user_id));
            }

            let name = changes.name.unwrap_or(old_item.name);
            let description = changes.description.unwrap_or(old_item.description);
            let available = changes.available.unwrap_or(old_item.available);

            let item = diesel::update(items::table.find(item_id))
                .set((
                    items::name.eq(name),
                    items::description.eq(description),
                    items::available.eq(available)
                ))
                .get_result::<Item>(conn)?;

            Ok(item)
        })
    })
    .await??;

    Ok(res.into())
}

#[derive(Error)]
pub enum ItemFetchError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find item with id {0}")]
    ItemNotFound(i64),
    #[error("Failed to find user with id {0}")]
    UserNotFound(i64)
}

impl Debug for ItemFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for ItemFetchError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            ItemFetchError::ItemNotFound(_) | ItemFetchError::UserNotFound(_) =>
                HttpResponse::NotFound().json(serde_json::json!({"notFound": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Loading item with comments and bookings",
    skip(conn)
)]
pub async fn get_item_details(
    mut conn: DbConnection,
    item_id: i64
) -> Result<ItemDetailsDto, ItemFetchError>{
    let res = spawn_blocking_with_tracing(move || {
        let item = find_item(&mut conn, item_id)?
            .ok_or(ItemFetchError::ItemNotFound(item_id))?;

        Ok::<ItemDetailsDto, ItemFetchError>(item_details(&mut conn, item)?)
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Loading all items of an owner",
    skip(conn)
)]
pub async fn get_user_items(
    mut conn: DbConnection,
    user_id: i64
) -> Result<Vec<ItemDetailsDto>, ItemFetchError>{
    let res = spawn_blocking_with_tracing(move || {
        find_user(&mut conn, user_id)?
            .ok_or(ItemFetchError::UserNotFound(user_id))?;

        let items = items::table
            .filter(items::owner_id.eq(user_id))
            .order(items::id.asc())
            .load::<Item>(&mut conn)?;

        let mut ret = Vec::with_capacity(items.len());
        for item in items {
            ret.push(item_details(&mut conn, item)?);
        }

        Ok::<Vec<ItemDetailsDto>, ItemFetchError>(ret)
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Searching available items",
    skip(conn)
)]
pub async fn search_items(
    mut conn: DbConnection,
    user_id: i64,
    text: String
) -> Result<Vec<ItemDto>, ItemFetchError>{
    let res = spawn_blocking_with_tracing(move || {
        find_user(&mut conn, user_id)?
            .ok_or(ItemFetchError::UserNotFound(user_id))?;

        if text.is_empty() {
            return Ok::<Vec<ItemDto>, ItemFetchError>(Vec::new());
        }

        let pattern = format!("%{}%", text);
        let found = items::table
            .filter(items::available.eq(true))
            .filter(
                items::name.ilike(pattern.clone())
                    .or(items::description.ilike(pattern))
            )
            .order(items::id.asc())
            .load::<Item>(&mut conn)?;

        Ok(found.into_iter().map(ItemDto::from).collect())
    })
    .await??;

    Ok(res)
}
