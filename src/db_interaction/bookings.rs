use std::{error::Error, fmt::Debug};

use actix_web::{HttpResponse, ResponseError};
use chrono::{NaiveDateTime, Utc};
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use serde::Serialize;
use thiserror::Error;

use crate::{
    db_interaction::{items::{find_item, ItemDto}, users::find_user},
    models::{Booking, BookingState, BookingStatus, NewBooking, User},
    schema::{bookings, items, users},
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection}
};

// Booking as embedded in item views
#[derive(Serialize, Debug)]
pub struct BookingShortDto{
    pub id: i64,
    #[serde(rename = "start")]
    pub start_date: NaiveDateTime,
    #[serde(rename = "end")]
    pub end_date: NaiveDateTime,
    #[serde(rename = "itemId")]
    pub item_id: i64,
    pub booker: i64,
    pub status: String
}

impl From<Booking> for BookingShortDto{
    fn from(booking: Booking) -> Self{
        BookingShortDto{
            id: booking.id,
            start_date: booking.start_date,
            end_date: booking.end_date,
            item_id: booking.item_id,
            booker: booking.booker_id,
            status: booking.status
        }
    }
}

// Booking as returned by the /bookings endpoints, with the item and
// the booker resolved
#[derive(Serialize, Debug)]
pub struct BookingResponseDto{
    pub id: i64,
    #[serde(rename = "start")]
    pub start_date: NaiveDateTime,
    #[serde(rename = "end")]
    pub end_date: NaiveDateTime,
    pub item: ItemDto,
    pub booker: User,
    pub status: String
}

pub fn find_booking(
    conn: &mut DbConnection,
    booking_id: i64
) -> Result<Option<Booking>, diesel::result::Error>{
    bookings::table
        .find(booking_id)
        .first::<Booking>(conn)
        .optional()
}

// Latest approved booking of the item that already ended
pub fn find_last_booking(
    conn: &mut DbConnection,
    item_id: i64,
    now: NaiveDateTime
) -> Result<Option<Booking>, diesel::result::Error>{
    bookings::table
        .filter(bookings::item_id.eq(item_id))
        .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
        .filter(bookings::end_date.lt(now))
        .order(bookings::end_date.desc())
        .first::<Booking>(conn)
        .optional()
}

// Earliest approved booking of the item that has not started yet
pub fn find_next_booking(
    conn: &mut DbConnection,
    item_id: i64,
    now: NaiveDateTime
) -> Result<Option<Booking>, diesel::result::Error>{
    bookings::table
        .filter(bookings::item_id.eq(item_id))
        .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
        .filter(bookings::start_date.ge(now))
        .order(bookings::start_date.asc())
        .first::<Booking>(conn)
        .optional()
}

fn to_response(
    conn: &mut DbConnection,
    booking: Booking
) -> Result<BookingResponseDto, diesel::result::Error>{
    let item = items::table
        .find(booking.item_id)
        .first::<crate::models::Item>(conn)?;

    let booker = users::table
        .find(booking.booker_id)
        .first::<User>(conn)?;

    Ok(BookingResponseDto{
        id: booking.id,
        start_date: booking.start_date,
        end_date: booking.end_date,
        item: item.into(),
        booker,
        status: booking.status
    })
}

fn load_booker_bookings(
    conn: &mut DbConnection,
    user_id: i64,
    state: BookingState,
    now: NaiveDateTime
) -> Result<Vec<Booking>, diesel::result::Error>{
    let mut query = bookings::table
        .filter(bookings::booker_id.eq(user_id))
        .order(bookings::start_date.desc())
        .into_boxed();

    query = match state {
        BookingState::All => query,
        BookingState::Waiting => query.filter(bookings::status.eq(BookingStatus::Waiting.as_str())),
        BookingState::Rejected => query.filter(bookings::status.eq(BookingStatus::Rejected.as_str())),
        BookingState::Current => query
            .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
            .filter(bookings::start_date.le(now))
            .filter(bookings::end_date.ge(now)),
        BookingState::Past => query
            .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
            .filter(bookings::end_date.le(now)),
        BookingState::Future => query
            .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
            .filter(bookings::start_date.ge(now))
    };

    query.load::<Booking>(conn)
}

fn load_owner_bookings(
    conn: &mut DbConnection,
    owner_id: i64,
    state: BookingState,
    now: NaiveDateTime
) -> Result<Vec<Booking>, diesel::result::Error>{
    let mut query = bookings::table
        .inner_join(items::table)
        .filter(items::owner_id.eq(owner_id))
        .select(bookings::all_columns)
        .order(bookings::start_date.desc())
        .into_boxed();

    query = match state {
        BookingState::All => query,
        BookingState::Waiting => query.filter(bookings::status.eq(BookingStatus::Waiting.as_str())),
        BookingState::Rejected => query.filter(bookings::status.eq(BookingStatus::Rejected.as_str())),
        BookingState::Current => query
            .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
            .filter(bookings::start_date.le(now))
            .filter(bookings::end_date.ge(now)),
        BookingState::Past => query
            .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
            .filter(bookings::end_date.le(now)),
        BookingState::Future => query
            .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
            .filter(bookings::start_date.ge(now))
    };

    query.load::<Booking>(conn)
}

#[derive(Error)]
pub enum BookingCreateError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find user with id {0}")]
    UserNotFound(i64),
    #[error("Failed to find item with id {0}")]
    ItemNotFound(i64),
    #[error("Item with id {0} is not available for booking")]
    ItemUnavailable(i64)
}

impl Debug for BookingCreateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for BookingCreateError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            BookingCreateError::UserNotFound(_) | BookingCreateError::ItemNotFound(_) =>
                HttpResponse::NotFound().json(serde_json::json!({"notFound": self.to_string()})),
            BookingCreateError::ItemUnavailable(_) =>
                HttpResponse::BadRequest().json(serde_json::json!({"error validation": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Inserting booking",
    skip(conn)
)]
pub async fn insert_booking(
    mut conn: DbConnection,
    booker_id: i64,
    item_id: i64,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime
) -> Result<BookingResponseDto, BookingCreateError>{
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<BookingResponseDto, BookingCreateError, _>(|conn| {
            let booker = find_user(conn, booker_id)?
                .ok_or(BookingCreateError::UserNotFound(booker_id))?;
            let item = find_item(conn, item_id)?
                .ok_or(BookingCreateError::ItemNotFound(item_id))?;

            if !item.available {
                return Err(BookingCreateError::ItemUnavailable(item_id));
            }

            let new_booking = NewBooking{
                start_date,
                end_date,
                item_id: item.id,
                booker_id: booker.id,
                status: BookingStatus::Waiting.as_str().to_string()
            };

            let booking = diesel::insert_into(bookings::table)
                .values(&new_booking)
                .get_result::<Booking>(conn)?;

            Ok(BookingResponseDto{
                id: booking.id,
                start_date: booking.start_date,
                end_date: booking.end_date,
                item: item.into(),
                booker,
                status: booking.status
            })
        })
    })
    .await??;

    Ok(res)
}

#[derive(Error)]
pub enum BookingApproveError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find booking with id {0}")]
    NotFound(i64),
    #[error("Status of booking {0} has already been decided")]
    AlreadyDecided(i64),
    #[error("User {0} does not own the booked item and cannot change the booking status")]
    NotOwner(i64)
}

impl Debug for BookingApproveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for BookingApproveError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            BookingApproveError::NotFound(_) =>
                HttpResponse::NotFound().json(serde_json::json!({"notFound": self.to_string()})),
            BookingApproveError::AlreadyDecided(_) | BookingApproveError::NotOwner(_) =>
                HttpResponse::BadRequest().json(serde_json::json!({"error validation": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Approving or rejecting booking",
    skip(conn)
)]
pub async fn approve_booking(
    mut conn: DbConnection,
    user_id: i64,
    booking_id: i64,
    approved: bool
) -> Result<BookingResponseDto, BookingApproveError>{
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<BookingResponseDto, BookingApproveError, _>(|conn| {
            let booking = find_booking(conn, booking_id)?
                .ok_or(BookingApproveError::NotFound(booking_id))?;

            if booking.status != BookingStatus::Waiting.as_str() {
                return Err(BookingApproveError::AlreadyDecided(booking_id));
            }

            let item = items::table
                .find(booking.item_id)
                .first::<crate::models::Item>(conn)?;

            if item.owner_id != user_id {
                return Err(BookingApproveError::NotOwner(user_id));
            }

            let status = if approved {
                BookingStatus::Approved
            } else {
                BookingStatus::Rejected
            };

            let updated = diesel::update(bookings::table.find(booking_id))
                .set(bookings::status.eq(status.as_str()))
                .get_result::<Booking>(conn)?;

            Ok(to_response(conn, updated)?)
        })
    })
    .await??;

    Ok(res)
}

#[derive(Error)]
pub enum BookingCancelError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find booking with id {0}")]
    NotFound(i64),
    #[error("User {0} is not the booker and cannot cancel the booking")]
    NotBooker(i64)
}

impl Debug for BookingCancelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for BookingCancelError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            BookingCancelError::NotFound(_) =>
                HttpResponse::NotFound().json(serde_json::json!({"notFound": self.to_string()})),
            BookingCancelError::NotBooker(_) =>
                HttpResponse::BadRequest().json(serde_json::json!({"error validation": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Canceling booking",
    skip(conn)
)]
pub async fn cancel_booking(
    mut conn: DbConnection,
    user_id: i64,
    booking_id: i64
) -> Result<BookingResponseDto, BookingCancelError>{
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<BookingResponseDto, BookingCancelError, _>(|conn| {
            let booking = find_booking(conn, booking_id)?
                .ok_or(BookingCancelError::NotFound(booking_id))?;

            if booking.booker_id != user_id {
                return Err(BookingCancelError::NotBooker(user_id));
            }

            let updated = diesel::update(bookings::table.find(booking_id))
                .set(bookings::status.eq(BookingStatus::Canceled.as_str()))
                .get_result::<Booking>(conn)?;

            Ok(to_response(conn, updated)?)
        })
    })
    .await??;

    Ok(res)
}

#[derive(Error)]
pub enum BookingFetchError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find booking with id {0}")]
    NotFound(i64),
    #[error("User {0} is neither the booker nor the item owner")]
    AccessDenied(i64)
}

impl Debug for BookingFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for BookingFetchError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            BookingFetchError::NotFound(_) =>
                HttpResponse::NotFound().json(serde_json::json!({"notFound": self.to_string()})),
            BookingFetchError::AccessDenied(_) =>
                HttpResponse::BadRequest().json(serde_json::json!({"error validation": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Loading booking by id",
    skip(conn)
)]
pub async fn get_booking(
    mut conn: DbConnection,
    user_id: i64,
    booking_id: i64
) -> Result<BookingResponseDto, BookingFetchError>{
    let res = spawn_blocking_with_tracing(move || {
        let booking = find_booking(&mut conn, booking_id)?
            .ok_or(BookingFetchError::NotFound(booking_id))?;

        let item = items::table
            .find(booking.item_id)
            .first::<crate::models::Item>(&mut conn)?;

        if booking.booker_id != user_id && item.owner_id != user_id {
            return Err(BookingFetchError::AccessDenied(user_id));
        }

        Ok(to_response(&mut conn, booking)?)
    })
    .await??;

    Ok(res)
}

#[derive(Error)]
pub enum BookingListError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find user with id {0}")]
    UserNotFound(i64)
}

impl Debug for BookingListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for BookingListError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            BookingListError::UserNotFound(_) =>
                HttpResponse::NotFound().json(serde_json::json!({"notFound": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Listing bookings of a booker",
    skip(conn)
)]
pub async fn bookings_by_state(
    mut conn: DbConnection,
    user_id: i64,
    state: BookingState
) -> Result<Vec<BookingResponseDto>, BookingListError>{
    let res = spawn_blocking_with_tracing(move || {
        find_user(&mut conn, user_id)?
            .ok_or(BookingListError::UserNotFound(user_id))?;

        let now = Utc::now().naive_utc();
        let bookings = load_booker_bookings(&mut conn, user_id, state, now)?;

        let mut ret = Vec::with_capacity(bookings.len());
        for booking in bookings {
            ret.push(to_response(&mut conn, booking)?);
        }

        Ok::<Vec<BookingResponseDto>, BookingListError>(ret)
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Listing bookings of all items of an owner",
    skip(conn)
)]
pub async fn owner_bookings_by_state(
    mut conn: DbConnection,
    owner_id: i64,
    state: BookingState
) -> Result<Vec<BookingResponseDto>, BookingListError>{
    let res = spawn_blocking_with_tracing(move || {
        find_user(&mut conn, owner_id)?
            .ok_or(BookingListError::UserNotFound(owner_id))?;

        let now = Utc::now().naive_utc();
        let bookings = load_owner_bookings(&mut conn, owner_id, state, now)?;

        let mut ret = Vec::with_capacity(bookings.len());
        for booking in bookings {
            ret.push(to_response(&mut conn, booking)?);
        }

        Ok::<Vec<BookingResponseDto>, BookingListError>(ret)
    })
    .await??;

    Ok(res)
}
