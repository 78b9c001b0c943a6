use chrono::NaiveDateTime;
use diesel::prelude::{Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::schema::{bookings, comments, items, requests, users};

#[derive(Queryable, Serialize, Debug, Clone)]
#[diesel(table_name = users)]
pub struct User{
    pub id: i64,
    pub name: String,
    pub email: String
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser{
    pub name: String,
    pub email: String
}

#[derive(Queryable, Debug, Clone)]
#[diesel(table_name = items)]
pub struct Item{
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>
}

#[derive(Insertable, Debug)]
#[diesel(table_name = items)]
pub struct NewItem{
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>
}

#[derive(Queryable, Debug, Clone)]
#[diesel(table_name = bookings)]
pub struct Booking{
    pub id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: String
}

#[derive(Insertable, Debug)]
#[diesel(table_name = bookings)]
pub struct NewBooking{
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: String
}

#[derive(Queryable, Debug, Clone)]
#[diesel(table_name = comments)]
pub struct Comment{
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub item_id: i64,
    pub created: NaiveDateTime
}

#[derive(Insertable, Debug)]
#[diesel(table_name = comments)]
pub struct NewComment{
    pub text: String,
    pub author_id: i64,
    pub item_id: i64,
    pub created: NaiveDateTime
}

#[derive(Queryable, Debug, Clone)]
#[diesel(table_name = requests)]
pub struct ItemRequest{
    pub id: i64,
    pub description: String,
    pub requester_id: i64,
    pub created: NaiveDateTime
}

#[derive(Insertable, Debug)]
#[diesel(table_name = requests)]
pub struct NewItemRequest{
    pub description: String,
    pub requester_id: i64,
    pub created: NaiveDateTime
}

// Lifecycle of a booking, stored as text in the bookings table
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus{
    #[serde(rename = "WAITING")]
    Waiting,
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "REJECTED")]
    Rejected,
    #[serde(rename = "CANCELED")]
    Canceled
}

impl BookingStatus{
    pub fn as_str(&self) -> &'static str{
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED"
        }
    }
}

// Filter applied when listing bookings, parsed case-insensitively
// from the `state` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState{
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected
}

impl BookingState{
    pub fn from(state: &str) -> Option<Self>{
        match state.to_uppercase().as_str() {
            "ALL" => Some(BookingState::All),
            "CURRENT" => Some(BookingState::Current),
            "PAST" => Some(BookingState::Past),
            "FUTURE" => Some(BookingState::Future),
            "WAITING" => Some(BookingState::Waiting),
            "REJECTED" => Some(BookingState::Rejected),
            _ => None
        }
    }

    pub fn as_str(&self) -> &'static str{
        match self {
            BookingState::All => "ALL",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED"
        }
    }
}
