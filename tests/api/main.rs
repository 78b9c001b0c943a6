mod helpers;

mod items;
mod requests;
mod gateway;
