pub mod get;
pub mod post;
pub mod update;
pub mod search;
pub mod comment;
