pub mod get;
pub mod post;
pub mod approve;
pub mod cancel;
