#![forbid(unsafe_code)]

pub mod cookie;
pub mod rejections;
pub mod routes;
pub mod views;

pub use cookie::CookieCodec;
pub use routes::{AppState, routes};
