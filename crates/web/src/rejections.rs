//! Custom rejections and the recovery handler turning them into pages.

use maud::html;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::views;

/// Something on our side failed; the browser gets a plain 500 page.
#[derive(Debug)]
pub struct InternalServerError;

impl warp::reject::Reject for InternalServerError {}

/// Map rejections to rendered error pages.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Page not found")
    } else if err.find::<InternalServerError>().is_some() {
        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        tracing::error!("unhandled rejection: {err:?}");
        (StatusCode::BAD_REQUEST, "Bad request")
    };

    let page = views::page(
        message,
        html! {
            h1 { (message) }
            p { a href="/" { "Back to start" } }
        },
    );
    Ok(warp::reply::with_status(
        warp::reply::html(page.into_string()),
        status,
    ))
}
