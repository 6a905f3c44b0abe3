mod book;
mod consistency;
mod lending;
mod record;
mod user;

pub use self::{book::*, consistency::*, lending::*, record::*, user::*};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// `200 OK` with the `{ success, data }` envelope.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Same envelope as [`Success`], answered with `201 Created`.
#[derive(Debug, Serialize)]
pub struct Created<T>(Success<T>);

impl<T> Created<T> {
    pub fn new(data: T) -> Self {
        Self(Success::new(data))
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct Message {
    success: bool,
    message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

impl IntoResponse for Message {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
