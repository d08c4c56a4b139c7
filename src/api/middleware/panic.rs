//! Converts handler panics into `INTERNAL_SERVER_ERROR` responses

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::api::types::ApiError;

/// Response factory for `tower_http::catch_panic::CatchPanicLayer`
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(err.as_ref());
    tracing::error!(panic = %message, "Handler panicked");

    ApiError::internal(message).into_response()
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}
