//! Response construction.
//!
//! # Design Decisions
//! - Redirects carry only a `Location` header and an empty body
//! - A destination that is not a valid header value is a server error, not a
//!   silent fall-through

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Redirect to `destination` with `status`.
pub fn redirect(status: StatusCode, destination: &str) -> Response {
    match HeaderValue::from_str(destination) {
        Ok(location) => (status, [(header::LOCATION, location)], Body::empty()).into_response(),
        Err(e) => {
            tracing::error!(destination = %destination, error = %e, "Invalid redirect destination");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Default response when no rule matches.
pub fn not_found(body: &str) -> Response {
    (StatusCode::NOT_FOUND, body.to_owned()).into_response()
}
