//! Response construction helpers.
//!
//! # Responsibilities
//! - Build redirect responses with a `Location` header
//! - Build plain-text responses for the diagnostic renderer and errors
//!
//! # Design Decisions
//! - Redirect targets are written verbatim (no re-encoding of the query)
//! - Invalid header values surface as `http::Error`, never a panic

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;

/// Redirect to `location` with the given status.
pub fn redirect(location: &str, status: StatusCode) -> Result<Response, axum::http::Error> {
    Response::builder()
        .status(status)
        .header(header::LOCATION, location)
        .body(Body::empty())
}

/// `301 Moved Permanently` to `location`.
pub fn permanent_redirect(location: &str) -> Result<Response, axum::http::Error> {
    redirect(location, StatusCode::MOVED_PERMANENTLY)
}

/// Plain text response.
pub fn text(status: StatusCode, body: impl Into<String>) -> Response {
    let mut response = Response::new(Body::from(body.into()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Target of a redirect response, if any.
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permanent_redirect() {
        let response = permanent_redirect("/foo/something?some=thing").unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), Some("/foo/something?some=thing"));
    }

    #[test]
    fn test_invalid_location() {
        assert!(redirect("/bad\nheader", StatusCode::FOUND).is_err());
    }

    #[test]
    fn test_text() {
        let response = text(StatusCode::OK, "hello");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }
}
