//! The single fault boundary for request handling.
//!
//! Handler errors and panics are logged and answered with a bare 500; nothing
//! about the failure reaches the client.

use axum::{
    http::{header::InvalidHeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::any::Any;
use thiserror::Error;
use tracing::error;

use super::signing::CookieError;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
    #[error("invalid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
    #[error("signed cookie error: {0}")]
    Cookie(#[from] CookieError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        error!("request failed: {self}");
        internal_server_error()
    }
}

/// Response for panics caught by `CatchPanicLayer`.
pub(crate) fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("panic: {message}");
    internal_server_error()
}

fn internal_server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::INTERNAL_SERVER_ERROR
            .canonical_reason()
            .unwrap_or("Internal Server Error"),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        routing::get,
        Router,
    };
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    #[tokio::test]
    async fn site_error_hides_details() -> anyhow::Result<()> {
        let response = SiteError::Cookie(CookieError::Key).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&body[..], b"Internal Server Error");
        Ok(())
    }

    #[tokio::test]
    async fn panicking_handler_becomes_500() -> anyhow::Result<()> {
        async fn boom() -> &'static str {
            panic!("template exploded")
        }

        let app = Router::new()
            .route("/boom", get(boom))
            .route("/fine", get(|| async { "fine" }))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/boom").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert!(!String::from_utf8_lossy(&body).contains("exploded"));

        let response = app
            .oneshot(Request::builder().uri("/fine").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }
}
