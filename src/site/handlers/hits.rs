use axum::{
    extract::Extension,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::site::state::SiteState;

/// Current page-view count as `N\n`.
pub async fn hits(Extension(state): Extension<Arc<SiteState>>) -> impl IntoResponse {
    let count = state.hits().current().await;
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("{count}\n"),
    )
}
