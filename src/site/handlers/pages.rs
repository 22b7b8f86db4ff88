//! Content pages behind the session gate.

use axum::{
    http::{header::SET_COOKIE, HeaderMap, Uri},
    response::{Html, IntoResponse, Response},
};
use rand::seq::SliceRandom;
use std::{net::SocketAddr, path::Path, sync::Arc};
use tracing::{info, warn};
use url::form_urlencoded;

use super::local_redirect;
use crate::site::{
    alert::{Alert, ALERT_COOKIE_NAME},
    cookies::{clear_cookie, cookie_value, decode_text},
    csrf::CsrfToken,
    error::SiteError,
    page::Page,
    session::{access_granted, must_login},
    state::SiteState,
    templates::{render_page, PageContext},
};

pub const RSVP_COOKIE_NAME: &str = "rsvp";
const PICTURES_DIR: &str = "pictures";

/// Serve a named page, or bounce the visitor to the login page.
pub async fn show(
    page: Page,
    state: Arc<SiteState>,
    remote: Option<SocketAddr>,
    csrf: Option<CsrfToken>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let secure = state.config().secure_cookies();
    if !access_granted(page, &headers, state.cookies()) {
        return must_login(uri.path(), secure);
    }

    state.hits().record().await;

    let mut ctx = base_context(page, &state, &headers, csrf.as_ref());

    let alert_cookie = cookie_value(&headers, ALERT_COOKIE_NAME);
    ctx.alert = alert_cookie.as_deref().and_then(Alert::from_cookie_value);

    match page {
        Page::Login => ctx.redirect = local_redirect(query_redirect(&uri).as_deref()).to_string(),
        Page::Photos => ctx.photos = photos(state.config().static_dir()).await,
        _ => {}
    }

    info!(
        page = page.name(),
        remote = %remote.map_or_else(|| "unknown".to_string(), |addr| addr.to_string()),
        "viewing page"
    );

    let mut response = Html(render_page(&ctx)?).into_response();
    if alert_cookie.is_some() {
        // Alerts are shown once.
        response
            .headers_mut()
            .append(SET_COOKIE, clear_cookie(ALERT_COOKIE_NAME, secure)?);
    }

    Ok(response)
}

/// Context shared by every rendered page; alerts and page-specific data are
/// filled in by the caller.
pub(crate) fn base_context(
    page: Page,
    state: &SiteState,
    headers: &HeaderMap,
    csrf: Option<&CsrfToken>,
) -> PageContext {
    let today = chrono::Utc::now().date_naive();
    let mut ctx = PageContext::new(page);
    ctx.csrf_token = csrf.map(|token| token.as_str().to_string()).unwrap_or_default();
    ctx.rsvped = cookie_value(headers, RSVP_COOKIE_NAME)
        .map(|raw| decode_text(&raw))
        .filter(|text| !text.is_empty());
    ctx.google_api_key = state.config().google_api_key().map(ToString::to_string);
    ctx.days_left = state.config().days_until_event(today);
    ctx
}

fn query_redirect(uri: &Uri) -> Option<String> {
    form_urlencoded::parse(uri.query()?.as_bytes())
        .find(|(key, _)| key == "redirect")
        .map(|(_, value)| value.into_owned())
}

/// Picture URLs under `<static>/pictures`, shuffled on every call.
async fn photos(static_dir: &Path) -> Vec<String> {
    let dir = static_dir.join(PICTURES_DIR);
    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %dir.display(), "unable to list photos: {err}");
            return Vec::new();
        }
    };

    let mut photos = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if entry.file_type().await.is_ok_and(|kind| kind.is_file()) {
            photos.push(format!("/static/{PICTURES_DIR}/{name}"));
        }
    }

    photos.shuffle(&mut rand::thread_rng());
    photos
}
