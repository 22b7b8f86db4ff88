//! Login and logout.
//!
//! Flow Overview: the session gate sends visitors to `/login?redirect=<path>`,
//! the login form posts the shared password back here, and on success the
//! signed `auth` cookie is issued before redirecting to `<path>`. A wrong
//! password never issues a cookie; it sets a one-shot alert and returns the
//! visitor to the page they came from.

use axum::{
    extract::{Extension, Form, Query},
    http::{
        header::{REFERER, SET_COOKIE},
        HeaderMap,
    },
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use url::Url;

use super::{found, local_redirect};
use crate::site::{
    alert::{Alert, ALERT_COOKIE_NAME},
    cookies::set_cookie,
    error::SiteError,
    page::Page,
    session::{clear_session_cookie, login_url, session_cookie},
    state::SiteState,
};

const INVALID_PASSWORD: &str = "Invalid password, please try again.";

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(rename = "Password", default)]
    password: String,
    #[serde(default)]
    redirect: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    #[serde(default)]
    redirect: Option<String>,
}

#[instrument(skip_all)]
pub async fn login(
    Extension(state): Extension<Arc<SiteState>>,
    Query(query): Query<RedirectQuery>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, SiteError> {
    let secure = state.config().secure_cookies();
    let target = form
        .redirect
        .filter(|target| !target.is_empty())
        .or(query.redirect);
    let target = local_redirect(target.as_deref()).to_string();

    let verifier = Arc::clone(&state);
    let candidate = form.password;
    let valid =
        tokio::task::spawn_blocking(move || verifier.password().verify(&candidate)).await?;

    if !valid {
        info!("login rejected");
        let alert = Alert::danger(INVALID_PASSWORD).to_cookie_value();
        let mut response = found(&referer_path(&headers).unwrap_or_else(|| login_url(&target)))?;
        response
            .headers_mut()
            .append(SET_COOKIE, set_cookie(ALERT_COOKIE_NAME, &alert, None, secure)?);
        return Ok(response);
    }

    info!("login accepted");
    let mut response = found(&target)?;
    response
        .headers_mut()
        .append(SET_COOKIE, session_cookie(state.cookies(), secure)?);
    Ok(response)
}

pub async fn logout(Extension(state): Extension<Arc<SiteState>>) -> Result<Response, SiteError> {
    let mut response = found(Page::Login.path())?;
    response.headers_mut().append(
        SET_COOKIE,
        clear_session_cookie(state.config().secure_cookies())?,
    );
    Ok(response)
}

/// Path and query of the `Referer`, so a failed login lands back on this site.
fn referer_path(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(REFERER)?.to_str().ok()?;
    if referer.starts_with('/') {
        return Some(local_redirect(Some(referer)).to_string());
    }
    let url = Url::parse(referer).ok()?;
    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }
    Some(local_redirect(Some(&path)).to_string())
}
