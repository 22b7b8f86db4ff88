//! Double-submit CSRF guard.
//!
//! Every visitor gets a random token in the `csrf_token` cookie. Safe requests
//! pass through (minting the cookie when it is missing); anything else must
//! repeat the cookie's token in the `X-CSRF-Token` header or the `csrf_token`
//! form field, or it is refused with 400.

use axum::{
    body::{to_bytes, Body},
    extract::{Extension, Request},
    http::{
        header::{CONTENT_TYPE, SET_COOKIE},
        Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{error, warn};
use url::form_urlencoded;

use super::{
    cookies::{cookie_value, set_cookie},
    state::SiteState,
};

pub const CSRF_COOKIE_NAME: &str = "csrf_token";
pub const CSRF_FORM_FIELD: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrf-token";

const TOKEN_BYTES: usize = 32;
const MAX_FORM_BYTES: usize = 64 * 1024;
const COOKIE_MAX_AGE_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Token for the current visitor, available to handlers via request extensions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CsrfToken(String);

impl CsrfToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fresh random token, URL-safe base64.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    Base64UrlUnpadded::encode_string(&bytes)
}

fn well_formed(token: &str) -> bool {
    Base64UrlUnpadded::decode_vec(token).is_ok_and(|bytes| bytes.len() == TOKEN_BYTES)
}

fn tokens_match(submitted: &str, expected: &str) -> bool {
    submitted.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

fn form_token(body: &[u8]) -> Option<String> {
    form_urlencoded::parse(body)
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value.into_owned())
}

fn reject(reason: &str) -> Response {
    warn!("CSRF check failed: {reason}");
    (StatusCode::BAD_REQUEST, "Bad Request").into_response()
}

/// Middleware enforcing the CSRF token on state-changing requests.
pub async fn protect(
    Extension(state): Extension<Arc<SiteState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = cookie_value(request.headers(), CSRF_COOKIE_NAME).filter(|t| well_formed(t));

    if is_safe(request.method()) {
        let (token, fresh) = match existing {
            Some(token) => (token, false),
            None => (generate_token(), true),
        };
        request.extensions_mut().insert(CsrfToken(token.clone()));

        let mut response = next.run(request).await;
        if fresh {
            match set_cookie(
                CSRF_COOKIE_NAME,
                &token,
                Some(COOKIE_MAX_AGE_SECONDS),
                state.config().secure_cookies(),
            ) {
                Ok(cookie) => {
                    response.headers_mut().append(SET_COOKIE, cookie);
                }
                Err(err) => error!("Failed to build CSRF cookie: {err}"),
            }
        }
        return response;
    }

    let Some(expected) = existing else {
        return reject("missing token cookie");
    };

    let header_token = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let mut request = match header_token {
        Some(submitted) => {
            if !tokens_match(&submitted, &expected) {
                return reject("header token mismatch");
            }
            request
        }
        None => {
            if !is_form(&request) {
                return reject("no token submitted");
            }
            let (parts, body) = request.into_parts();
            let Ok(bytes) = to_bytes(body, MAX_FORM_BYTES).await else {
                return reject("form body unreadable or too large");
            };
            if !form_token(&bytes).is_some_and(|submitted| tokens_match(&submitted, &expected)) {
                return reject("form token mismatch");
            }
            Request::from_parts(parts, Body::from(bytes))
        }
    };

    request.extensions_mut().insert(CsrfToken(expected));
    next.run(request).await
}
