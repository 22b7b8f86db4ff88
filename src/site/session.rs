//! Session gate.
//!
//! Flow Overview: read the `auth` cookie, verify its signature, and grant access
//! only when it decodes to the literal session marker. Every failure mode
//! (missing, forged, expired, wrong value) is the same `Unauthenticated`
//! outcome; callers never see the decode error.

use axum::{
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::Response,
};
use tracing::debug;
use url::form_urlencoded;

use super::{
    cookies::{clear_cookie, cookie_value, set_cookie},
    error::SiteError,
    handlers::found,
    page::Page,
    signing::SignedCookies,
};

pub const AUTH_COOKIE_NAME: &str = "auth";
/// The only value an `auth` cookie ever carries.
pub const SESSION_MARKER: &str = "authenticated";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Session {
    Authenticated,
    Unauthenticated,
}

impl Session {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, cookies: &SignedCookies) -> Self {
        let Some(raw) = cookie_value(headers, AUTH_COOKIE_NAME) else {
            return Self::Unauthenticated;
        };
        match cookies.decode(AUTH_COOKIE_NAME, &raw) {
            Ok(value) if value == SESSION_MARKER => Self::Authenticated,
            Ok(_) => Self::Unauthenticated,
            Err(err) => {
                debug!("ignoring auth cookie: {err}");
                Self::Unauthenticated
            }
        }
    }
}

/// Whether `page` may be served for this request.
#[must_use]
pub fn access_granted(page: Page, headers: &HeaderMap, cookies: &SignedCookies) -> bool {
    !page.requires_session()
        || Session::from_headers(headers, cookies) == Session::Authenticated
}

/// Login page URL that returns the visitor to `path` afterwards.
#[must_use]
pub fn login_url(path: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect", path)
        .finish();
    format!("{}?{query}", Page::Login.path())
}

/// Drop any stale `auth` cookie and send the visitor to the login page.
///
/// # Errors
/// Returns an error if the response headers can not be built.
pub fn must_login(path: &str, secure: bool) -> Result<Response, SiteError> {
    let mut response = found(&login_url(path))?;
    response
        .headers_mut()
        .append(SET_COOKIE, clear_cookie(AUTH_COOKIE_NAME, secure)?);
    Ok(response)
}

/// Signed `auth` cookie without `Max-Age`, so it ends with the browser session.
///
/// # Errors
/// Returns an error if signing or header construction fails.
pub fn session_cookie(cookies: &SignedCookies, secure: bool) -> Result<HeaderValue, SiteError> {
    let token = cookies.encode(AUTH_COOKIE_NAME, SESSION_MARKER)?;
    Ok(set_cookie(AUTH_COOKIE_NAME, &token, None, secure)?)
}

/// Clear the `auth` cookie.
///
/// # Errors
/// Returns an error if the header can not be built.
pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, SiteError> {
    Ok(clear_cookie(AUTH_COOKIE_NAME, secure)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, header::LOCATION, StatusCode};

    fn codec() -> SignedCookies {
        SignedCookies::new(vec![3u8; 32]).unwrap()
    }

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    fn token_from(set_cookie: &HeaderValue) -> String {
        let value = set_cookie.to_str().unwrap();
        let pair = value.split(';').next().unwrap();
        pair.trim_start_matches("auth=").to_string()
    }

    #[test]
    fn issued_cookie_is_accepted() {
        let codec = codec();
        let cookie = session_cookie(&codec, false).unwrap();
        assert!(!cookie.to_str().unwrap().contains("Max-Age"));

        let headers = headers_with_cookie(&format!("auth={}", token_from(&cookie)));
        assert_eq!(
            Session::from_headers(&headers, &codec),
            Session::Authenticated
        );
        assert!(access_granted(Page::Photos, &headers, &codec));
    }

    #[test]
    fn missing_or_forged_cookie_is_unauthenticated() {
        let codec = codec();
        assert_eq!(
            Session::from_headers(&HeaderMap::new(), &codec),
            Session::Unauthenticated
        );
        assert_eq!(
            Session::from_headers(&headers_with_cookie("auth=authenticated"), &codec),
            Session::Unauthenticated
        );
    }

    #[test]
    fn signed_value_other_than_marker_is_unauthenticated() {
        let codec = codec();
        let token = codec.encode(AUTH_COOKIE_NAME, "admin").unwrap();
        let headers = headers_with_cookie(&format!("auth={token}"));
        assert_eq!(
            Session::from_headers(&headers, &codec),
            Session::Unauthenticated
        );
    }

    #[test]
    fn login_page_is_always_granted() {
        let codec = codec();
        assert!(access_granted(Page::Login, &HeaderMap::new(), &codec));
        assert!(!access_granted(Page::Index, &HeaderMap::new(), &codec));
    }

    #[test]
    fn must_login_redirects_back_to_requested_path() {
        let response = must_login("/photos", false).unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/login?redirect=%2Fphotos"
        );
        assert_eq!(
            response.headers().get(SET_COOKIE).unwrap(),
            "auth=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
        );
    }
}
