//! Cookie header parsing and `Set-Cookie` construction.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use url::form_urlencoded;

/// Find the value of the first cookie called `name` in the request headers.
pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let key = parts.next()?.trim();
            let val = parts.next()?.trim();
            (key == name).then(|| val.to_string())
        })
}

/// Build a path-wide `HttpOnly` cookie.
///
/// Without `max_age` the cookie lives until the browser closes.
pub(crate) fn set_cookie(
    name: &str,
    value: &str,
    max_age: Option<i64>,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax");
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build a cookie that tells the browser to drop `name`.
pub(crate) fn clear_cookie(name: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    set_cookie(name, "", Some(0), secure)
}

/// Percent-encode free text so it is a valid cookie value.
pub(crate) fn encode_text(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

/// Reverse [`encode_text`].
pub(crate) fn decode_text(raw: &str) -> String {
    // `byte_serialize` escapes `&` and `=`, so the whole value parses as one key.
    form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(text, _)| text.into_owned())
        .unwrap_or_default()
}
