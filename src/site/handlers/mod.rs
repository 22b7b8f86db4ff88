pub mod health;
pub use self::health::health;

pub mod hits;
pub use self::hits::hits;

pub mod login;
pub use self::login::{login, logout};

pub mod pages;
pub use self::pages::show;

pub mod rsvp;
pub use self::rsvp::submit as rsvp;

// common functions for the handlers
use axum::{
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use super::error::SiteError;
use super::page::Page;

/// `302 Found` to `location`.
pub(crate) fn found(location: &str) -> Result<Response, SiteError> {
    let location = HeaderValue::from_str(location)?;
    Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response())
}

/// Keep redirects on this site: only `/path` style targets are honoured.
pub(crate) fn local_redirect(target: Option<&str>) -> &str {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => Page::Index.path(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_redirect_rejects_foreign_targets() {
        assert_eq!(local_redirect(Some("/photos")), "/photos");
        assert_eq!(local_redirect(Some("/rsvp?x=1")), "/rsvp?x=1");
        assert_eq!(local_redirect(Some("https://evil.example")), "/");
        assert_eq!(local_redirect(Some("//evil.example")), "/");
        assert_eq!(local_redirect(Some("/\\evil.example")), "/");
        assert_eq!(local_redirect(Some("")), "/");
        assert_eq!(local_redirect(None), "/");
    }

    #[test]
    fn found_sets_location() {
        let response = found("/photos").unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/photos");
    }
}
