//! RSVP form submission.

use axum::{
    extract::{Extension, Form},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use super::pages::{base_context, RSVP_COOKIE_NAME};
use crate::site::{
    cookies::{encode_text, set_cookie},
    csrf::CsrfToken,
    error::SiteError,
    page::Page,
    rsvp::Rsvp,
    state::SiteState,
    templates::{render_rsvp_error, render_rsvp_submitted},
};

const MISSING_NAME: &str = "Please tell us your full name.";
const STORE_FAILED: &str = "Something went wrong on our end. Please try again in a little while.";

#[derive(Debug, Deserialize)]
pub struct RsvpForm {
    #[serde(rename = "FullName", default)]
    full_name: String,
    #[serde(rename = "Attending", default)]
    attending: String,
    #[serde(rename = "PlusOne", default)]
    plus_one: String,
    #[serde(rename = "PlusOneName", default)]
    plus_one_name: String,
}

impl From<RsvpForm> for Rsvp {
    fn from(form: RsvpForm) -> Self {
        Self {
            full_name: form.full_name.trim().to_string(),
            attending: form.attending == "yes",
            plus_one: form.plus_one == "yes",
            plus_one_name: form.plus_one_name.trim().to_string(),
        }
    }
}

pub async fn submit(
    Extension(state): Extension<Arc<SiteState>>,
    csrf: Option<Extension<CsrfToken>>,
    headers: HeaderMap,
    Form(form): Form<RsvpForm>,
) -> Result<Response, SiteError> {
    let csrf = csrf.map(|Extension(token)| token);
    let mut ctx = base_context(Page::Rsvp, &state, &headers, csrf.as_ref());
    let rsvp = Rsvp::from(form);

    if rsvp.full_name.is_empty() {
        let body = render_rsvp_error(&ctx, MISSING_NAME)?;
        return Ok((StatusCode::BAD_REQUEST, Html(body)).into_response());
    }

    if let Err(err) = state.rsvp().record(&rsvp).await {
        error!("Failed to record rsvp: {err:#}");
        let body = render_rsvp_error(&ctx, STORE_FAILED)?;
        return Ok((StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response());
    }

    info!(full_name = %rsvp.full_name, attending = rsvp.attending, "rsvp saved");

    let confirmation = rsvp.confirmation();
    ctx.rsvped = Some(confirmation.clone());

    let mut response = Html(render_rsvp_submitted(&ctx)?).into_response();
    response.headers_mut().append(
        SET_COOKIE,
        set_cookie(
            RSVP_COOKIE_NAME,
            &encode_text(&confirmation),
            None,
            state.config().secure_cookies(),
        )?,
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_flags_are_yes_only() {
        let rsvp = Rsvp::from(RsvpForm {
            full_name: "  Jane Doe ".to_string(),
            attending: "yes".to_string(),
            plus_one: "no".to_string(),
            plus_one_name: String::new(),
        });
        assert_eq!(rsvp.full_name, "Jane Doe");
        assert!(rsvp.attending);
        assert!(!rsvp.plus_one);

        let rsvp = Rsvp::from(RsvpForm {
            full_name: "Jane".to_string(),
            attending: "Yes please".to_string(),
            plus_one: "yes".to_string(),
            plus_one_name: "John".to_string(),
        });
        assert!(!rsvp.attending);
        assert!(rsvp.plus_one);
    }
}
