//! # Eventsite
//!
//! `eventsite` serves a small event website behind a single shared password.
//!
//! ## Access Model
//!
//! Every content page requires a signed `auth` cookie carrying the literal
//! session marker `authenticated`. Requests without it are redirected to
//! `/login?redirect=<path>`; a successful login issues the cookie and sends the
//! visitor back to where they started. There are no user accounts, roles or
//! server-side sessions.
//!
//! - **Signed cookies:** HMAC-SHA256 over the cookie name, an issue timestamp
//!   and the value. Any decode failure is treated as "not logged in".
//! - **CSRF:** state-changing requests must echo the `csrf_token` cookie in a
//!   form field or header.
//! - **Faults:** handler errors and panics collapse into a generic `500`.
//!
//! ## Persistence
//!
//! RSVP submissions go to `PostgreSQL` when a DSN is configured and are only
//! logged otherwise. The page-view counter lives in a plain text file that is
//! rewritten on every hit.

pub mod cli;
pub mod site;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
