//! Map parsed command-line arguments to an [`Action`].

use crate::cli::{
    actions::{password, server, Action},
    commands::tools::{CMD_GENERATE_KEY, CMD_HASH_PASSWORD},
};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use secrecy::SecretString;
use std::path::PathBuf;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((CMD_GENERATE_KEY, _)) => Ok(Action::GenerateKey),
        Some((CMD_HASH_PASSWORD, sub)) => {
            let password = sub
                .get_one::<String>("password")
                .cloned()
                .context("missing required argument: <password>")?;
            let output = sub
                .get_one::<String>("output")
                .map_or_else(|| PathBuf::from("password"), PathBuf::from);
            Ok(Action::HashPassword(password::Args {
                password: SecretString::from(password),
                output,
            }))
        }
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => server_args(matches).map(Action::Server),
    }
}

fn server_args(matches: &clap::ArgMatches) -> Result<server::Args> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let cookie_key = matches
        .get_one::<String>("cookie-key")
        .cloned()
        .context("missing required argument: --cookie-key")?;
    let path = |id: &str, default: &str| {
        matches
            .get_one::<String>(id)
            .map_or_else(|| PathBuf::from(default), PathBuf::from)
    };
    let event_date = matches
        .get_one::<NaiveDate>("event-date")
        .copied()
        .context("missing required argument: --event-date")?;

    Ok(server::Args {
        port,
        cookie_key: SecretString::from(cookie_key),
        password_file: path("password-file", "password"),
        hits_file: path("hits-file", "hits"),
        static_dir: path("static-dir", "static"),
        dsn: matches
            .get_one::<String>("dsn")
            .filter(|dsn| !dsn.is_empty())
            .cloned()
            .map(SecretString::from),
        google_api_key: matches.get_one::<String>("google-api-key").cloned(),
        event_date,
        secure_cookies: matches.get_flag("secure-cookies"),
    })
}
