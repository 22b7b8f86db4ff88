use crate::{
    cli::telemetry,
    site::{
        self,
        hits::HitCounter,
        password::StoredPassword,
        rsvp::{LogRsvpStore, PgRsvpStore, RsvpStore},
        signing::SignedCookies,
        state::{SiteConfig, SiteState},
    },
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub cookie_key: SecretString,
    pub password_file: PathBuf,
    pub hits_file: PathBuf,
    pub static_dir: PathBuf,
    pub dsn: Option<SecretString>,
    pub google_api_key: Option<String>,
    pub event_date: NaiveDate,
    pub secure_cookies: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the signing key or password file is unusable, the
/// database can not be reached, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let cookies = SignedCookies::from_base64(args.cookie_key.expose_secret())
        .context("Invalid --cookie-key")?;

    let password = StoredPassword::load(&args.password_file)?;

    let hits = HitCounter::load(args.hits_file).await;

    let rsvp: Arc<dyn RsvpStore> = match &args.dsn {
        Some(dsn) => Arc::new(
            PgRsvpStore::connect(dsn.expose_secret())
                .await
                .context("Failed to connect to database")?,
        ),
        None => {
            info!("No DSN configured, RSVPs will only be logged");
            Arc::new(LogRsvpStore)
        }
    };

    let config = SiteConfig::new()
        .with_static_dir(args.static_dir)
        .with_google_api_key(args.google_api_key)
        .with_event_date(args.event_date)
        .with_secure_cookies(args.secure_cookies);

    let state = Arc::new(SiteState::new(config, cookies, password, hits, rsvp));

    let result = site::new(args.port, state).await;

    telemetry::shutdown_tracer();

    result
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("password_file", args.password_file.display().to_string()),
        ("hits_file", args.hits_file.display().to_string()),
        ("static_dir", args.static_dir.display().to_string()),
        (
            "dsn",
            args.dsn
                .as_ref()
                .map_or_else(|| "none".to_string(), |dsn| redact_dsn(dsn.expose_secret())),
        ),
        ("google_api_key_set", args.google_api_key.is_some().to_string()),
        ("event_date", args.event_date.to_string()),
        ("secure_cookies", args.secure_cookies.to_string()),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "eventsite {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
