//! Site configuration and the shared server context handed to every handler.

use chrono::NaiveDate;
use std::{path::PathBuf, sync::Arc};

use super::{hits::HitCounter, password::StoredPassword, rsvp::RsvpStore, signing::SignedCookies};

const DEFAULT_STATIC_DIR: &str = "static";

/// 5 October 2018, the day the site counts down to unless configured otherwise.
pub const DEFAULT_EVENT_DATE: (i32, u32, u32) = (2018, 10, 5);

#[derive(Clone, Debug)]
pub struct SiteConfig {
    static_dir: PathBuf,
    google_api_key: Option<String>,
    event_date: NaiveDate,
    secure_cookies: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteConfig {
    #[must_use]
    pub fn new() -> Self {
        let (year, month, day) = DEFAULT_EVENT_DATE;
        Self {
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            google_api_key: None,
            event_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
            secure_cookies: false,
        }
    }

    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_google_api_key(mut self, key: Option<String>) -> Self {
        self.google_api_key = key.filter(|key| !key.is_empty());
        self
    }

    #[must_use]
    pub fn with_event_date(mut self, date: NaiveDate) -> Self {
        self.event_date = date;
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn static_dir(&self) -> &PathBuf {
        &self.static_dir
    }

    #[must_use]
    pub fn google_api_key(&self) -> Option<&str> {
        self.google_api_key.as_deref()
    }

    #[must_use]
    pub fn event_date(&self) -> NaiveDate {
        self.event_date
    }

    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    /// Whole days from `today` until the event, never negative.
    #[must_use]
    pub fn days_until_event(&self, today: NaiveDate) -> i64 {
        (self.event_date - today).num_days().max(0)
    }
}

/// Read-only secrets plus the hit counter and RSVP store.
pub struct SiteState {
    config: SiteConfig,
    cookies: SignedCookies,
    password: StoredPassword,
    hits: HitCounter,
    rsvp: Arc<dyn RsvpStore>,
}

impl SiteState {
    #[must_use]
    pub fn new(
        config: SiteConfig,
        cookies: SignedCookies,
        password: StoredPassword,
        hits: HitCounter,
        rsvp: Arc<dyn RsvpStore>,
    ) -> Self {
        Self {
            config,
            cookies,
            password,
            hits,
            rsvp,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn cookies(&self) -> &SignedCookies {
        &self.cookies
    }

    #[must_use]
    pub fn password(&self) -> &StoredPassword {
        &self.password
    }

    #[must_use]
    pub fn hits(&self) -> &HitCounter {
        &self.hits
    }

    #[must_use]
    pub fn rsvp(&self) -> &dyn RsvpStore {
        self.rsvp.as_ref()
    }
}
