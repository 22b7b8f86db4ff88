//! RSVP records and where they go.
//!
//! With a DSN configured rows are inserted into the `rsvp` table
//! (`sql/schema.sql`); without one submissions are only logged.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rsvp {
    pub full_name: String,
    pub attending: bool,
    pub plus_one: bool,
    pub plus_one_name: String,
}

impl Rsvp {
    /// Text stored in the `rsvp` cookie, e.g. `Jane Doe (+John Doe)`.
    #[must_use]
    pub fn confirmation(&self) -> String {
        if self.plus_one {
            format!("{} (+{})", self.full_name, self.plus_one_name)
        } else {
            self.full_name.clone()
        }
    }
}

#[async_trait]
pub trait RsvpStore: Send + Sync {
    /// Persist one submission.
    async fn record(&self, rsvp: &Rsvp) -> Result<()>;
}

/// Store that only logs submissions.
#[derive(Clone, Debug)]
pub struct LogRsvpStore;

#[async_trait]
impl RsvpStore for LogRsvpStore {
    async fn record(&self, rsvp: &Rsvp) -> Result<()> {
        info!(
            full_name = %rsvp.full_name,
            attending = rsvp.attending,
            plus_one = rsvp.plus_one,
            plus_one_name = %rsvp.plus_one_name,
            "rsvp received"
        );
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct PgRsvpStore {
    pool: PgPool,
}

impl PgRsvpStore {
    /// Connect to the RSVP database.
    ///
    /// # Errors
    /// Returns an error if the database is unreachable.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RsvpStore for PgRsvpStore {
    #[instrument(skip(self))]
    async fn record(&self, rsvp: &Rsvp) -> Result<()> {
        sqlx::query(
            "INSERT INTO rsvp (full_name, attending, plus_one, plus_one_full_name) VALUES ($1, $2, $3, $4)",
        )
        .bind(&rsvp.full_name)
        .bind(rsvp.attending)
        .bind(rsvp.plus_one)
        .bind(&rsvp.plus_one_name)
        .execute(&self.pool)
        .await
        .context("Failed to insert rsvp")?;

        Ok(())
    }
}
