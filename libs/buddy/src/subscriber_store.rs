use std::time::Duration;

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions};
use tracing::{debug, info};

/// A newsletter signup. Rows are written by the signup flow, never by the bot.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Subscriber {
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Read-only view over the newsletter subscribers.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Total number of subscribers
    async fn count(&self) -> Result<u64>;

    /// Subscriber with the most recent `created_at`, if any
    async fn latest(&self) -> Result<Option<Subscriber>>;

    /// Exact match on email
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>>;

    /// Every subscriber, in storage order
    async fn list(&self) -> Result<Vec<Subscriber>>;
}

// `createdAt` is a timestamp without time zone holding UTC.
const SELECT_SUBSCRIBER: &str =
    r#"SELECT name, email, "createdAt" AT TIME ZONE 'UTC' AS created_at FROM newsletter"#;

#[derive(Clone)]
pub struct PgSubscriberStore {
    pool: PgPool,
}

impl PgSubscriberStore {
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .context("connect to subscriber database")?;

        info!("subscriber store connected");
        Ok(Self { pool })
    }
}

#[async_trait]
impl SubscriberStore for PgSubscriberStore {
    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM newsletter")
            .fetch_one(&self.pool)
            .await?;

        debug!(count, "counted subscribers");
        Ok(count.max(0) as u64)
    }

    async fn latest(&self) -> Result<Option<Subscriber>> {
        let sql = format!(r#"{SELECT_SUBSCRIBER} ORDER BY "createdAt" DESC LIMIT 1"#);

        sqlx::query_as::<_, Subscriber>(&sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::from)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>> {
        let sql = format!("{SELECT_SUBSCRIBER} WHERE email = $1");

        sqlx::query_as::<_, Subscriber>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::from)
    }

    async fn list(&self) -> Result<Vec<Subscriber>> {
        let rows = sqlx::query_as::<_, Subscriber>(SELECT_SUBSCRIBER)
            .fetch_all(&self.pool)
            .await?;

        debug!(rows = rows.len(), "listed subscribers");
        Ok(rows)
    }
}
