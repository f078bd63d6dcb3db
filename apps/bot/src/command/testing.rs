//! In-memory stand-ins for the subscriber store and price API.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use buddy::{MarketSnapshot, NewsItem, PriceApi, Quote, Subscriber, SubscriberStore};
use chrono::{TimeZone, Utc};

use crate::Data;

pub const ADMIN_ROLE: &str = "Emailora";

pub fn subscriber(name: &str, email: &str, millis: i64) -> Subscriber {
    Subscriber {
        name: name.to_string(),
        email: email.to_string(),
        created_at: Utc.timestamp_millis_opt(millis).unwrap(),
    }
}

pub fn data(store: FakeStore, prices: FakePrices) -> Data {
    Data {
        store: Arc::new(store),
        prices: Arc::new(prices),
        admin_role: ADMIN_ROLE.to_string(),
        mention: "<@42>".to_string(),
    }
}

#[derive(Clone, Default)]
pub struct FakeStore {
    subscribers: Vec<Subscriber>,
    fail: bool,
    reads: Arc<AtomicUsize>,
}

impl FakeStore {
    pub fn with(subscribers: Vec<Subscriber>) -> Self {
        Self {
            subscribers,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn read(&self) -> Result<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriberStore for FakeStore {
    async fn count(&self) -> Result<u64> {
        self.read()?;
        Ok(self.subscribers.len() as u64)
    }

    async fn latest(&self) -> Result<Option<Subscriber>> {
        self.read()?;
        Ok(self.subscribers.iter().max_by_key(|s| s.created_at).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>> {
        self.read()?;
        Ok(self.subscribers.iter().find(|s| s.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<Subscriber>> {
        self.read()?;
        Ok(self.subscribers.clone())
    }
}

/// `Err(String)` stands for a failed request.
pub type Outcome<T> = Result<Option<T>, String>;

#[derive(Clone)]
pub struct FakePrices {
    pub quote: Outcome<Quote>,
    pub news: Result<Vec<NewsItem>, String>,
    pub snapshot: Outcome<MarketSnapshot>,
    pub(crate) requested: Arc<Mutex<Vec<String>>>,
}

impl Default for FakePrices {
    fn default() -> Self {
        Self {
            quote: Ok(None),
            news: Ok(Vec::new()),
            snapshot: Ok(None),
            requested: Arc::default(),
        }
    }
}

impl FakePrices {
    /// Symbols (and currencies) asked for, in call order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    fn record(&self, what: String) {
        self.requested.lock().unwrap().push(what);
    }
}

#[async_trait]
impl PriceApi for FakePrices {
    async fn price(&self, symbol: &str, currencies: &[&str]) -> Result<Option<Quote>> {
        self.record(format!("{symbol}:{}", currencies.join(",")));
        self.quote.clone().map_err(|e| anyhow!(e))
    }

    async fn news(&self) -> Result<Vec<NewsItem>> {
        self.record("news".to_string());
        self.news.clone().map_err(|e| anyhow!(e))
    }

    async fn market_snapshot(
        &self,
        symbol: &str,
        currency: &str,
    ) -> Result<Option<MarketSnapshot>> {
        self.record(format!("{symbol}:{currency}"));
        self.snapshot.clone().map_err(|e| anyhow!(e))
    }
}
