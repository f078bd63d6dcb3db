use std::collections::BTreeMap;

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_BASE_API: &str = "https://min-api.cryptocompare.com";

/// Spot prices, news and market snapshots for crypto symbols.
///
/// `Ok(None)` means the upstream answered but has no data for the symbol;
/// `Err` means the request itself failed (transport or non-2xx status).
#[async_trait]
pub trait PriceApi: Send + Sync {
    /// Price of `symbol` in each of `currencies`. `None` when the first
    /// currency is missing from the response.
    async fn price(&self, symbol: &str, currencies: &[&str]) -> Result<Option<Quote>>;

    /// Latest headlines, newest first
    async fn news(&self) -> Result<Vec<NewsItem>>;

    /// Display-formatted market figures for `symbol` quoted in `currency`
    async fn market_snapshot(
        &self,
        symbol: &str,
        currency: &str,
    ) -> Result<Option<MarketSnapshot>>;
}

#[derive(Clone)]
pub struct PriceClient {
    client: Client,
    base_api: String,
}

impl PriceClient {
    pub fn new(base_api: String, api_key: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Apikey {key}"))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_api })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_api.trim_end_matches('/'), path)
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, Error> {
        let url = self.url(path);
        debug!(%url, ?query, "requesting");

        let body = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?
            .json()
            .await?;

        Ok(body)
    }
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[async_trait]
impl PriceApi for PriceClient {
    async fn price(&self, symbol: &str, currencies: &[&str]) -> Result<Option<Quote>> {
        let symbol = normalize(symbol);
        let tsyms = currencies.join(",");

        let body = self
            .get_json("/data/price", &[("fsym", symbol.as_str()), ("tsyms", tsyms.as_str())])
            .await?;

        Ok(parse_price(&symbol, currencies, &body))
    }

    async fn news(&self) -> Result<Vec<NewsItem>> {
        let body = self.get_json("/data/v2/news/", &[("lang", "EN")]).await?;
        parse_news(body)
    }

    async fn market_snapshot(
        &self,
        symbol: &str,
        currency: &str,
    ) -> Result<Option<MarketSnapshot>> {
        let symbol = normalize(symbol);

        let body = self
            .get_json(
                "/data/pricemultifull",
                &[("fsyms", symbol.as_str()), ("tsyms", currency)],
            )
            .await?;

        Ok(parse_market_snapshot(&symbol, currency, &body))
    }
}

//
// Match CryptoCompare min-api JSON
// https://developers.cryptocompare.com/documentation/legacy/Price/SingleSymbolPriceEndpoint
//
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub prices: BTreeMap<String, f64>,
}

impl Quote {
    pub fn get(&self, currency: &str) -> Option<f64> {
        self.prices.get(currency).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(rename = "Data", default)]
    data: Vec<NewsItem>,
}

/// Display strings exactly as the upstream formats them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarketSnapshot {
    #[serde(rename = "PRICE")]
    pub price: String,

    #[serde(rename = "CHANGEPCT24HOUR")]
    pub change_24h_pct: String,

    #[serde(rename = "MKTCAP")]
    pub market_cap: String,

    #[serde(rename = "VOLUME24HOURTO")]
    pub volume_24h: String,
}

fn parse_price(symbol: &str, currencies: &[&str], body: &Value) -> Option<Quote> {
    let first = currencies.first()?;
    body.get(*first)?.as_f64()?;

    let prices = currencies
        .iter()
        .filter_map(|c| body.get(*c).and_then(Value::as_f64).map(|p| (c.to_string(), p)))
        .collect();

    Some(Quote {
        symbol: symbol.to_string(),
        prices,
    })
}

fn parse_news(body: Value) -> Result<Vec<NewsItem>> {
    let res: NewsResponse = serde_json::from_value(body).context("decode news list")?;
    Ok(res.data)
}

fn parse_market_snapshot(symbol: &str, currency: &str, body: &Value) -> Option<MarketSnapshot> {
    let display = body.get("DISPLAY")?.get(symbol)?.get(currency)?;
    serde_json::from_value(display.clone()).ok()
}
