mod price_client;
mod subscriber_store;

pub mod export;

pub use price_client::{DEFAULT_BASE_API, MarketSnapshot, NewsItem, PriceApi, PriceClient, Quote};
pub use subscriber_store::{PgSubscriberStore, Subscriber, SubscriberStore};
