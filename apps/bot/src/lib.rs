use std::sync::Arc;

use buddy::{PriceApi, SubscriberStore};

pub mod command;
pub mod config;
pub mod handler;

pub struct Data {
    pub store: Arc<dyn SubscriberStore>,
    pub prices: Arc<dyn PriceApi>,
    /// Role name required for `download`/`export`
    pub admin_role: String,
    /// The bot's own mention token, `<@id>`
    pub mention: String,
}

pub type Error = anyhow::Error;
