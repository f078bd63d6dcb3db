use std::env::var;

use anyhow::{Context, Result};
use buddy::DEFAULT_BASE_API;

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub database_url: String,
    pub admin_role: String,
    pub price_api_base: String,
    pub price_api_key: Option<String>,
    pub version: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| var(key).ok())
    }

    /// Build from any key lookup. Required secrets that are missing or blank
    /// are an error naming the variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| present(key).with_context(|| format!("{key} not set"));

        Ok(Self {
            discord_token: required("DISCORD_BOT_TOKEN")?,
            database_url: required("DATABASE_URL")?,
            admin_role: present("ADMIN_ROLE").unwrap_or_else(|| "Emailora".to_string()),
            price_api_base: present("CRYPTOCOMPARE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_API.to_string()),
            price_api_key: present("CRYPTOCOMPARE_API_KEY"),
            version: present("APP_VERSION").unwrap_or_else(|| "Unknown".to_string()),
        })
    }
}
