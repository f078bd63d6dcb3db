use buddy::PriceApi;
use tracing::{error, info, warn};

use super::Reply;

pub const DEFAULT_SYMBOL: &str = "BTC";
pub const PRICE_ERROR: &str = "⚠️ Error fetching price. Please try again later.";
pub const NEWS_ERROR: &str = "⚠️ Error fetching crypto news. Please try again later.";
pub const NO_NEWS: &str = "No crypto news found right now.";
pub const MARKET_ERROR: &str = "⚠️ Error fetching market data. Please try again later.";

const NEWS_LIMIT: usize = 3;

fn symbol_arg(args: &[String]) -> String {
    args.first()
        .map(|s| s.to_uppercase())
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string())
}

pub async fn price(api: &dyn PriceApi, args: &[String]) -> Reply {
    let symbol = symbol_arg(args);

    let quote = match api.price(&symbol, &["USD", "EUR"]).await {
        Ok(Some(q)) => q,
        Ok(None) => {
            info!("price: unknown symbol={}", symbol);
            return Reply::text(format!("❌ Invalid coin symbol: **{symbol}**"));
        }
        Err(e) => {
            error!("price: fetch failed symbol={} err={:?}", symbol, e);
            return Reply::text(PRICE_ERROR);
        }
    };

    let mut lines = vec![format!("💰 **{symbol}** price:")];
    if let Some(usd) = quote.get("USD") {
        lines.push(format!("• USD: {}", money("$", usd)));
    }
    if let Some(eur) = quote.get("EUR") {
        lines.push(format!("• EUR: {}", money("€", eur)));
    }

    Reply::text(lines.join("\n"))
}

pub async fn news(api: &dyn PriceApi) -> Reply {
    let items = match api.news().await {
        Ok(items) => items,
        Err(e) => {
            error!("cryptonews: fetch failed err={:?}", e);
            return Reply::text(NEWS_ERROR);
        }
    };

    if items.is_empty() {
        warn!("cryptonews: upstream returned no items");
        return Reply::text(NO_NEWS);
    }

    let blocks: Vec<String> = items
        .iter()
        .take(NEWS_LIMIT)
        .enumerate()
        .map(|(i, item)| format!("**{}. {}**\n<{}>", i + 1, item.title, item.url))
        .collect();

    Reply::text(format!("📰 **Latest Crypto News:**\n\n{}", blocks.join("\n\n")))
}

pub async fn market_cap(api: &dyn PriceApi, args: &[String]) -> Reply {
    let symbol = symbol_arg(args);

    let snap = match api.market_snapshot(&symbol, "USD").await {
        Ok(Some(s)) => s,
        Ok(None) => {
            info!("marketcap: no data symbol={}", symbol);
            return Reply::text(format!("❌ Couldn't find market data for **{symbol}**."));
        }
        Err(e) => {
            error!("marketcap: fetch failed symbol={} err={:?}", symbol, e);
            return Reply::text(MARKET_ERROR);
        }
    };

    Reply::text(format!(
        "📈 **{symbol} Market Data**\n\
         • Price: {}\n\
         • 24h Change: {}%\n\
         • Market Cap: {}\n\
         • 24h Volume: {}",
        snap.price, snap.change_24h_pct, snap.market_cap, snap.volume_24h
    ))
}

/// `1234567.891` -> `$1,234,567.89`, `0.00001234` -> `$0.00001234`
///
/// Amounts under one keep four significant digits.
fn money(sign: &str, amount: f64) -> String {
    let abs = amount.abs();
    let decimals = if abs > 0.0 && abs < 1.0 {
        ((-abs.log10()).ceil() as usize + 3).min(12)
    } else {
        2
    };

    let fixed = format!("{abs:.decimals$}");
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let frac = if decimals > 2 {
        format!("{:0<2}", frac.trim_end_matches('0'))
    } else {
        frac.to_string()
    };

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let minus = if amount < 0.0 { "-" } else { "" };
    format!("{minus}{sign}{grouped}.{frac}")
}
