mod crypto;
mod fun;
mod reply;
mod subscriber;

pub mod router;

#[cfg(test)]
mod testing;

use strum::EnumString;
use tracing::debug;

use crate::{Data, Error};
use fun::Canned;
pub use reply::{Attachment, Reply};
pub use router::Invocation;

/// Every command the bot answers to. Anything else gets no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    Help,
    Count,
    Latest,
    Find,
    #[strum(serialize = "download", serialize = "export")]
    Download,
    Price,
    #[strum(serialize = "cryptonews")]
    CryptoNews,
    #[strum(serialize = "marketcap")]
    MarketCap,
    Gandu,
    #[strum(serialize = "nepquote")]
    NepQuote,
    Hasayo,
    Bahunko,
    Dialogue,
}

impl Command {
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Whether the caller's role names must be resolved before running.
    pub fn requires_role(self) -> bool {
        matches!(self, Command::Download)
    }
}

/// Who sent the command.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub user_id: u64,
    /// Role names in the originating guild; empty unless the command
    /// [requires a role](Command::requires_role).
    pub roles: Vec<String>,
}

impl Caller {
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r == name)
    }
}

/// Run one invocation. `Ok(None)` for unknown commands.
///
/// Subscriber store failures are returned as `Err`; price and news failures
/// are already turned into a reply.
pub async fn respond(
    data: &Data,
    invocation: &Invocation,
    caller: &Caller,
) -> Result<Option<Reply>, Error> {
    let Some(command) = Command::from_name(&invocation.name) else {
        debug!(name = %invocation.name, "unknown command ignored");
        return Ok(None);
    };

    let store = data.store.as_ref();
    let prices = data.prices.as_ref();
    let args = invocation.args.as_slice();

    let reply = match command {
        Command::Help => subscriber::help(),
        Command::Count => subscriber::count(store).await?,
        Command::Latest => subscriber::latest(store).await?,
        Command::Find => subscriber::find(store, args).await?,
        Command::Download => subscriber::download(store, caller, &data.admin_role).await?,
        Command::Price => crypto::price(prices, args).await,
        Command::CryptoNews => crypto::news(prices).await,
        Command::MarketCap => crypto::market_cap(prices, args).await,
        Command::Gandu => fun::respond(Canned::Gandu),
        Command::NepQuote => fun::respond(Canned::NepQuote),
        Command::Hasayo => fun::respond(Canned::Hasayo),
        Command::Bahunko => fun::respond(Canned::Bahunko),
        Command::Dialogue => fun::respond(Canned::Dialogue),
    };

    Ok(Some(reply))
}
