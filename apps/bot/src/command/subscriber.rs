use buddy::{
    SubscriberStore,
    export::{EXPORT_FILE_NAME, subscribers_csv},
};
use tracing::{info, warn};

use super::{Caller, Reply};
use crate::Error;

pub const HELP: &str = "\
📖 **Available Commands:**
• `@buddy help` – Show this message
• `@buddy count` – Show total number of subscribers
• `@buddy latest` – Show latest subscriber
• `@buddy find <email>` – Find subscriber by email
• `@buddy download` (or `export`) – Export subscribers as CSV (Admin only)
• `@buddy price [symbol]` – Crypto price in USD and EUR (default BTC)
• `@buddy marketcap [symbol]` – Price, 24h change, market cap and volume
• `@buddy cryptonews` – Top 3 crypto headlines
• `@buddy gandu`, `nepquote`, `hasayo`, `bahunko`, `dialogue` – Just for fun";

pub const NO_SUBSCRIBERS: &str = "No subscribers found.";
pub const NEED_EMAIL: &str = "Please provide an email.";
pub const NOT_FOUND: &str = "❌ No subscriber found.";
pub const DENIED: &str = "⛔ You are not authorized to use this command.";
pub const EXPORTED: &str = "📎 Exported subscribers:";

pub fn help() -> Reply {
    Reply::text(HELP)
}

pub async fn count(store: &dyn SubscriberStore) -> Result<Reply, Error> {
    let count = store.count().await?;
    Ok(Reply::text(format!("📊 Total subscribers: **{count}**")))
}

pub async fn latest(store: &dyn SubscriberStore) -> Result<Reply, Error> {
    let reply = match store.latest().await? {
        Some(s) => Reply::text(format!("🆕 Latest subscriber: **{}** ({})", s.name, s.email)),
        None => Reply::text(NO_SUBSCRIBERS),
    };
    Ok(reply)
}

pub async fn find(store: &dyn SubscriberStore, args: &[String]) -> Result<Reply, Error> {
    let Some(email) = args.first() else {
        return Ok(Reply::text(NEED_EMAIL));
    };

    let reply = match store.find_by_email(email).await? {
        Some(s) => Reply::text(format!("✅ Found: **{}** ({})", s.name, s.email)),
        None => Reply::text(NOT_FOUND),
    };
    Ok(reply)
}

pub async fn download(
    store: &dyn SubscriberStore,
    caller: &Caller,
    admin_role: &str,
) -> Result<Reply, Error> {
    if !caller.has_role(admin_role) {
        warn!(
            "download: denied user_id={} required_role={}",
            caller.user_id, admin_role
        );
        return Ok(Reply::text(DENIED));
    }

    let subscribers = store.list().await?;
    if subscribers.is_empty() {
        return Ok(Reply::text(NO_SUBSCRIBERS));
    }

    info!(
        "download: exporting user_id={} rows={}",
        caller.user_id,
        subscribers.len()
    );

    Ok(Reply::with_file(
        EXPORTED,
        EXPORT_FILE_NAME,
        subscribers_csv(&subscribers),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::super::testing::{ADMIN_ROLE, FakeStore, subscriber};
    use super::*;

    fn admin() -> Caller {
        Caller {
            user_id: 7,
            roles: vec!["Member".to_string(), ADMIN_ROLE.to_string()],
        }
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn count_reports_store_total() {
        let store = FakeStore::with(vec![
            subscriber("Asha", "asha@example.com", 1),
            subscriber("Bikash", "bikash@example.com", 2),
            subscriber("Chandra", "chandra@example.com", 3),
        ]);

        let reply = count(&store).await.unwrap();
        assert_eq!(reply.content, "📊 Total subscribers: **3**");

        let reply = count(&FakeStore::default()).await.unwrap();
        assert_eq!(reply.content, "📊 Total subscribers: **0**");
    }

    #[tokio::test]
    async fn latest_picks_newest() {
        let store = FakeStore::with(vec![
            subscriber("Old", "old@example.com", 1_000),
            subscriber("New", "new@example.com", 9_000),
            subscriber("Mid", "mid@example.com", 5_000),
        ]);

        let reply = latest(&store).await.unwrap();
        assert_eq!(reply.content, "🆕 Latest subscriber: **New** (new@example.com)");
    }

    #[tokio::test]
    async fn latest_on_empty_store() {
        let reply = latest(&FakeStore::default()).await.unwrap();
        assert_eq!(reply.content, NO_SUBSCRIBERS);
    }

    #[tokio::test]
    async fn find_known_and_unknown() {
        let store = FakeStore::with(vec![subscriber("Asha", "asha@example.com", 0)]);

        let reply = find(&store, &args(&["asha@example.com"])).await.unwrap();
        assert!(reply.content.contains("Asha"));
        assert!(reply.content.contains("asha@example.com"));

        let reply = find(&store, &args(&["nobody@example.com"])).await.unwrap();
        assert_eq!(reply.content, NOT_FOUND);
    }

    #[tokio::test]
    async fn find_without_args_does_not_query() {
        let store = FakeStore::default();

        let reply = find(&store, &[]).await.unwrap();
        assert_eq!(reply.content, NEED_EMAIL);
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test]
    async fn download_denied_without_role() {
        let store = FakeStore::with(vec![subscriber("Asha", "asha@example.com", 0)]);
        let caller = Caller {
            user_id: 9,
            roles: vec!["Member".to_string(), "emailora".to_string()],
        };

        let reply = download(&store, &caller, ADMIN_ROLE).await.unwrap();
        assert_eq!(reply, Reply::text(DENIED));
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test]
    async fn download_with_no_subscribers() {
        let reply = download(&FakeStore::default(), &admin(), ADMIN_ROLE)
            .await
            .unwrap();
        assert_eq!(reply, Reply::text(NO_SUBSCRIBERS));
    }

    #[tokio::test]
    async fn download_attaches_csv() {
        let subs = vec![
            subscriber("Asha", "asha@example.com", 1_700_000_000_000),
            subscriber("Bikash", "bikash@example.com", 1_700_000_360_500),
        ];
        let store = FakeStore::with(subs.clone());

        let reply = download(&store, &admin(), ADMIN_ROLE).await.unwrap();
        assert_eq!(reply.content, EXPORTED);

        let file = reply.file.unwrap();
        assert_eq!(file.name, "subscribers.csv");

        let csv = String::from_utf8(file.bytes).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), subs.len() + 1);
        assert_eq!(rows[0], "Name,Email,Created At");

        for (row, sub) in rows[1..].iter().zip(&subs) {
            let fields: Vec<&str> = row.split(',').collect();
            assert_eq!(fields[0], sub.name);
            assert_eq!(fields[1], sub.email);
            let at: DateTime<Utc> = fields[2].parse().unwrap();
            assert_eq!(at, sub.created_at);
        }
    }
}
