use std::{sync::Arc, time::Duration};

use anyhow::Result;
use bot::{Data, config::Config, handler};
use buddy::{PgSubscriberStore, PriceApi, PriceClient, SubscriberStore};
use poise::Framework;
use serenity::all::{ActivityData, ClientBuilder, GatewayIntents};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn SubscriberStore> =
        Arc::new(PgSubscriberStore::connect(&config.database_url).await?);
    let prices: Arc<dyn PriceApi> = Arc::new(PriceClient::new(
        config.price_api_base.clone(),
        config.price_api_key.clone(),
    )?);

    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    let framework = Framework::builder()
        .options(handler::framework_options())
        .setup({
            let config = config.clone();

            move |ctx, ready, _framework| {
                let store = Arc::clone(&store);
                let prices = Arc::clone(&prices);
                let config = config.clone();

                Box::pin(async move {
                    info!(
                        "{} [{}] connected successfully!",
                        ready.user.name, ready.user.id
                    );

                    let ctx_clone = ctx.clone();
                    let version = config.version.clone();
                    let hint = format!("@{} help", ready.user.name);
                    tokio::spawn(async move {
                        let mut show_version = true;
                        let mut tick = tokio::time::interval(Duration::from_secs(30));

                        loop {
                            tick.tick().await;

                            let text = if !show_version {
                                hint.clone()
                            } else if version.starts_with('v') {
                                version.clone()
                            } else {
                                format!("Version - {}", version)
                            };

                            ctx_clone.set_activity(Some(ActivityData::custom(text)));
                            show_version = !show_version;
                        }
                    });

                    Ok(Data {
                        store,
                        prices,
                        admin_role: config.admin_role.clone(),
                        mention: format!("<@{}>", ready.user.id),
                    })
                })
            }
        })
        .build();

    let mut client = ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        if let Err(why) = client.start().await {
            error!("Client error: {why:?}");
        }
    });

    shutdown_signal().await;
    shard_manager.shutdown_all().await;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::{
            select,
            signal::unix::{SignalKind, signal},
        };
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
