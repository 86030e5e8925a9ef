//! Snerge bot entry point.
//!
//! Loads config and the quote corpus, resolves chat credentials, connects
//! the Twitch transport, and runs the bot until Ctrl-C.

use snerge::chat::twitch;
use snerge::quotes::CorpusQuoteSource;
use snerge::{Bot, BotConfig};
use std::sync::Arc;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(BotConfig::default_config_path, Into::into);
    let config = if config_path.exists() {
        BotConfig::from_file(&config_path)?
    } else {
        tracing::warn!(path = %config_path.display(), "no config file, using defaults");
        BotConfig::default()
    };

    let source = Arc::new(CorpusQuoteSource::from_file(&config.corpus_path)?);

    let credentials = snerge::credentials::resolve(&config.auth).await?;
    let (connector, events) = twitch::connect(&config.nick, &credentials.token).await?;

    tracing::info!(channel = %config.channel, "starting bot");
    let bot = Bot::new(config, connector, source);

    let (stop_tx, stop_rx) = oneshot::channel();
    let run = tokio::spawn(bot.run(events, stop_rx));

    tokio::signal::ctrl_c().await?;
    tracing::info!("stop signal received");
    let _ = stop_tx.send(());

    run.await?;
    tracing::info!("shut down cleanly");
    Ok(())
}
