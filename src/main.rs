use std::sync::Arc;

use anyhow::{Context, Result};

use recast::config::BotConfig;
use recast::relay::Relay;
use recast::rules::RuleStore;
use recast::telegram::BotClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export TELEGRAM_BOT_TOKEN=123456:ABC-DEF...");
        std::process::exit(1);
    });

    let client = BotClient::new(&config);
    let me = client
        .get_me()
        .await
        .context("Could not reach the Telegram Bot API; check the token and network")?;

    eprintln!("🤖 Recast v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Bot: @{} (id {})",
        me.username.as_deref().unwrap_or("unknown"),
        me.id
    );
    eprintln!("   Edit cooldown: {:?}", config.edit_cooldown);
    eprintln!("   Session idle timeout: {:?}", config.session_idle_timeout);
    eprintln!("   Send /start to the bot in a private chat to configure rules.\n");

    let rules = RuleStore::new();
    let updates = client.updates();
    let relay = Relay::new(Arc::new(client), rules, &config);
    relay.run(updates).await;

    Ok(())
}
