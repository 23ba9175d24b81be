//! Kinodex - Telegram movie/TV metadata bot
//!
//! Searches TMDB from commands and inline queries, and supports saved
//! auto-reply filters with an embedded button-markup mini-language.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `tmdb` - TMDB REST client, normalized models, text cards
//! - `store` - In-memory saved-reply stores
//! - `permissions` - Admin checking with caching, channel gating
//! - `bot` - Core bot functionality (with Throttle for API rate limiting)
//! - `plugins` - Command/callback/inline handlers (extensible)
//! - `events` - Event handlers (extensible)
//! - `utils` - Markup parser and helpers

mod bot;
mod config;
mod events;
mod permissions;
mod plugins;
mod store;
mod tmdb;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use store::FilterStore;
use tmdb::TmdbClient;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // Initialize logging with sensible defaults
    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kinodex=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Kinodex bot...");

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    // TMDB client and the saved-reply store
    let tmdb = Arc::new(TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_language.clone(),
    ));
    let filters = Arc::new(FilterStore::new());
    info!("TMDB client initialized (language: {})", config.tmdb_language);

    // Initialize bot with Throttle for automatic rate limiting
    // This respects Telegram's rate limits:
    // - 30 messages per second globally
    // - 1 message per second to the same chat
    // - 20 messages per minute to the same group
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    // Get bot info
    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    // Get bot username from config or fallback to get_me()
    let bot_username = config
        .bot_username
        .clone()
        .unwrap_or_else(|| me.username().to_string());

    // Log owner info
    if config.owner_ids.is_empty() {
        info!("No owner IDs configured (OWNER_IDS is empty)");
    } else {
        info!("Bot owners: {:?}", config.owner_ids);
    }
    if !config.force_sub_channels.is_empty() {
        info!("Force-sub channels: {:?}", config.force_sub_channels);
    }

    // Build dispatcher
    let dispatcher = bot::build_dispatcher(bot.clone(), tmdb, filters, &config, bot_username);

    // Run the bot
    bot::run(&config, dispatcher, bot).await;

    Ok(())
}
