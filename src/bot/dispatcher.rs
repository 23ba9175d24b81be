//! Message dispatcher setup.
//!
//! Builds the dispatcher with all command, callback, and inline handlers.

use std::sync::Arc;
use std::time::Duration;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::config::Config;
use crate::events;
use crate::permissions::Permissions;
use crate::plugins;
use crate::store::FilterStore;
use crate::tmdb::TmdbClient;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// TMDB API client.
    pub tmdb: Arc<TmdbClient>,

    /// Saved-reply store (chat + global filters).
    pub filters: Arc<FilterStore>,

    /// Permission checker with rank caching.
    pub permissions: Permissions,

    /// Owner user IDs (manage global filters, bypass gates).
    pub owner_ids: Vec<u64>,

    /// Bot username (without @) shown in the start card.
    pub bot_username: String,

    /// Channels users must join before searching.
    pub force_sub_channels: Vec<String>,

    /// Delete search results after this long, if set.
    pub auto_delete: Option<Duration>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        bot: ThrottledBot,
        tmdb: Arc<TmdbClient>,
        filters: Arc<FilterStore>,
        config: &Config,
        bot_username: String,
    ) -> Self {
        // Note: Permissions needs the inner Bot for API calls
        let permissions = Permissions::new(bot.inner().clone(), config.owner_ids.clone());

        Self {
            tmdb,
            filters,
            permissions,
            owner_ids: config.owner_ids.clone(),
            bot_username,
            force_sub_channels: config.force_sub_channels.clone(),
            auto_delete: config.auto_delete,
        }
    }

    /// Check if a user is a bot owner.
    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owner_ids.contains(&user_id)
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    tmdb: Arc<TmdbClient>,
    filters: Arc<FilterStore>,
    config: &Config,
    bot_username: String,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    let state = AppState::new(bot.clone(), tmdb, filters, config, bot_username);

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Message handlers: commands first, then filter triggers
    let message_handler = Update::filter_message()
        .branch(plugins::command_handler())
        .branch(events::message_event_handler());

    dptree::entry()
        .branch(message_handler)
        .branch(plugins::callback_handler())
        .branch(plugins::inline_handler())
}
