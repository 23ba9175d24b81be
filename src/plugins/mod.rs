//! Plugin system for command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding the handler to `command_handler()`

pub mod callbacks;
pub mod filters;
pub mod gfilters;
pub mod inline;
pub mod start;
pub mod tmdb;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

/// All bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,

    #[command(description = "Show help")]
    Help,

    #[command(description = "Search TMDB for a movie or series")]
    Tmdb(String),

    // Filter commands
    #[command(description = "Add an auto-reply filter")]
    Filter,

    #[command(description = "List all filters")]
    Filters,

    #[command(description = "Remove a filter")]
    Stop,

    #[command(description = "Remove all filters")]
    Stopall,

    // Global filter commands (bot owner)
    #[command(description = "Add a global filter")]
    Gfilter,

    #[command(description = "List all global filters")]
    Gfilters,

    #[command(description = "Remove a global filter")]
    Delg,

    #[command(description = "Remove all global filters")]
    Delgall,
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(start::start_handler))
        .branch(case![Command::Help].endpoint(start::help_handler))
        // TMDB
        .branch(case![Command::Tmdb(query)].endpoint(tmdb::tmdb_command))
        // Filters
        .branch(case![Command::Filter].endpoint(filters::filter_command))
        .branch(case![Command::Filters].endpoint(filters::filters_command))
        .branch(case![Command::Stop].endpoint(filters::stop_command))
        .branch(case![Command::Stopall].endpoint(filters::stopall_command))
        // Global filters
        .branch(case![Command::Gfilter].endpoint(gfilters::gfilter_command))
        .branch(case![Command::Gfilters].endpoint(gfilters::gfilters_command))
        .branch(case![Command::Delg].endpoint(gfilters::delg_command))
        .branch(case![Command::Delgall].endpoint(gfilters::delgall_command))
}

/// Build the callback query handler.
pub fn callback_handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_callback_query()
        .branch(
            dptree::filter(|q: CallbackQuery| {
                q.data
                    .as_ref()
                    .map(|d| d.starts_with("alertmessage:") || d.starts_with("gfilteralert:"))
                    .unwrap_or(false)
            })
            .endpoint(callbacks::alert_callback),
        )
        .branch(
            dptree::filter(|q: CallbackQuery| {
                q.data
                    .as_ref()
                    .map(|d| d.starts_with("tmdb_"))
                    .unwrap_or(false)
            })
            .endpoint(callbacks::tmdb_callback),
        )
}

/// Build the inline query handler.
pub fn inline_handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_inline_query().endpoint(inline::inline_query_handler)
}
