//! /start and /help command plugin.

use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters};

use crate::bot::dispatcher::{AppState, ThrottledBot};

/// Handle the /start command.
pub async fn start_handler(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let text = format!(
        "👋 Hi! I am <b>Kinodex</b>, a movie and TV metadata bot.\n\n\
         Send /tmdb &lt;name&gt; to look something up, or use me inline: \
         type <code>@{}</code> followed by a title in any chat.\n\n\
         Use /help for the full command list.",
        state.bot_username
    );

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

/// Handle the /help command.
pub async fn help_handler(bot: ThrottledBot, msg: Message) -> anyhow::Result<()> {
    let text = "<b>Commands</b>\n\
        /tmdb &lt;name&gt; - search movies and TV shows\n\
        /tmdb &lt;name&gt; &lt;year&gt; - narrow the search by year\n\
        /filter - add an auto-reply filter (admins)\n\
        /filters - list filters\n\
        /stop - remove a filter (admins)\n\
        /stopall - remove all filters (group owner)\n\
        /gfilter /gfilters /delg /delgall - global filters (bot owner)\n\n\
        <b>Buttons in filter replies</b>\n\
        <code>[label](buttonurl:https://example.com)</code>\n\
        <code>[label](buttonurl:https://example.com:same)</code> - same row\n\
        <code>[label](buttonalert:Popup text)</code> - popup alert\n\n\
        Prefix the <code>[</code> with a backslash to keep markup as plain text.";

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}
