//! Filter command handlers.
//!
//! Commands for managing auto-reply filters in groups. The reply body is
//! run through the button-markup parser; alert buttons get callback data
//! in the `alertmessage` namespace, resolved per chat.

use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters, UserId};
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::store::SavedReply;
use crate::utils::{html_escape, parse_markup, split_quotes};

const FILTER_USAGE: &str = "<b>Add an auto-reply filter:</b>\n\
    <code>/filter keyword reply text</code>\n\
    <code>/filter \"multi word keyword\" reply text</code>\n\n\
    Buttons inside the reply:\n\
    <code>[label](buttonurl:https://example.com)</code>\n\
    <code>[label](buttonurl:https://example.com:same)</code> - same row\n\
    <code>[label](buttonalert:Popup text)</code> - popup alert";

/// Arguments after the command name, if any.
fn command_args(msg: &Message) -> &str {
    msg.text()
        .and_then(|t| t.split_once(char::is_whitespace))
        .map(|(_, rest)| rest.trim())
        .unwrap_or("")
}

/// Handle /filter command - add a new filter.
pub async fn filter_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let user_id = msg.from.as_ref().map(|u| u.id).unwrap_or(UserId(0));

    // Must be in group
    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        bot.send_message(chat_id, "⚠️ This command only works in groups.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    if !state
        .permissions
        .is_admin(chat_id, user_id)
        .await
        .unwrap_or(false)
    {
        bot.send_message(chat_id, "Only admins can manage filters.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let args = command_args(&msg);
    if args.is_empty() {
        bot.send_message(chat_id, FILTER_USAGE)
            .parse_mode(ParseMode::Html)
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let (keyword, body) = split_quotes(args);
    if keyword.is_empty() {
        bot.send_message(chat_id, "The filter needs a trigger keyword.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }
    let Some(body) = body else {
        bot.send_message(chat_id, "Give the filter something to reply with.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    };

    let keyword = keyword.to_lowercase();
    let parsed = parse_markup(&body, &keyword, "alertmessage");
    state.filters.save_chat(
        chat_id.0,
        SavedReply {
            keyword: keyword.clone(),
            text: parsed.text.trim().to_string(),
            buttons: parsed.buttons,
            alerts: parsed.alerts,
        },
    );

    info!("Added filter '{}' in chat {}", keyword, chat_id);

    bot.send_message(
        chat_id,
        format!("Saved filter <b>{}</b>.", html_escape(&keyword)),
    )
    .parse_mode(ParseMode::Html)
    .reply_parameters(ReplyParameters::new(msg.id))
    .await?;

    Ok(())
}

/// Handle /filters command - list all filters.
pub async fn filters_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;

    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        bot.send_message(chat_id, "⚠️ This command only works in groups.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let keywords = state.filters.chat_keywords(chat_id.0);
    if keywords.is_empty() {
        bot.send_message(chat_id, "No filters saved in this chat.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let mut text = format!("<b>Filters in this chat ({}):</b>\n", keywords.len());
    for keyword in keywords {
        text.push_str(&format!("• <code>{}</code>\n", html_escape(&keyword)));
    }

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

/// Handle /stop command - remove a filter.
pub async fn stop_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let user_id = msg.from.as_ref().map(|u| u.id).unwrap_or(UserId(0));

    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        bot.send_message(chat_id, "⚠️ This command only works in groups.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    if !state
        .permissions
        .is_admin(chat_id, user_id)
        .await
        .unwrap_or(false)
    {
        bot.send_message(chat_id, "Only admins can manage filters.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let args = command_args(&msg);
    if args.is_empty() {
        bot.send_message(chat_id, "Usage: /stop keyword")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let (keyword, _) = split_quotes(args);
    if state.filters.delete_chat(chat_id.0, &keyword) {
        info!("Removed filter '{}' from chat {}", keyword, chat_id);
        bot.send_message(
            chat_id,
            format!("Removed filter <b>{}</b>.", html_escape(&keyword)),
        )
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    } else {
        bot.send_message(
            chat_id,
            format!("No filter <b>{}</b> here.", html_escape(&keyword)),
        )
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    }

    Ok(())
}

/// Handle /stopall command - remove all filters.
pub async fn stopall_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let user_id = msg.from.as_ref().map(|u| u.id).unwrap_or(UserId(0));

    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        bot.send_message(chat_id, "⚠️ This command only works in groups.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    // Wiping every filter is reserved for the group owner.
    if !state
        .permissions
        .is_chat_owner(chat_id, user_id)
        .await
        .unwrap_or(false)
    {
        bot.send_message(chat_id, "Only the group owner can remove all filters.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let count = state.filters.clear_chat(chat_id.0);
    info!("Cleared all {} filters from chat {}", count, chat_id);

    bot.send_message(chat_id, format!("Removed {count} filters."))
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}
