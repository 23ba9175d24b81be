//! Global filter command handlers.
//!
//! Bot-owner-managed filters that trigger in every chat. Same parsing as
//! chat filters, but alert buttons use the `gfilteralert` namespace so
//! their callbacks resolve against the global table.

use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters};
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::store::SavedReply;
use crate::utils::{html_escape, parse_markup, split_quotes};

/// Arguments after the command name, if any.
fn command_args(msg: &Message) -> &str {
    msg.text()
        .and_then(|t| t.split_once(char::is_whitespace))
        .map(|(_, rest)| rest.trim())
        .unwrap_or("")
}

fn is_bot_owner(msg: &Message, state: &AppState) -> bool {
    msg.from
        .as_ref()
        .map(|u| state.is_owner(u.id.0))
        .unwrap_or(false)
}

/// Handle /gfilter command - add a global filter.
pub async fn gfilter_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;

    if !is_bot_owner(&msg, &state) {
        bot.send_message(chat_id, "Only bot owners can manage global filters.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let args = command_args(&msg);
    if args.is_empty() {
        bot.send_message(chat_id, "Usage: /gfilter keyword reply text")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let (keyword, body) = split_quotes(args);
    let Some(body) = body else {
        bot.send_message(chat_id, "Give the filter something to reply with.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    };

    let keyword = keyword.to_lowercase();
    let parsed = parse_markup(&body, &keyword, "gfilteralert");
    state.filters.save_global(SavedReply {
        keyword: keyword.clone(),
        text: parsed.text.trim().to_string(),
        buttons: parsed.buttons,
        alerts: parsed.alerts,
    });

    info!("Added global filter '{}'", keyword);

    bot.send_message(
        chat_id,
        format!("Saved global filter <b>{}</b>.", html_escape(&keyword)),
    )
    .parse_mode(ParseMode::Html)
    .reply_parameters(ReplyParameters::new(msg.id))
    .await?;

    Ok(())
}

/// Handle /gfilters command - list all global filters.
pub async fn gfilters_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;

    let keywords = state.filters.global_keywords();
    if keywords.is_empty() {
        bot.send_message(chat_id, "No global filters saved.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let mut text = format!("<b>Global filters ({}):</b>\n", keywords.len());
    for keyword in keywords {
        text.push_str(&format!("• <code>{}</code>\n", html_escape(&keyword)));
    }

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

/// Handle /delg command - remove a global filter.
pub async fn delg_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;

    if !is_bot_owner(&msg, &state) {
        bot.send_message(chat_id, "Only bot owners can manage global filters.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let args = command_args(&msg);
    if args.is_empty() {
        bot.send_message(chat_id, "Usage: /delg keyword")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let (keyword, _) = split_quotes(args);
    if state.filters.delete_global(&keyword) {
        info!("Removed global filter '{}'", keyword);
        bot.send_message(
            chat_id,
            format!("Removed global filter <b>{}</b>.", html_escape(&keyword)),
        )
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    } else {
        bot.send_message(
            chat_id,
            format!("No global filter <b>{}</b>.", html_escape(&keyword)),
        )
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    }

    Ok(())
}

/// Handle /delgall command - remove all global filters.
pub async fn delgall_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;

    if !is_bot_owner(&msg, &state) {
        bot.send_message(chat_id, "Only bot owners can manage global filters.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let count = state.filters.clear_global();
    info!("Cleared all {} global filters", count);

    bot.send_message(chat_id, format!("Removed {count} global filters."))
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}
