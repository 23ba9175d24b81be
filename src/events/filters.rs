//! Filter event handler.
//!
//! Scans incoming group messages for saved-reply triggers. Chat filters
//! win over global filters when both match.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ReplyParameters};
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::store::SavedReply;
use crate::utils::{ButtonAction, ButtonSpec};

/// Check a message against the filter stores and send the reply on a hit.
pub async fn check_filters(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    if text.starts_with('/') {
        return Ok(());
    }

    let reply = state
        .filters
        .match_chat(msg.chat.id.0, text)
        .or_else(|| state.filters.match_global(text));
    let Some(reply) = reply else {
        return Ok(());
    };

    debug!("Filter '{}' triggered in chat {}", reply.keyword, msg.chat.id);

    send_saved_reply(&bot, msg.chat.id, msg.id, &reply).await
}

/// Send a saved reply with its button grid.
async fn send_saved_reply(
    bot: &ThrottledBot,
    chat_id: ChatId,
    reply_to: MessageId,
    saved: &SavedReply,
) -> anyhow::Result<()> {
    // A reply that was nothing but markup still needs visible text.
    let text = if saved.text.is_empty() {
        &saved.keyword
    } else {
        &saved.text
    };

    let mut req = bot
        .send_message(chat_id, text)
        .reply_parameters(ReplyParameters::new(reply_to));
    if let Some(keyboard) = render_buttons(&saved.buttons) {
        req = req.reply_markup(keyboard);
    }
    req.await?;

    Ok(())
}

/// Turn parsed button rows into an inline keyboard.
///
/// URL buttons whose target does not parse are dropped; alert buttons
/// carry their callback data through unchanged.
fn render_buttons(rows: &[Vec<ButtonSpec>]) -> Option<InlineKeyboardMarkup> {
    let rows: Vec<Vec<InlineKeyboardButton>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .filter_map(|btn| match &btn.action {
                    ButtonAction::Url(target) => target
                        .parse()
                        .ok()
                        .map(|url| InlineKeyboardButton::url(&btn.label, url)),
                    ButtonAction::Alert(data) => {
                        Some(InlineKeyboardButton::callback(&btn.label, data))
                    }
                })
                .collect()
        })
        .filter(|row: &Vec<_>| !row.is_empty())
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(InlineKeyboardMarkup::new(rows))
    }
}
