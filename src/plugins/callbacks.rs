//! Callback-query handlers.
//!
//! Two families of callback data exist:
//! - `tmdb_nav|query|page`, `tmdb_info|kind|id`, `tmdb_season|id|n`,
//!   `tmdb_rec|kind|id` - search-card navigation
//! - `alertmessage:i:keyword` / `gfilteralert:i:keyword` - alert buttons
//!   produced by the markup parser, resolved against the filter stores

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::plugins::tmdb::{filter_by_year, nav_keyboard, split_year};
use crate::tmdb::{media_card, season_card, MediaKind};
use crate::utils::{html_escape, truncate_chars, unescape_alert};

/// Telegram rejects popup texts longer than this.
const ALERT_LIMIT: usize = 200;

/// Handle `tmdb_*` callbacks.
pub async fn tmdb_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
) -> anyhow::Result<()> {
    let data = q.data.clone().unwrap_or_default();
    let mut parts = data.splitn(3, '|');
    let tag = parts.next().unwrap_or("");
    let arg1 = parts.next();
    let arg2 = parts.next();

    match tag {
        "tmdb_nav" => {
            let (Some(query), Some(page)) = (arg1, arg2.and_then(|p| p.parse::<u32>().ok()))
            else {
                bot.answer_callback_query(&q.id)
                    .text("Invalid navigation")
                    .show_alert(true)
                    .await?;
                return Ok(());
            };
            nav(&bot, &q, &state, query, page).await
        }
        "tmdb_info" => {
            let (Some(kind), Some(id)) = (
                arg1.and_then(MediaKind::parse),
                arg2.and_then(|s| s.parse::<u64>().ok()),
            ) else {
                bot.answer_callback_query(&q.id)
                    .text("Invalid")
                    .show_alert(true)
                    .await?;
                return Ok(());
            };
            info_card(&bot, &q, &state, kind, id).await
        }
        "tmdb_season" => {
            let (Some(tv_id), Some(season_no)) = (
                arg1.and_then(|s| s.parse::<u64>().ok()),
                arg2.and_then(|s| s.parse::<u32>().ok()),
            ) else {
                bot.answer_callback_query(&q.id)
                    .text("Invalid")
                    .show_alert(true)
                    .await?;
                return Ok(());
            };
            season(&bot, &q, &state, tv_id, season_no).await
        }
        "tmdb_rec" => {
            let (Some(kind), Some(id)) = (
                arg1.and_then(MediaKind::parse),
                arg2.and_then(|s| s.parse::<u64>().ok()),
            ) else {
                bot.answer_callback_query(&q.id)
                    .text("Invalid")
                    .show_alert(true)
                    .await?;
                return Ok(());
            };
            recommendations(&bot, &q, &state, kind, id).await
        }
        _ => Ok(()),
    }
}

/// Move the search card to another result page.
async fn nav(
    bot: &ThrottledBot,
    q: &CallbackQuery,
    state: &AppState,
    query: &str,
    page: u32,
) -> anyhow::Result<()> {
    let page = page.max(1);
    let (title, year) = split_year(query);
    let results = state.tmdb.search_multi(&title, page).await?;

    let matched = filter_by_year(&results, year.as_deref());
    let Some(primary) = matched.first() else {
        bot.answer_callback_query(&q.id)
            .text("No more results")
            .show_alert(true)
            .await?;
        return Ok(());
    };

    let details = state.tmdb.details(primary.kind, primary.id).await?;
    let caption = media_card(&details);
    let keyboard = nav_keyboard(query, page, results.total_pages, primary.kind, primary.id);

    edit_card(bot, q, &caption, Some(keyboard)).await?;
    bot.answer_callback_query(&q.id).await?;
    Ok(())
}

/// Replace the card with full details, plus season buttons for TV.
async fn info_card(
    bot: &ThrottledBot,
    q: &CallbackQuery,
    state: &AppState,
    kind: MediaKind,
    id: u64,
) -> anyhow::Result<()> {
    let details = state.tmdb.details(kind, id).await?;
    let caption = media_card(&details);

    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    if kind == MediaKind::Tv {
        let mut row = Vec::new();
        for season in details.seasons.iter().take(6) {
            row.push(InlineKeyboardButton::callback(
                format!("S{}", season.season_number),
                format!("tmdb_season|{id}|{}", season.season_number),
            ));
            if row.len() == 3 {
                rows.push(std::mem::take(&mut row));
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    rows.push(vec![InlineKeyboardButton::callback(
        "🎬 Similar",
        format!("tmdb_rec|{}|{id}", kind.as_str()),
    )]);

    edit_card(bot, q, &caption, Some(InlineKeyboardMarkup::new(rows))).await?;
    bot.answer_callback_query(&q.id).await?;
    Ok(())
}

/// Replace the card with a season's episode listing.
async fn season(
    bot: &ThrottledBot,
    q: &CallbackQuery,
    state: &AppState,
    tv_id: u64,
    season_no: u32,
) -> anyhow::Result<()> {
    let season = state.tmdb.tv_season(tv_id, season_no).await?;
    let caption = season_card(&season);

    edit_card(bot, q, &caption, None).await?;
    bot.answer_callback_query(&q.id).await?;
    Ok(())
}

/// Replace the card with recommended titles.
async fn recommendations(
    bot: &ThrottledBot,
    q: &CallbackQuery,
    state: &AppState,
    kind: MediaKind,
    id: u64,
) -> anyhow::Result<()> {
    let recs = state.tmdb.recommendations(kind, id, 1).await?;
    if recs.is_empty() {
        bot.answer_callback_query(&q.id)
            .text("No recommendations found")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    let mut lines = vec!["<b>Similar titles:</b>".to_string()];
    for entry in recs.iter().take(5) {
        lines.push(format!(
            "• {} ({}) ⭐ {:.1}",
            html_escape(&entry.title),
            html_escape(&entry.release),
            entry.rating
        ));
    }

    edit_card(bot, q, &lines.join("\n"), None).await?;
    bot.answer_callback_query(&q.id).await?;
    Ok(())
}

/// Edit the message a callback came from, whatever form it has.
///
/// Cards sent with a poster are photo messages and take caption edits;
/// text cards and inline-mode messages take text edits.
async fn edit_card(
    bot: &ThrottledBot,
    q: &CallbackQuery,
    text: &str,
    keyboard: Option<InlineKeyboardMarkup>,
) -> anyhow::Result<()> {
    if let Some(msg) = q.message.as_ref() {
        let is_photo = msg
            .regular_message()
            .map(|m| m.photo().is_some())
            .unwrap_or(false);
        if is_photo {
            let mut req = bot
                .edit_message_caption(msg.chat().id, msg.id())
                .caption(text)
                .parse_mode(ParseMode::Html);
            if let Some(kb) = keyboard {
                req = req.reply_markup(kb);
            }
            req.await?;
        } else {
            let mut req = bot
                .edit_message_text(msg.chat().id, msg.id(), text)
                .parse_mode(ParseMode::Html);
            if let Some(kb) = keyboard {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
    } else if let Some(inline_id) = q.inline_message_id.as_deref() {
        let mut req = bot
            .edit_message_text_inline(inline_id, text)
            .parse_mode(ParseMode::Html);
        if let Some(kb) = keyboard {
            req = req.reply_markup(kb);
        }
        req.await?;
    }
    Ok(())
}

/// Handle alert-button callbacks from saved filters.
pub async fn alert_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
) -> anyhow::Result<()> {
    let data = q.data.clone().unwrap_or_default();
    let mut parts = data.splitn(3, ':');
    let namespace = parts.next().unwrap_or("");
    let index = parts.next().and_then(|s| s.parse::<usize>().ok());
    let keyword = parts.next().unwrap_or("");

    let saved = match namespace {
        "alertmessage" => q
            .message
            .as_ref()
            .and_then(|m| state.filters.get_chat(m.chat().id.0, keyword)),
        "gfilteralert" => state.filters.get_global(keyword),
        _ => None,
    };

    debug!(
        "alert callback {}:{:?}:{} resolved={}",
        namespace,
        index,
        keyword,
        saved.is_some()
    );

    let alert = saved
        .as_ref()
        .zip(index)
        .and_then(|(reply, i)| reply.alerts.get(i).cloned());

    match alert {
        Some(alert) => {
            let alert = truncate_chars(&unescape_alert(&alert), ALERT_LIMIT);
            bot.answer_callback_query(&q.id)
                .text(alert)
                .show_alert(true)
                .await?;
        }
        None => {
            bot.answer_callback_query(&q.id)
                .text("Alert not found.")
                .show_alert(true)
                .await?;
        }
    }

    Ok(())
}
