//! /tmdb command plugin.
//!
//! Searches TMDB, replies with a details card for the best match, and
//! wires up pagination/details callbacks.

use once_cell::sync::Lazy;
use regex::Regex;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode, ReplyParameters,
};
use tracing::{debug, info};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::tmdb::{closest_title, media_card, MediaDetails, MediaEntry, MediaKind, MultiSearch};
use crate::utils::html_escape;

/// A trailing year in a query, e.g. "inception 2010".
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[12]\d{3}$").unwrap());

/// Handle the /tmdb command.
pub async fn tmdb_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    query: String,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let query = query.trim().to_string();

    if query.is_empty() {
        bot.send_message(chat_id, "Send: /tmdb movie or series name")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    // Subscription gate
    if let Some(user) = msg.from.as_ref() {
        if !state.force_sub_channels.is_empty() && !state.is_owner(user.id.0) {
            let missing = state
                .permissions
                .missing_channels(&state.force_sub_channels, user.id)
                .await;
            if let Some(keyboard) = join_keyboard(&missing) {
                bot.send_message(chat_id, "Join our channels first, then try again.")
                    .reply_markup(keyboard)
                    .reply_parameters(ReplyParameters::new(msg.id))
                    .await?;
                return Ok(());
            }
        }
    }

    // A trailing year narrows the search: "inception 2010"
    let (title, year) = split_year(&query);
    let results = state.tmdb.search_multi(&title, 1).await?;

    let hint = closest_title(&title, results.titles())
        .filter(|s| !s.eq_ignore_ascii_case(&title))
        .map(|s| {
            format!(
                "Did you mean <b>{}</b>? Use /tmdb {} to fetch it.\n\n",
                html_escape(&s),
                html_escape(&s)
            )
        })
        .unwrap_or_default();

    let matched = filter_by_year(&results, year.as_deref());
    let Some(primary) = matched.first() else {
        bot.send_message(chat_id, format!("{hint}No results found on TMDB."))
            .parse_mode(ParseMode::Html)
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    };

    let details = state.tmdb.details(primary.kind, primary.id).await?;
    info!(
        "tmdb search '{}': {} results, primary {} {}",
        title,
        results.total_results,
        primary.kind.as_str(),
        primary.id
    );

    let caption = format!("{hint}{}", media_card(&details));
    let keyboard = nav_keyboard(&query, 1, results.total_pages, primary.kind, primary.id);
    let sent = send_card(&bot, chat_id, msg.id, &details, &caption, keyboard).await?;
    schedule_auto_delete(&bot, &state, chat_id, sent.id);

    Ok(())
}

/// Split a trailing year off a query.
pub(crate) fn split_year(query: &str) -> (String, Option<String>) {
    let query = query.trim();
    if let Some(m) = YEAR_RE.find(query) {
        let title = query[..m.start()].trim();
        if !title.is_empty() {
            return (title.to_string(), Some(m.as_str().to_string()));
        }
    }
    (query.to_string(), None)
}

/// Entries matching the requested year, in display order.
///
/// Falls back to the unfiltered list when nothing matches the year.
pub(crate) fn filter_by_year<'a>(
    results: &'a MultiSearch,
    year: Option<&str>,
) -> Vec<&'a MediaEntry> {
    let all: Vec<&MediaEntry> = results.combined().collect();
    let Some(year) = year else { return all };

    let filtered: Vec<&MediaEntry> = all
        .iter()
        .copied()
        .filter(|e| e.release.starts_with(year))
        .collect();
    if filtered.is_empty() { all } else { filtered }
}

/// Prev/Next + More-info keyboard for a search result card.
pub(crate) fn nav_keyboard(
    query: &str,
    page: u32,
    total_pages: u32,
    kind: MediaKind,
    id: u64,
) -> InlineKeyboardMarkup {
    let mut nav_row = Vec::new();
    if page > 1 {
        nav_row.push(InlineKeyboardButton::callback(
            "◀️ Prev",
            format!("tmdb_nav|{query}|{}", page - 1),
        ));
    }
    if page < total_pages {
        nav_row.push(InlineKeyboardButton::callback(
            "Next ▶️",
            format!("tmdb_nav|{query}|{}", page + 1),
        ));
    }

    let mut rows = Vec::new();
    if !nav_row.is_empty() {
        rows.push(nav_row);
    }
    rows.push(vec![InlineKeyboardButton::callback(
        "More info",
        format!("tmdb_info|{}|{}", kind.as_str(), id),
    )]);
    InlineKeyboardMarkup::new(rows)
}

/// One join button per missing channel, each on its own row.
fn join_keyboard(channels: &[String]) -> Option<InlineKeyboardMarkup> {
    let rows: Vec<Vec<InlineKeyboardButton>> = channels
        .iter()
        .filter_map(|c| {
            format!("https://t.me/{c}")
                .parse()
                .ok()
                .map(|url| vec![InlineKeyboardButton::url(format!("Join @{c}"), url)])
        })
        .collect();
    (!rows.is_empty()).then(|| InlineKeyboardMarkup::new(rows))
}

/// Send the card as a photo when a poster is available, text otherwise.
async fn send_card(
    bot: &ThrottledBot,
    chat_id: ChatId,
    reply_to: MessageId,
    details: &MediaDetails,
    caption: &str,
    keyboard: InlineKeyboardMarkup,
) -> anyhow::Result<Message> {
    let poster = details
        .poster
        .as_ref()
        .and_then(|p| p.parse::<url::Url>().ok());

    let sent = match poster {
        Some(url) => {
            bot.send_photo(chat_id, InputFile::url(url))
                .caption(caption)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .reply_parameters(ReplyParameters::new(reply_to))
                .await?
        }
        None => {
            bot.send_message(chat_id, caption)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .reply_parameters(ReplyParameters::new(reply_to))
                .await?
        }
    };
    Ok(sent)
}

/// Delete the result message later, if auto-delete is configured.
fn schedule_auto_delete(bot: &ThrottledBot, state: &AppState, chat_id: ChatId, message_id: MessageId) {
    let Some(delay) = state.auto_delete else {
        return;
    };
    let bot = bot.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(e) = bot.delete_message(chat_id, message_id).await {
            debug!("auto-delete of message {} failed: {}", message_id, e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_year_trailing() {
        assert_eq!(
            split_year("inception 2010"),
            ("inception".to_string(), Some("2010".to_string()))
        );
    }

    #[test]
    fn test_split_year_absent() {
        assert_eq!(split_year("inception"), ("inception".to_string(), None));
    }

    #[test]
    fn test_split_year_mid_query_not_taken() {
        assert_eq!(split_year("2012 the movie"), ("2012 the movie".to_string(), None));
    }

    #[test]
    fn test_year_only_query_stays_a_title() {
        assert_eq!(split_year("2012"), ("2012".to_string(), None));
    }

    fn entry(title: &str, release: &str) -> MediaEntry {
        MediaEntry {
            kind: MediaKind::Movie,
            id: 1,
            title: title.to_string(),
            overview: String::new(),
            rating: 0.0,
            release: release.to_string(),
            poster: None,
        }
    }

    fn search(movies: Vec<MediaEntry>) -> MultiSearch {
        MultiSearch {
            movies,
            tv: Vec::new(),
            page: 1,
            total_pages: 1,
            total_results: 1,
        }
    }

    #[test]
    fn test_filter_by_year_narrows() {
        let results = search(vec![
            entry("Remake", "2021-03-01"),
            entry("Original", "1999-06-11"),
        ]);

        let matched = filter_by_year(&results, Some("1999"));
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Original");
    }

    #[test]
    fn test_filter_by_year_falls_back_when_empty() {
        let results = search(vec![entry("Only", "2021-03-01")]);

        let matched = filter_by_year(&results, Some("1980"));
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Only");
    }
}
