//! Inline query plugin.
//!
//! Lets users search TMDB from any chat by typing `@botname query`.

use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult, InlineQueryResultArticle,
    InputMessageContent, InputMessageContentText, ParseMode,
};
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::tmdb::entry_line;
use crate::utils::{html_escape, truncate_chars};

const INLINE_RESULTS: usize = 8;

/// Handle an inline query with the top search results.
pub async fn inline_query_handler(
    bot: ThrottledBot,
    q: InlineQuery,
    state: AppState,
) -> anyhow::Result<()> {
    let query = q.query.trim();
    if query.is_empty() {
        bot.answer_inline_query(q.id, Vec::<InlineQueryResult>::new())
            .await?;
        return Ok(());
    }

    let results = state.tmdb.search_multi(query, 1).await?;
    debug!(
        "inline query '{}' from {}: {} results",
        query, q.from.id, results.total_results
    );

    let mut answers = Vec::new();
    for entry in results.combined().take(INLINE_RESULTS) {
        let text = format!(
            "{}\n\n{}",
            entry_line(&entry.title, entry.rating, &entry.release),
            html_escape(&truncate_chars(&entry.overview, 200))
        );
        let content = InputMessageContent::Text(
            InputMessageContentText::new(text).parse_mode(ParseMode::Html),
        );
        let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            "More info",
            format!("tmdb_info|{}|{}", entry.kind.as_str(), entry.id),
        )]]);

        let mut article = InlineQueryResultArticle::new(
            format!("{}-{}", entry.id, entry.kind.as_str()),
            entry.title.clone(),
            content,
        )
        .description(truncate_chars(&entry.overview, 64))
        .reply_markup(keyboard);

        if let Some(thumb) = entry.poster.as_ref().and_then(|p| p.parse::<url::Url>().ok()) {
            article = article.thumbnail_url(thumb);
        }

        answers.push(InlineQueryResult::Article(article));
    }

    bot.answer_inline_query(q.id, answers).await?;

    Ok(())
}
