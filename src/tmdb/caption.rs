//! Text cards for search results and season listings.
//!
//! Rendered with HTML parse mode; all TMDB-sourced strings are escaped.

use crate::utils::{html_escape, truncate_chars};

use super::models::{MediaDetails, MediaKind, Season};

const OVERVIEW_LIMIT: usize = 800;
const EPISODE_OVERVIEW_LIMIT: usize = 120;
const EPISODES_SHOWN: usize = 10;

/// Render the details card shown under a search result.
pub fn media_card(details: &MediaDetails) -> String {
    let mut lines = Vec::new();
    match details.kind {
        MediaKind::Movie => {
            lines.push(format!("🎬 <b>{}</b>", html_escape(&details.title)));
            lines.push(format!("⭐ {:.1}", details.rating));
            let runtime = details
                .runtime
                .map(|r| r.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            lines.push(format!("⏱ {runtime} mins"));
            lines.push(format!("📅 {}", html_escape(&details.release)));
        }
        MediaKind::Tv => {
            lines.push(format!("📺 <b>{}</b>", html_escape(&details.title)));
            lines.push(format!("⭐ {:.1}", details.rating));
            lines.push(format!("Seasons: {}", details.number_of_seasons.unwrap_or(0)));
            lines.push(format!(
                "Episodes: {}",
                details.number_of_episodes.unwrap_or(0)
            ));
        }
    }

    if !details.genres.is_empty() {
        lines.push(format!("🎭 {}", html_escape(&details.genres.join(", "))));
    }

    lines.push(String::new());
    lines.push(html_escape(&truncate_chars(&details.overview, OVERVIEW_LIMIT)));
    lines.join("\n")
}

/// Render a season's episode listing.
pub fn season_card(season: &Season) -> String {
    let mut lines = vec![format!(
        "<b>Season {} — {}</b>",
        season.season_number,
        html_escape(season.name.as_deref().unwrap_or(""))
    )];

    for ep in season.episodes.iter().take(EPISODES_SHOWN) {
        lines.push(format!(
            "{}. {} — {}",
            ep.episode_number,
            html_escape(ep.name.as_deref().unwrap_or("")),
            html_escape(&truncate_chars(
                ep.overview.as_deref().unwrap_or(""),
                EPISODE_OVERVIEW_LIMIT
            ))
        ));
    }

    lines.join("\n")
}

/// One-line summary used in inline-result messages.
pub fn entry_line(title: &str, rating: f64, release: &str) -> String {
    format!("<b>{}</b>\n⭐ {:.1} • {}", html_escape(title), rating, html_escape(release))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::models::{Episode, MediaKind};

    fn movie() -> MediaDetails {
        MediaDetails {
            kind: MediaKind::Movie,
            id: 27205,
            title: "Inception".to_string(),
            overview: "A thief who steals corporate secrets.".to_string(),
            rating: 8.37,
            release: "2010-07-15".to_string(),
            runtime: Some(148),
            number_of_seasons: None,
            number_of_episodes: None,
            seasons: Vec::new(),
            genres: vec!["Action".to_string(), "Sci-Fi".to_string()],
            poster: None,
            backdrop: None,
        }
    }

    #[test]
    fn test_movie_card() {
        let card = media_card(&movie());

        assert!(card.contains("🎬 <b>Inception</b>"));
        assert!(card.contains("⭐ 8.4"));
        assert!(card.contains("⏱ 148 mins"));
        assert!(card.contains("📅 2010-07-15"));
        assert!(card.contains("🎭 Action, Sci-Fi"));
        assert!(card.contains("A thief who steals corporate secrets."));
    }

    #[test]
    fn test_tv_card() {
        let mut details = movie();
        details.kind = MediaKind::Tv;
        details.runtime = None;
        details.number_of_seasons = Some(3);
        details.number_of_episodes = Some(24);

        let card = media_card(&details);

        assert!(card.contains("📺 <b>Inception</b>"));
        assert!(card.contains("Seasons: 3"));
        assert!(card.contains("Episodes: 24"));
        assert!(!card.contains("mins"));
    }

    #[test]
    fn test_card_escapes_html() {
        let mut details = movie();
        details.title = "Kill <Bill>".to_string();

        let card = media_card(&details);
        assert!(card.contains("Kill &lt;Bill&gt;"));
    }

    #[test]
    fn test_season_card_caps_episodes() {
        let season = Season {
            season_number: 2,
            name: Some("Book Two".to_string()),
            overview: None,
            episodes: (1..=15)
                .map(|n| Episode {
                    episode_number: n,
                    name: Some(format!("Episode {n}")),
                    overview: Some("Things happen.".to_string()),
                })
                .collect(),
        };

        let card = season_card(&season);

        assert!(card.contains("Season 2 — Book Two"));
        assert!(card.contains("10. Episode 10"));
        assert!(!card.contains("11. Episode 11"));
    }
}
