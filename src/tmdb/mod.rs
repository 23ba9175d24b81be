//! TMDB integration: REST client, normalized models, text cards.

mod caption;
mod client;
mod models;
mod suggest;

pub use caption::{entry_line, media_card, season_card};
pub use client::{TmdbClient, TmdbError};
pub use models::{MediaDetails, MediaEntry, MediaKind, MultiSearch, Season};
pub use suggest::closest_title;
