//! Permission checker with caching.

use std::time::Duration;

use moka::sync::Cache;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatMemberKind, Recipient, UserId};
use tracing::{debug, warn};

/// A user's standing in a chat, as far as this bot cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Owner,
    Admin,
    Member,
}

impl Rank {
    fn from_member_kind(kind: &ChatMemberKind) -> Self {
        match kind {
            ChatMemberKind::Owner(_) => Rank::Owner,
            ChatMemberKind::Administrator(_) => Rank::Admin,
            _ => Rank::Member,
        }
    }
}

/// Cache key for rank lookups.
type RankCacheKey = (i64, u64); // (chat_id, user_id)

/// Permission checker with caching support.
///
/// Bot owners (from OWNER_IDS env) automatically bypass all checks.
#[derive(Clone)]
pub struct Permissions {
    bot: Bot,
    cache: Cache<RankCacheKey, Rank>,
    owner_ids: Vec<u64>,
}

impl Permissions {
    pub fn new(bot: Bot, owner_ids: Vec<u64>) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(300))
            .time_to_idle(Duration::from_secs(120))
            .build();

        Self {
            bot,
            cache,
            owner_ids,
        }
    }

    /// Check if a user is a bot owner.
    #[inline]
    pub fn is_bot_owner(&self, user_id: UserId) -> bool {
        self.owner_ids.contains(&user_id.0)
    }

    async fn rank(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<Rank> {
        let cache_key = (chat_id.0, user_id.0);
        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("rank cache hit for user {} in chat {}", user_id, chat_id);
            return Ok(cached);
        }

        let member = self.bot.get_chat_member(chat_id, user_id).await?;
        let rank = Rank::from_member_kind(&member.kind);
        self.cache.insert(cache_key, rank);
        Ok(rank)
    }

    /// Check if a user is an admin (including the chat owner).
    /// Bot owners always pass.
    pub async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<bool> {
        if self.is_bot_owner(user_id) {
            return Ok(true);
        }
        Ok(self.rank(chat_id, user_id).await? != Rank::Member)
    }

    /// Check if a user is the chat owner.
    /// Bot owners always pass.
    pub async fn is_chat_owner(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<bool> {
        if self.is_bot_owner(user_id) {
            return Ok(true);
        }
        Ok(self.rank(chat_id, user_id).await? == Rank::Owner)
    }

    /// Channels (usernames without `@`) the user has not joined yet.
    ///
    /// Membership is checked live, never cached, so a user who just joined
    /// is let through immediately. A channel the bot cannot inspect is
    /// skipped rather than locking everyone out.
    pub async fn missing_channels(&self, channels: &[String], user_id: UserId) -> Vec<String> {
        let mut missing = Vec::new();
        for channel in channels {
            let recipient = Recipient::ChannelUsername(format!("@{channel}"));
            match self.bot.get_chat_member(recipient, user_id).await {
                Ok(member) => {
                    if matches!(member.kind, ChatMemberKind::Left | ChatMemberKind::Banned(_)) {
                        missing.push(channel.clone());
                    }
                }
                Err(e) => {
                    warn!("membership check failed for @{}: {}", channel, e);
                }
            }
        }
        missing
    }

    /// Invalidate cached rank for a user.
    ///
    /// Call this when admin status might have changed.
    #[allow(dead_code)]
    pub fn invalidate(&self, chat_id: ChatId, user_id: UserId) {
        self.cache.invalidate(&(chat_id.0, user_id.0));
        debug!(
            "Invalidated rank cache for user {} in chat {}",
            user_id, chat_id
        );
    }
}

impl std::fmt::Debug for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Permissions")
            .field("owner_ids", &self.owner_ids)
            .finish()
    }
}
