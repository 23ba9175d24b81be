//! In-memory saved-reply stores.
//!
//! Replaces what a database would hold in a larger deployment: filters are
//! keyed explicitly, created once at startup, and only removed through the
//! admin commands. Chat filters and global filters live in separate tables
//! because their alert callbacks use separate namespaces.

use std::collections::HashMap;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::utils::ButtonSpec;

/// A saved auto-reply: stripped text, button grid, alert payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedReply {
    /// Trigger keyword (stored lowercase).
    pub keyword: String,
    /// Reply text with button markup stripped.
    pub text: String,
    /// Button rows extracted from the reply.
    pub buttons: Vec<Vec<ButtonSpec>>,
    /// Alert popup texts, indexed by the alert buttons' callback data.
    pub alerts: Vec<String>,
}

impl SavedReply {
    /// Check whether a message triggers this reply.
    pub fn matches(&self, message: &str) -> bool {
        message.to_lowercase().contains(&self.keyword)
    }
}

/// Keyed store for chat-scoped and global saved replies.
#[derive(Debug, Default)]
pub struct FilterStore {
    chat: DashMap<i64, HashMap<String, SavedReply>>,
    global: DashMap<String, SavedReply>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a chat filter, replacing any existing one with the same keyword.
    pub fn save_chat(&self, chat_id: i64, reply: SavedReply) {
        self.chat
            .entry(chat_id)
            .or_default()
            .insert(reply.keyword.clone(), reply);
    }

    pub fn get_chat(&self, chat_id: i64, keyword: &str) -> Option<SavedReply> {
        self.chat
            .get(&chat_id)
            .and_then(|filters| filters.get(&keyword.to_lowercase()).cloned())
    }

    /// Delete a chat filter. Returns whether it existed.
    pub fn delete_chat(&self, chat_id: i64, keyword: &str) -> bool {
        self.chat
            .get_mut(&chat_id)
            .map(|mut filters| filters.remove(&keyword.to_lowercase()).is_some())
            .unwrap_or(false)
    }

    /// Delete all filters of a chat. Returns how many were removed.
    pub fn clear_chat(&self, chat_id: i64) -> usize {
        self.chat
            .remove(&chat_id)
            .map(|(_, filters)| filters.len())
            .unwrap_or(0)
    }

    /// Keywords of a chat's filters, sorted for display.
    pub fn chat_keywords(&self, chat_id: i64) -> Vec<String> {
        let mut keywords: Vec<String> = self
            .chat
            .get(&chat_id)
            .map(|filters| filters.keys().cloned().collect())
            .unwrap_or_default();
        keywords.sort();
        keywords
    }

    /// First chat filter triggered by a message.
    pub fn match_chat(&self, chat_id: i64, message: &str) -> Option<SavedReply> {
        self.chat.get(&chat_id).and_then(|filters| {
            filters
                .values()
                .find(|reply| reply.matches(message))
                .cloned()
        })
    }

    /// Save a global filter, replacing any existing one with the same keyword.
    pub fn save_global(&self, reply: SavedReply) {
        self.global.insert(reply.keyword.clone(), reply);
    }

    pub fn get_global(&self, keyword: &str) -> Option<SavedReply> {
        self.global
            .get(&keyword.to_lowercase())
            .map(|r| r.value().clone())
    }

    /// Delete a global filter. Returns whether it existed.
    pub fn delete_global(&self, keyword: &str) -> bool {
        self.global.remove(&keyword.to_lowercase()).is_some()
    }

    /// Delete all global filters. Returns how many were removed.
    pub fn clear_global(&self) -> usize {
        let count = self.global.len();
        self.global.clear();
        count
    }

    /// Keywords of all global filters, sorted for display.
    pub fn global_keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> =
            self.global.iter().map(|r| r.key().clone()).collect();
        keywords.sort();
        keywords
    }

    /// First global filter triggered by a message.
    pub fn match_global(&self, message: &str) -> Option<SavedReply> {
        self.global
            .iter()
            .find(|r| r.value().matches(message))
            .map(|r| r.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(keyword: &str) -> SavedReply {
        SavedReply {
            keyword: keyword.to_string(),
            text: format!("reply for {keyword}"),
            buttons: Vec::new(),
            alerts: Vec::new(),
        }
    }

    #[test]
    fn test_chat_save_and_match() {
        let store = FilterStore::new();
        store.save_chat(-100, reply("hello"));

        let hit = store.match_chat(-100, "well HELLO there");
        assert_eq!(hit.map(|r| r.keyword), Some("hello".to_string()));
        assert!(store.match_chat(-100, "nothing relevant").is_none());
        assert!(store.match_chat(-200, "well hello there").is_none());
    }

    #[test]
    fn test_chat_delete() {
        let store = FilterStore::new();
        store.save_chat(-100, reply("bye"));

        assert!(store.delete_chat(-100, "bye"));
        assert!(!store.delete_chat(-100, "bye"));
        assert!(store.get_chat(-100, "bye").is_none());
    }

    #[test]
    fn test_save_replaces_same_keyword() {
        let store = FilterStore::new();
        store.save_chat(-100, reply("dup"));
        let mut updated = reply("dup");
        updated.text = "new text".to_string();
        store.save_chat(-100, updated);

        assert_eq!(store.chat_keywords(-100).len(), 1);
        assert_eq!(store.get_chat(-100, "dup").map(|r| r.text), Some("new text".to_string()));
    }

    #[test]
    fn test_clear_chat_counts() {
        let store = FilterStore::new();
        store.save_chat(-100, reply("a"));
        store.save_chat(-100, reply("b"));

        assert_eq!(store.clear_chat(-100), 2);
        assert_eq!(store.clear_chat(-100), 0);
    }

    #[test]
    fn test_global_filters_are_chat_independent() {
        let store = FilterStore::new();
        store.save_global(reply("rules"));

        assert!(store.match_global("read the rules please").is_some());
        assert!(store.match_chat(-100, "read the rules please").is_none());
        assert_eq!(store.global_keywords(), vec!["rules".to_string()]);

        assert_eq!(store.clear_global(), 1);
        assert!(store.match_global("read the rules please").is_none());
    }
}
