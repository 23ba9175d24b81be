//! Event handlers for non-command messages.
//!
//! Add new event handlers by creating a file here and branching it in
//! `message_event_handler()`.

pub mod filters;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

/// Build the message event handler.
pub fn message_event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message| msg.chat.is_group() || msg.chat.is_supergroup())
        .endpoint(filters::check_filters)
}
