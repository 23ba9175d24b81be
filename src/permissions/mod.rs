//! Permission checking and channel-subscription gating.

mod checker;

pub use checker::Permissions;
