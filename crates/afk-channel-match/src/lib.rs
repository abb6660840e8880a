//! Channel eligibility resolution for the afk responder.
//!
//! Decides whether a conversation space (plain channel, thread, or forum) is
//! monitored, from static keyword/id configuration and the space's parent
//! chain.

pub mod channel_matcher;
pub mod conversation_space;
pub mod monitor_config;

pub use channel_matcher::*;
pub use conversation_space::*;
pub use monitor_config::*;
