//! Presence-aware automatic responder core.
//!
//! Combines channel eligibility, availability windows, and the reply ledger
//! into the per-message decision procedure, and exposes the administrative
//! command surface plus config-file loading used by transport runtimes.

pub mod auto_responder;
pub mod notice_template;
pub mod reply_ledger;
pub mod responder_commands;
pub mod responder_config;

pub use auto_responder::*;
pub use notice_template::*;
pub use reply_ledger::{ReplyLedger, Reservation};
pub use responder_commands::*;
pub use responder_config::*;
