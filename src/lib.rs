//! Recast — Telegram channel post rewriter.
//!
//! A single bot token drives everything: operators teach the bot
//! find/replace rules over a private chat dialog, and the bot edits
//! every new post in the channels it administers through those rules.
//! One deployment serves one rule set; point a second instance at a
//! second token for a second channel.

pub mod config;
pub mod dialog;
pub mod error;
pub mod relay;
pub mod rewrite;
pub mod rules;
pub mod telegram;
