//! Snerge: an unattended chat bot that posts generated quotes at adaptive
//! intervals.
//!
//! # Architecture
//!
//! One cooperative event loop ([`bot::Bot`]) owns all scheduling state and
//! reacts to three inputs: its own self-armed timer, inbound chat events,
//! and the stop signal. Everything the loop needs from the outside world is
//! injected behind narrow traits:
//! - **Chat transport**: [`chat::ChatConnector`] / [`chat::ChatSession`]
//!   (bundled Twitch IRC-over-WebSocket adapter in [`chat::twitch`])
//! - **Quote generation**: [`quotes::QuoteSource`], wrapped by the
//!   bounded-retry [`quotes::QuoteGenerator`]
//!
//! Each timer tick classifies the channel — no session yet, chat gone
//! quiet, or chat active — and picks the next delay accordingly; only the
//! active branch posts a quote.

pub mod activity;
pub mod bot;
pub mod chat;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod decorate;
pub mod error;
pub mod guesses;
pub mod quotes;
pub mod scheduler;
pub mod shutdown;

pub use bot::Bot;
pub use config::BotConfig;
pub use error::{BotError, Result};
