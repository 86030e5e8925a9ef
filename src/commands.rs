//! Inbound command filtering.
//!
//! The only command is `!snerge`, which asks for an immediate quote. It is
//! moderator-only; everything else about an inbound message matters to the
//! bot solely as evidence that chat is alive.

/// The immediate-quote command.
const QUOTE_COMMAND: &str = "!snerge";

/// True when the message content invokes the quote command.
///
/// Matches the bare command or the command followed by arguments, case
/// insensitively. `!snergey` does not match.
#[must_use]
pub fn is_quote_command(content: &str) -> bool {
    let content = content.to_lowercase();
    content == QUOTE_COMMAND || content.starts_with("!snerge ")
}

/// True when a message should be dropped before any processing: the
/// transport could not attribute it, or the bot is talking to itself.
#[must_use]
pub fn is_loop_back(author: &str, own_nick: &str) -> bool {
    author.is_empty() || author.eq_ignore_ascii_case(own_nick)
}
