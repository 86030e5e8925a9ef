//! Chat transport seam.
//!
//! The bot core never talks to a concrete chat service. It is constructed
//! with a [`ChatConnector`] and a stream of [`ChatEvent`]s, and holds on to
//! whatever [`ChatSession`] the connector resolves. Any transport can be
//! adapted behind these traits; the bundled Twitch adapter lives in
//! [`twitch`].

pub mod twitch;

use async_trait::async_trait;
use std::sync::Arc;

/// A channel member as seen by the transport.
#[derive(Debug, Clone)]
pub struct Chatter {
    /// Account name, lowercase.
    pub name: String,
    /// Whether the member holds moderator privilege in the channel.
    pub is_moderator: bool,
}

/// Inbound message received from the channel.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Author account name. Empty when the transport could not attribute
    /// the message (such messages are dropped by the bot).
    pub author: String,
    /// Moderator flag as tagged by the transport, when it tags one.
    pub is_moderator: bool,
    /// Raw message text.
    pub content: String,
}

/// Events delivered by a chat transport to the bot's event loop.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// The transport is authenticated and ready to join channels.
    Ready,
    /// A message arrived in the joined channel.
    Message(InboundMessage),
}

/// A connected channel handle.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Send a line of text to the channel.
    async fn send(&self, text: &str) -> anyhow::Result<()>;

    /// Look up a channel member by name. `None` when the member is unknown
    /// to the transport.
    async fn lookup_chatter(&self, name: &str) -> Option<Chatter>;

    /// Close the session. Best effort; never blocks shutdown.
    async fn close(&self);
}

/// Resolves channel sessions. `join` is cheap and idempotent; the bot
/// retries it tightly until a session comes back.
#[async_trait]
pub trait ChatConnector: Send + Sync {
    /// Attempt to join the channel, returning a session on success.
    async fn join(&self, channel: &str) -> Option<Arc<dyn ChatSession>>;
}
