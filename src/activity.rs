//! Tracks when the audience last said anything.

use std::time::Duration;
use tokio::time::Instant;

/// Records the timestamp of the last inbound audience message.
///
/// Starts empty; until the first message is seen the channel is treated as
/// idle for longer than any threshold.
#[derive(Debug, Default)]
pub struct ActivityTracker {
    last_message_at: Option<Instant>,
}

impl ActivityTracker {
    /// Create a tracker that has heard nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that an audience message arrived at `now`.
    pub fn record(&mut self, now: Instant) {
        self.last_message_at = Some(now);
        tracing::debug!(at = ?now, "saw a message");
    }

    /// How long the channel has been silent, or `None` if nothing was ever
    /// heard.
    #[must_use]
    pub fn idle_for(&self, now: Instant) -> Option<Duration> {
        self.last_message_at
            .map(|last| now.saturating_duration_since(last))
    }
}
