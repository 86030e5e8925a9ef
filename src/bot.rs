//! The bot's event loop: one cooperative task that owns all scheduling
//! state and dispatches timer ticks, inbound chat events, and shutdown.
//!
//! The loop owns a single timer slot ([`SchedulerState::deadline`]); each
//! tick classifies the channel, optionally fires a post, and re-arms the
//! slot. Posts are fire-and-forget tasks: the timer-triggered path and the
//! `!snerge` command path may both have a send in flight at once, and the
//! two are deliberately not serialized. An in-flight post is never
//! cancelled by shutdown.

use crate::activity::ActivityTracker;
use crate::chat::{ChatConnector, ChatEvent, ChatSession, InboundMessage};
use crate::commands::{is_loop_back, is_quote_command};
use crate::config::BotConfig;
use crate::decorate::{decorate_with, festive_roll};
use crate::quotes::{QuoteGenerator, QuoteSource};
use crate::scheduler::{classify, pick_delay, SchedulerState, TickBranch};
use crate::shutdown::shutdown;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

/// Announcement sent when the channel is first joined.
const HELLO: &str = "Never fear, Snerge is here!";

/// The quote bot. Construct with the chat and quote collaborators, then
/// drive with [`Bot::run`].
pub struct Bot {
    config: BotConfig,
    connector: Arc<dyn ChatConnector>,
    generator: Arc<QuoteGenerator>,
    session: Option<Arc<dyn ChatSession>>,
    activity: ActivityTracker,
    state: SchedulerState,
    rng: StdRng,
}

impl Bot {
    /// Create a bot over the given collaborators.
    #[must_use]
    pub fn new(
        config: BotConfig,
        connector: Arc<dyn ChatConnector>,
        source: Arc<dyn QuoteSource>,
    ) -> Self {
        Self {
            config,
            connector,
            generator: Arc::new(QuoteGenerator::new(source)),
            session: None,
            activity: ActivityTracker::new(),
            state: SchedulerState::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Seed the bot's random source, making interval selection and the
    /// festive coin deterministic.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Run the event loop until the stop signal fires or the chat event
    /// stream closes.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<ChatEvent>,
        mut stop_rx: oneshot::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                () = wait_until(self.state.deadline) => {
                    self.tick();
                }
                event = events.recv() => match event {
                    Some(ChatEvent::Ready) => self.on_ready().await,
                    Some(ChatEvent::Message(message)) => self.on_message(message).await,
                    None => {
                        if !self.state.stopped {
                            tracing::warn!("chat event stream closed");
                        }
                        break;
                    }
                },
                _ = &mut stop_rx => {
                    shutdown(&mut self.state, self.session.as_ref()).await;
                    break;
                }
            }
        }
    }

    /// Transport is authenticated: resolve a session, greet, start ticking.
    ///
    /// Join is cheap and idempotent, so the retry loop is tight apart from
    /// a cooperative yield.
    async fn on_ready(&mut self) {
        tracing::info!(channel = %self.config.channel, "transport ready, joining");

        while self.session.is_none() {
            match self.connector.join(&self.config.channel).await {
                Some(session) => self.session = Some(session),
                None => tokio::task::yield_now().await,
            }
        }

        if let Some(session) = &self.session {
            if let Err(e) = session.send(HELLO).await {
                tracing::warn!(error = %e, "greeting send failed");
            }
        }

        self.tick();
    }

    /// One scheduler tick: classify, maybe post, re-arm the timer slot.
    fn tick(&mut self) {
        if self.state.stopped {
            return;
        }

        let now = Instant::now();
        self.state.cancel();

        let branch = classify(
            self.session.is_some(),
            self.activity.idle_for(now),
            self.config.chat_active_probe.threshold(),
        );

        let range = match branch {
            TickBranch::StartupProbe => {
                tracing::info!("no channel session yet, probing later");
                self.config.startup_probe
            }
            TickBranch::Backoff => {
                tracing::debug!("chat not active, backing off");
                self.config.chat_active_probe
            }
            TickBranch::Post => {
                self.spawn_post();
                self.config.auto_quote_time
            }
        };

        let delay = pick_delay(range, &mut self.rng);
        tracing::debug!(branch = ?branch, delay_secs = delay.as_secs(), "tick");
        self.state.arm(now, delay);
    }

    /// Handle an inbound channel message: track activity, then run the
    /// moderator-only command path.
    async fn on_message(&mut self, message: InboundMessage) {
        if is_loop_back(&message.author, &self.config.nick) {
            return;
        }

        self.activity.record(Instant::now());

        let Some(session) = self.session.clone() else {
            return;
        };

        // Commands are moderator-only; authorization trusts the roster
        // lookup, not the message's own flag.
        let Some(chatter) = session.lookup_chatter(&message.author).await else {
            return;
        };
        if !chatter.is_moderator {
            return;
        }

        if is_quote_command(&message.content) {
            tracing::info!(author = %message.author, "manual quote requested");
            self.spawn_post();
        }
    }

    /// Fire-and-forget one post: produce, decorate, send. Failures are
    /// logged and never retried; scheduling is unaffected either way.
    fn spawn_post(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };

        let generator = Arc::clone(&self.generator);
        let bounds = self.config.quote_length;
        let festive = festive_roll(&mut self.rng);

        tokio::spawn(async move {
            let quote = generator.produce(bounds);
            tracing::info!(quote = %quote.text, "sending quote");

            let announcement = decorate_with(&quote.text, festive);
            if let Err(e) = session.send(&announcement).await {
                tracing::warn!(error = %e, "quote send failed");
            }
        });
    }
}

/// Sleep until the armed deadline, or forever when no timer is armed.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
