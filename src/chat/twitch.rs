//! Twitch chat adapter: IRC over WebSocket.
//!
//! Covers exactly what the bot needs from the protocol: PASS/NICK
//! authentication with tag capabilities, PING/PONG keepalive, JOIN
//! confirmation, PRIVMSG parsing, and a roster of seen chatters backing
//! `lookup_chatter` (Twitch tags every message with the author's badges,
//! so the roster learns moderator status as people talk).

use crate::chat::{ChatConnector, ChatEvent, ChatSession, Chatter, InboundMessage};
use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

const CHAT_URL: &str = "wss://irc-ws.chat.twitch.tv:443";

/// How long `join` waits for the server to confirm channel membership.
const JOIN_CONFIRM_TIMEOUT: Duration = Duration::from_secs(5);

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Shared connection internals: outbound sink plus state learned from the
/// inbound stream.
struct Connection {
    sink: tokio::sync::Mutex<WsSink>,
    /// Channels the server has confirmed we are in.
    joined: Mutex<Vec<String>>,
    /// Moderator status per seen chatter, learned from message tags.
    roster: Mutex<HashMap<String, bool>>,
}

impl Connection {
    async fn send_line(&self, line: &str) -> anyhow::Result<()> {
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(format!("{line}\r\n"))).await?;
        Ok(())
    }
}

/// Connector for Twitch chat. Obtain one with [`connect`].
pub struct TwitchConnector {
    connection: Arc<Connection>,
}

/// Connect and authenticate against Twitch chat.
///
/// Returns the connector and the stream of [`ChatEvent`]s; `Ready` arrives
/// once the server accepts the login.
///
/// # Errors
///
/// Returns an error if the WebSocket connection or the auth handshake
/// cannot be initiated. A rejected token surfaces later as a closed event
/// stream.
pub async fn connect(
    nick: &str,
    token: &str,
) -> anyhow::Result<(Arc<TwitchConnector>, mpsc::Receiver<ChatEvent>)> {
    if token.trim().is_empty() {
        anyhow::bail!("twitch oauth token is empty");
    }

    let (stream, _) = connect_async(CHAT_URL).await?;
    let (sink, source) = stream.split();

    let connection = Arc::new(Connection {
        sink: tokio::sync::Mutex::new(sink),
        joined: Mutex::new(Vec::new()),
        roster: Mutex::new(HashMap::new()),
    });

    connection
        .send_line("CAP REQ :twitch.tv/tags twitch.tv/commands")
        .await?;
    connection.send_line(&format!("PASS oauth:{token}")).await?;
    connection
        .send_line(&format!("NICK {}", nick.to_lowercase()))
        .await?;

    let (event_tx, event_rx) = mpsc::channel(256);
    tokio::spawn(read_loop(Arc::clone(&connection), source, event_tx));

    Ok((Arc::new(TwitchConnector { connection }), event_rx))
}

#[async_trait]
impl ChatConnector for TwitchConnector {
    async fn join(&self, channel: &str) -> Option<Arc<dyn ChatSession>> {
        let channel = channel.to_lowercase();

        if let Err(e) = self.connection.send_line(&format!("JOIN #{channel}")).await {
            tracing::warn!(error = %e, "join send failed");
            return None;
        }

        // The read loop records the channel once the server confirms.
        let deadline = tokio::time::Instant::now() + JOIN_CONFIRM_TIMEOUT;
        loop {
            if self.is_joined(&channel) {
                break;
            }
            if tokio::time::Instant::now() >= deadline {
                tracing::debug!(channel = %channel, "join not confirmed yet");
                return None;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        Some(Arc::new(TwitchSession {
            channel,
            connection: Arc::clone(&self.connection),
        }))
    }
}

impl TwitchConnector {
    fn is_joined(&self, channel: &str) -> bool {
        self.connection
            .joined
            .lock()
            .map(|joined| joined.iter().any(|c| c == channel))
            .unwrap_or(false)
    }
}

/// A joined Twitch channel.
struct TwitchSession {
    channel: String,
    connection: Arc<Connection>,
}

#[async_trait]
impl ChatSession for TwitchSession {
    async fn send(&self, text: &str) -> anyhow::Result<()> {
        self.connection
            .send_line(&format!("PRIVMSG #{} :{text}", self.channel))
            .await
    }

    async fn lookup_chatter(&self, name: &str) -> Option<Chatter> {
        let name = name.to_lowercase();
        let roster = self.connection.roster.lock().ok()?;
        roster.get(&name).map(|&is_moderator| Chatter {
            name: name.clone(),
            is_moderator,
        })
    }

    async fn close(&self) {
        let mut sink = self.connection.sink.lock().await;
        if let Err(e) = sink.send(Message::Close(None)).await {
            tracing::debug!(error = %e, "websocket close failed");
        }
    }
}

/// Inbound pump: answers keepalives, learns roster/join state, forwards
/// chat messages. Ends when the server closes the stream.
async fn read_loop(
    connection: Arc<Connection>,
    mut source: impl futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
        + Unpin,
    event_tx: mpsc::Sender<ChatEvent>,
) {
    while let Some(message) = source.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "twitch stream error");
                break;
            }
        };

        // A websocket frame can carry several IRC lines.
        for line in text.lines().filter(|l| !l.is_empty()) {
            let Some(irc) = IrcLine::parse(line) else {
                continue;
            };

            match irc.command.as_str() {
                "PING" => {
                    let target = irc.trailing.as_deref().unwrap_or("tmi.twitch.tv");
                    if let Err(e) = connection.send_line(&format!("PONG :{target}")).await {
                        tracing::warn!(error = %e, "pong failed");
                    }
                }
                // Login accepted.
                "001" => {
                    tracing::info!("twitch login accepted");
                    let _ = event_tx.send(ChatEvent::Ready).await;
                }
                // End of NAMES: channel membership confirmed.
                "366" => {
                    if let Some(channel) = irc.params.get(1) {
                        let channel = channel.trim_start_matches('#').to_owned();
                        if let Ok(mut joined) = connection.joined.lock() {
                            if !joined.contains(&channel) {
                                joined.push(channel);
                            }
                        }
                    }
                }
                "PRIVMSG" => {
                    let author = irc.author.clone().unwrap_or_default();
                    let is_moderator = irc.is_moderator();

                    if !author.is_empty() {
                        if let Ok(mut roster) = connection.roster.lock() {
                            roster.insert(author.clone(), is_moderator);
                        }
                    }

                    let event = ChatEvent::Message(InboundMessage {
                        author,
                        is_moderator,
                        content: irc.trailing.clone().unwrap_or_default(),
                    });
                    if event_tx.send(event).await.is_err() {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    tracing::info!("twitch stream ended");
}

/// One parsed IRC line: optional tags, optional author prefix, command,
/// middle params, optional trailing text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IrcLine {
    tags: HashMap<String, String>,
    author: Option<String>,
    command: String,
    params: Vec<String>,
    trailing: Option<String>,
}

impl IrcLine {
    fn parse(line: &str) -> Option<Self> {
        let mut rest = line;

        let mut tags = HashMap::new();
        if let Some(tagged) = rest.strip_prefix('@') {
            let (tag_str, remainder) = tagged.split_once(' ')?;
            for tag in tag_str.split(';') {
                match tag.split_once('=') {
                    Some((key, value)) => tags.insert(key.to_owned(), value.to_owned()),
                    None => tags.insert(tag.to_owned(), String::new()),
                };
            }
            rest = remainder;
        }

        let mut author = None;
        if let Some(prefixed) = rest.strip_prefix(':') {
            let (prefix, remainder) = prefixed.split_once(' ')?;
            author = prefix.split('!').next().map(str::to_owned);
            rest = remainder;
        }

        let (middle, trailing) = match rest.split_once(" :") {
            Some((middle, trailing)) => (middle, Some(trailing.to_owned())),
            None => (rest, None),
        };

        let mut parts = middle.split_ascii_whitespace();
        let command = parts.next()?.to_owned();
        let params = parts.map(str::to_owned).collect();

        Some(Self {
            tags,
            author,
            command,
            params,
            trailing,
        })
    }

    /// Moderator (or broadcaster) according to the line's tags.
    fn is_moderator(&self) -> bool {
        if self.tags.get("mod").is_some_and(|v| v == "1") {
            return true;
        }
        self.tags
            .get("badges")
            .is_some_and(|badges| badges.contains("broadcaster/"))
    }
}
