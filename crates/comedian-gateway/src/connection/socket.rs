//! Socket Mode client
//!
//! Opens a WebSocket through `apps.connections.open`, acknowledges every
//! envelope and forwards Events API callbacks to the bot as chat events.
//! The connection is reopened after a fixed delay whenever Slack drops it.

use std::time::Duration;

use comedian_client::SlackClient;
use comedian_core::ChatEvent;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::GatewayResult;
use crate::events::EventCallback;
use crate::protocol::{ack, parse_frame, EnvelopeKind};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Slack asked for, or caused, a reconnect
    Reconnect,
    /// Shutdown was requested or the bot stopped listening
    Shutdown,
}

pub struct SocketModeClient {
    /// Bound to the app-level token
    slack: SlackClient,
    team_id: String,
    reconnect_delay: Duration,
}

impl SocketModeClient {
    pub fn new(slack: SlackClient, team_id: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            slack,
            team_id: team_id.into(),
            reconnect_delay,
        }
    }

    /// Keep a session open until shutdown
    pub async fn run(self, events: mpsc::Sender<ChatEvent>, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.slack.open_socket_url().await {
                Ok(url) => match run_session(&url, &self.team_id, &events, &mut shutdown).await {
                    Ok(SessionEnd::Shutdown) => break,
                    Ok(SessionEnd::Reconnect) => {
                        info!(team_id = %self.team_id, "Socket Mode session ended, reconnecting");
                    }
                    Err(e) => {
                        warn!(team_id = %self.team_id, error = %e, "Socket Mode session failed");
                    }
                },
                Err(e) => {
                    warn!(team_id = %self.team_id, error = %e, "Failed to open Socket Mode connection");
                }
            }

            tokio::select! {
                _ = shutdown.changed() => break,
                () = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }
        info!(team_id = %self.team_id, "Socket Mode client stopped");
    }
}

/// Drive one WebSocket session
pub async fn run_session(
    url: &str,
    team_id: &str,
    events: &mpsc::Sender<ChatEvent>,
    shutdown: &mut watch::Receiver<bool>,
) -> GatewayResult<SessionEnd> {
    let (stream, _) = connect_async(url).await?;
    let (mut write, mut read) = stream.split();
    debug!(team_id, "Socket Mode connected");

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                let _ = write.send(Message::Close(None)).await;
                return Ok(SessionEnd::Shutdown);
            }
            frame = read.next() => {
                let Some(frame) = frame else {
                    return Ok(SessionEnd::Reconnect);
                };
                let frame = frame?;

                if let Message::Ping(data) = &frame {
                    write.send(Message::Pong(data.clone())).await?;
                    continue;
                }
                if let Message::Close(reason) = &frame {
                    debug!(team_id, ?reason, "Socket Mode closed by server");
                    return Ok(SessionEnd::Reconnect);
                }

                let envelope = match parse_frame(&frame) {
                    Ok(Some(envelope)) => envelope,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!(team_id, error = %e, "Skipping malformed Socket Mode frame");
                        continue;
                    }
                };

                if let Some(id) = &envelope.envelope_id {
                    write.send(ack(id)).await?;
                }

                match envelope.kind {
                    EnvelopeKind::Hello => debug!(team_id, "Socket Mode hello"),
                    EnvelopeKind::Disconnect => {
                        info!(team_id, reason = ?envelope.reason, "Slack requested a reconnect");
                        return Ok(SessionEnd::Reconnect);
                    }
                    EnvelopeKind::EventsApi => {
                        let callback: EventCallback = match serde_json::from_value(envelope.payload) {
                            Ok(callback) => callback,
                            Err(e) => {
                                warn!(team_id, error = %e, "Skipping unreadable event callback");
                                continue;
                            }
                        };
                        if let Some(event) = callback.into_chat_event(team_id) {
                            if events.send(event).await.is_err() {
                                return Ok(SessionEnd::Shutdown);
                            }
                        }
                    }
                    // slash commands arrive over HTTP
                    EnvelopeKind::SlashCommands | EnvelopeKind::Interactive | EnvelopeKind::Unknown => {}
                }
            }
        }
    }
}
