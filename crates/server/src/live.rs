// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live dispatch event streaming to connected consoles.
//!
//! Events are broadcast to every WebSocket session after the transaction
//! that produced them has committed. Delivery is at most once: a session
//! that falls behind the buffer loses the oldest events and keeps going.
//! Consoles refetch over HTTP when they need authoritative state.

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use cad_dispatch::DispatchEvent;
use futures::{SinkExt, stream::StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::AppState;

/// Maximum number of events buffered per session before older ones drop.
const EVENT_BUFFER_SIZE: usize = 256;

/// Message sent once when a session opens.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SessionMessage {
    Connected {
        /// Server timestamp (RFC 3339).
        timestamp: String,
    },
}

/// Fans dispatch events out to every connected session.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<DispatchEvent>,
}

impl LiveEventBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event. Never blocks; with no sessions the event is dropped.
    pub fn broadcast(&self, event: &DispatchEvent) {
        match self.tx.send(event.clone()) {
            Ok(receivers) => debug!(?event, receivers, "Broadcast dispatch event"),
            Err(_) => debug!(?event, "No live sessions for dispatch event"),
        }
    }

    /// Subscribes to events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DispatchEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Handler for GET `/live`. Upgrades to a WebSocket event stream.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(app_state): AxumState<AppState>,
) -> Response {
    let rx: broadcast::Receiver<DispatchEvent> = app_state.notifier.live().subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, rx))
}

fn connected_message() -> Option<String> {
    let timestamp: String = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));
    serde_json::to_string(&SessionMessage::Connected { timestamp }).ok()
}

async fn handle_socket(socket: WebSocket, mut rx: broadcast::Receiver<DispatchEvent>) {
    info!("Dispatch console connected to live stream");

    let (mut sender, mut receiver) = socket.split();

    if let Some(json) = connected_message()
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => error!(?e, "Failed to serialize dispatch event"),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live session lagged, dropped events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Consoles never send commands over the socket.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Ignoring message from live session");
                }
                Ok(Message::Close(_)) => {
                    debug!("Live session sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("Dispatch console disconnected from live stream");
}
