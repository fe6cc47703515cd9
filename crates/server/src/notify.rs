// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Post-commit notification fan-out: live sessions and the optional webhook.

use std::sync::Arc;
use std::time::Duration;

use cad_dispatch::{DispatchEvent, webhook_payload};
use serde_json::Value;
use tracing::{debug, warn};

use crate::live::LiveEventBroadcaster;

/// Posts webhook payloads. Each delivery runs on its own task.
#[derive(Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    url: String,
}

impl WebhookClient {
    /// Builds a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client: reqwest::Client = reqwest::Client::builder()
            .user_agent(concat!("cad-dispatch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, url })
    }

    fn deliver(&self, payload: Value) {
        let client: reqwest::Client = self.client.clone();
        let url: String = self.url.clone();
        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(status = %response.status(), "Delivered webhook");
                }
                Ok(response) => {
                    warn!(status = %response.status(), "Webhook rejected notification");
                }
                Err(e) => warn!(error = %e, "Webhook delivery failed"),
            }
        });
    }
}

/// Publishes committed events. Never blocks the caller.
#[derive(Clone)]
pub struct Notifier {
    live: Arc<LiveEventBroadcaster>,
    webhook: Option<WebhookClient>,
}

impl Notifier {
    #[must_use]
    pub const fn new(live: Arc<LiveEventBroadcaster>, webhook: Option<WebhookClient>) -> Self {
        Self { live, webhook }
    }

    pub fn live(&self) -> &LiveEventBroadcaster {
        &self.live
    }

    /// Publishes events in order. Call only after the producing transaction
    /// has committed.
    pub fn publish(&self, events: &[DispatchEvent]) {
        for event in events {
            self.live.broadcast(event);
            if let Some(webhook) = &self.webhook
                && let Some(payload) = webhook_payload(event)
            {
                webhook.deliver(payload);
            }
        }
    }
}
