//! Push channel adapter.
//!
//! Validates each recipient's push token, then submits every valid token
//! as one batch to an Expo-compatible push provider with the default sound
//! and priority. Token problems are per-recipient failures; a failed batch
//! call is one channel-wide failure (the provider's per-token delivery
//! receipts are not consumed here).

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use serde::Serialize;

use huddle_common::types::{ChannelKind, Notification};

use crate::channel::{ChannelSender, ResolvedRecipient};
use crate::report::{GENERAL_KEY, PartialFailures};

const DEFAULT_SOUND: &str = "default";
const DEFAULT_PRIORITY: &str = "default";

/// One batch request to the push provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushBatch {
    pub to: Vec<String>,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
    pub sound: String,
    pub priority: String,
}

/// Transport boundary to the push provider.
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Submit one batch. An error is a transport/provider failure for the
    /// whole batch.
    async fn send_batch(&self, batch: &PushBatch) -> anyhow::Result<()>;
}

/// Returns true when the token has the opaque Expo wire shape
/// `ExponentPushToken[...]` (or the legacy `ExpoPushToken[...]` prefix).
pub fn is_valid_push_token(token: &str) -> bool {
    let inner = token
        .strip_prefix("ExponentPushToken[")
        .or_else(|| token.strip_prefix("ExpoPushToken["));
    matches!(inner.and_then(|rest| rest.strip_suffix(']')), Some(t) if !t.is_empty())
}

/// Push channel sender.
pub struct PushSender {
    gateway: Arc<dyn PushGateway>,
}

impl PushSender {
    pub fn new(gateway: Arc<dyn PushGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ChannelSender for PushSender {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Push
    }

    async fn send(
        &self,
        recipients: &[ResolvedRecipient],
        notification: &Notification,
    ) -> PartialFailures {
        let mut failures = PartialFailures::new();

        let mut tokens = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            match recipient
                .contact
                .push_token
                .as_deref()
                .filter(|t| is_valid_push_token(t))
            {
                Some(token) => tokens.push(token.to_string()),
                None => {
                    failures.insert(
                        recipient.id.clone(),
                        "failed to get push token".to_string(),
                    );
                }
            }
        }

        if tokens.is_empty() {
            return failures;
        }

        let batch = PushBatch {
            to: tokens,
            title: notification.title.clone(),
            body: notification.body.clone(),
            data: notification.data.clone(),
            sound: DEFAULT_SOUND.to_string(),
            priority: DEFAULT_PRIORITY.to_string(),
        };

        if let Err(err) = self.gateway.send_batch(&batch).await {
            tracing::warn!(error = %err, "push batch failed");
            failures.insert(
                GENERAL_KEY.to_string(),
                format!("failed to send push: {}", err),
            );
        }

        failures
    }
}

/// Expo-compatible HTTP push gateway.
pub struct ExpoPushGateway {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl ExpoPushGateway {
    pub fn new(endpoint: String, access_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            access_token,
        }
    }
}

#[async_trait]
impl PushGateway for ExpoPushGateway {
    async fn send_batch(&self, batch: &PushBatch) -> anyhow::Result<()> {
        let mut request = self.client.post(&self.endpoint).json(&[batch]);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("push provider request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("push provider returned {}", status);
        }

        tracing::debug!(recipients = batch.to.len(), "push batch accepted");
        Ok(())
    }
}
