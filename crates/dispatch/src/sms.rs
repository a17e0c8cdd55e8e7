//! SMS channel adapter.
//!
//! Sends the notification's dedicated SMS payload to each recipient with a
//! phone number, one provider call per recipient. Recipients without a
//! phone number are skipped silently — not every account is expected to
//! have SMS capability. An empty SMS payload suppresses the channel
//! entirely, even when it was requested.

use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;

use huddle_common::types::{ChannelKind, Notification};

use crate::channel::{ChannelSender, ResolvedRecipient};
use crate::report::PartialFailures;

/// Transport boundary to the SMS provider. One call per message.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, message: &str, phone_number: &str) -> anyhow::Result<()>;
}

/// SMS channel sender.
pub struct SmsSender {
    gateway: Arc<dyn SmsGateway>,
}

impl SmsSender {
    pub fn new(gateway: Arc<dyn SmsGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ChannelSender for SmsSender {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    /// No SMS payload means the channel is a no-op, not an error.
    fn applies(&self, notification: &Notification) -> bool {
        !notification.sms_message.is_empty()
    }

    async fn send(
        &self,
        recipients: &[ResolvedRecipient],
        notification: &Notification,
    ) -> PartialFailures {
        let mut failures = PartialFailures::new();

        for recipient in recipients {
            let Some(phone) = recipient
                .contact
                .phone_number
                .as_deref()
                .filter(|p| !p.is_empty())
            else {
                continue;
            };

            // One attempt per recipient; a failure here never stops the rest.
            if let Err(err) = self.gateway.send(&notification.sms_message, phone).await {
                tracing::warn!(recipient = %recipient.id, error = %err, "sms send failed");
                failures.insert(recipient.id.clone(), format!("failed to send SMS: {}", err));
            }
        }

        failures
    }
}

/// Twilio-compatible HTTP SMS gateway.
pub struct TwilioSmsGateway {
    client: reqwest::Client,
    api_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSmsGateway {
    pub fn new(api_url: String, account_sid: String, auth_token: String, from_number: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            account_sid,
            auth_token,
            from_number,
        }
    }
}

#[async_trait]
impl SmsGateway for TwilioSmsGateway {
    async fn send(&self, message: &str, phone_number: &str) -> anyhow::Result<()> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_url, self.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", phone_number),
                ("From", self.from_number.as_str()),
                ("Body", message),
            ])
            .send()
            .await
            .context("sms provider request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("sms provider returned {}", status);
        }

        Ok(())
    }
}
