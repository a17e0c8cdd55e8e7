//! Channel sender capability.
//!
//! Each delivery channel implements [`ChannelSender`] and owns its
//! provider's send semantics and failure taxonomy. The dispatcher only
//! iterates its registered senders; adding a channel means adding an
//! implementation, never a branch in the dispatcher.

use async_trait::async_trait;

use huddle_common::types::{ChannelKind, Notification, RecipientContact};

use crate::report::PartialFailures;

/// A recipient paired with its resolved contact record, in the order the
/// caller listed it. Duplicates in the request appear here twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecipient {
    pub id: String,
    pub contact: RecipientContact,
}

/// One delivery channel.
///
/// `send` attempts delivery to every recipient it can and reports what
/// failed; it never returns an error. A channel-wide failure goes under
/// the [`GENERAL_KEY`](crate::report::GENERAL_KEY) sentinel. Senders are
/// stateless given their inputs and safe to invoke concurrently with each
/// other.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// The channel this sender serves.
    fn kind(&self) -> ChannelKind;

    /// Whether this channel has anything to do for the notification.
    /// Returning false is a valid no-op path, not a failure.
    fn applies(&self, _notification: &Notification) -> bool {
        true
    }

    /// Attempt delivery to the given recipients, once each. No retries.
    async fn send(
        &self,
        recipients: &[ResolvedRecipient],
        notification: &Notification,
    ) -> PartialFailures;
}
