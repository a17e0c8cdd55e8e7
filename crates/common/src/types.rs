use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cause of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
pub enum NotificationType {
    EventUpdated,
    Rsvp,
    ExpenseCreated,
    ExpenseUpdated,
    ExpenseDeleted,
    CoHostGranted,
    Generic,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::EventUpdated => write!(f, "event-updated"),
            NotificationType::Rsvp => write!(f, "rsvp"),
            NotificationType::ExpenseCreated => write!(f, "expense-created"),
            NotificationType::ExpenseUpdated => write!(f, "expense-updated"),
            NotificationType::ExpenseDeleted => write!(f, "expense-deleted"),
            NotificationType::CoHostGranted => write!(f, "co-host-granted"),
            NotificationType::Generic => write!(f, "generic"),
        }
    }
}

/// Delivery mechanism for a notification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ChannelKind {
    Push,
    Sms,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelKind::Push => write!(f, "push"),
            ChannelKind::Sms => write!(f, "sms"),
        }
    }
}

/// A delivery intent: what to send, over which channels, to whom.
///
/// Immutable once constructed — the dispatcher only reads it. `channels`
/// is a set, so duplicate channel kinds in the request collapse; the
/// recipient list keeps its order and duplicates (each one is attempted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,

    pub channels: BTreeSet<ChannelKind>,

    /// Recipient identifiers, in caller order.
    #[serde(rename = "to")]
    pub recipients: Vec<String>,

    /// Push payload.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,

    /// SMS payload — deliberately separate from the push payload.
    /// Empty means "do not send SMS", even when the sms channel is requested.
    #[serde(default, rename = "smsMessage")]
    pub sms_message: String,

    /// Opaque key/value pairs forwarded verbatim to the push provider
    /// (e.g. correlation identifiers the client app needs).
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl Notification {
    /// Structural well-formedness check. Pure, no I/O, and must run before
    /// any side effect of a dispatch.
    ///
    /// Unknown channel kinds and notification types are unrepresentable
    /// here (the enums reject them at deserialization), so the remaining
    /// checks are the empty-set ones.
    pub fn validate(&self) -> bool {
        !self.recipients.is_empty() && !self.channels.is_empty()
    }
}

/// Contact record for one recipient, resolved from the recipient directory.
///
/// The directory owns these; the dispatch core only holds a read-only copy
/// for the duration of one dispatch. The push token is an opaque provider
/// token and may be absent or malformed; the phone number may be missing
/// for recipients without SMS capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientContact {
    pub push_token: Option<String>,
    pub phone_number: Option<String>,
}

/// A persisted notification record, as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredNotification {
    pub id: Uuid,
    pub notification_type: NotificationType,
    pub channels: serde_json::Value,
    pub recipients: serde_json::Value,
    pub title: String,
    pub body: String,
    pub sms_message: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Filter for the notification listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationFilter {
    pub notification_type: Option<NotificationType>,
}
