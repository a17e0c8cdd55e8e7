//! Dispatch orchestrator.
//!
//! The only component with cross-cutting state. One dispatch call:
//! 1. Validate the notification (pure, before any side effect)
//! 2. Persist a record and obtain the notification id
//! 3. Bulk-resolve recipient contacts through the directory
//! 4. Fan out to every applicable channel sender, concurrently
//! 5. Merge all partial failures into one error report
//!
//! A hard failure (validation, persistence, directory outage) aborts with
//! an error and no report. Anything after that is best-effort: per-channel
//! and per-recipient failures land in the report and the call still
//! succeeds. Callers must inspect the report to learn about them.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use huddle_common::error::AppError;
use huddle_common::types::Notification;

use crate::channel::{ChannelSender, ResolvedRecipient};
use crate::directory::RecipientDirectory;
use crate::report::ErrorReport;
use crate::store::NotificationStore;

/// Result of a successful dispatch: the persisted record's id plus the
/// partial-failure report. An empty report means full success.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub notification_id: Uuid,
    pub errors: ErrorReport,
}

/// Coordinates one notification through validation, persistence,
/// resolution, and channel fan-out.
pub struct Dispatcher {
    store: Arc<dyn NotificationStore>,
    directory: Arc<dyn RecipientDirectory>,
    senders: Vec<Arc<dyn ChannelSender>>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        directory: Arc<dyn RecipientDirectory>,
        senders: Vec<Arc<dyn ChannelSender>>,
    ) -> Self {
        Self {
            store,
            directory,
            senders,
        }
    }

    /// Dispatch one notification.
    ///
    /// The notification is read-only here; two calls with the same value
    /// create two independent records and two delivery attempts.
    pub async fn dispatch(
        &self,
        notification: &Notification,
    ) -> Result<DispatchOutcome, AppError> {
        if !notification.validate() {
            return Err(AppError::Validation("malformed request body".to_string()));
        }

        let notification_id = self.store.save(notification).await?;
        tracing::info!(
            notification_id = %notification_id,
            notification_type = %notification.notification_type,
            recipients = notification.recipients.len(),
            "notification record created"
        );

        // Deduplicate for the bulk lookup only; the caller's list, order
        // and duplicates included, drives the actual sends.
        let unique_ids: Vec<String> = notification
            .recipients
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let contacts = self.directory.resolve(&unique_ids).await?;

        // Channels that were requested and have something to do.
        let senders: Vec<&Arc<dyn ChannelSender>> = self
            .senders
            .iter()
            .filter(|s| notification.channels.contains(&s.kind()) && s.applies(notification))
            .collect();

        let mut report = ErrorReport::new();

        // A recipient the directory doesn't know is reported once per
        // attempted channel and excluded from the sends; it never aborts
        // the dispatch.
        let mut resolved = Vec::with_capacity(notification.recipients.len());
        for id in &notification.recipients {
            match contacts.get(id) {
                Some(contact) => resolved.push(ResolvedRecipient {
                    id: id.clone(),
                    contact: contact.clone(),
                }),
                None => {
                    for sender in &senders {
                        report.record(sender.kind(), id.clone(), "failed to resolve contact");
                    }
                }
            }
        }

        // Channel sends are independent: run them concurrently and merge
        // each channel's failures only after all of them finished.
        let resolved = &resolved;
        let results = futures::future::join_all(senders.iter().map(|sender| async move {
            (sender.kind(), sender.send(resolved, notification).await)
        }))
        .await;

        for (kind, failures) in results {
            report.merge(kind, failures);
        }

        if report.is_empty() {
            tracing::info!(notification_id = %notification_id, "notification dispatched");
        } else {
            tracing::warn!(
                notification_id = %notification_id,
                failures = report.len(),
                "notification dispatched with partial failures"
            );
        }

        Ok(DispatchOutcome {
            notification_id,
            errors: report,
        })
    }
}
