//! Per-dispatch error report.
//!
//! Collects the non-fatal failures of one dispatch, keyed by channel and
//! then by recipient identifier. An empty report means every attempted
//! send succeeded. The report is created fresh per dispatch and returned
//! once; it is never a standing object.

use std::collections::BTreeMap;

use serde::Serialize;

use huddle_common::types::ChannelKind;

/// Sentinel recipient key for channel-wide failures that cannot be
/// attributed to a single recipient (e.g. the push batch call failed).
pub const GENERAL_KEY: &str = "general";

/// Failures from one channel attempt, keyed by recipient id (or
/// [`GENERAL_KEY`]) with a human-readable reason.
pub type PartialFailures = BTreeMap<String, String>;

/// Accumulated partial failures of one dispatch.
///
/// Every failure is keyed under its own channel — SMS failures under the
/// sms key, push failures under the push key. Absence of a channel or a
/// recipient means that attempt succeeded (or was never required).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorReport(BTreeMap<ChannelKind, PartialFailures>);

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure for a recipient on a channel. Append-only.
    pub fn record(
        &mut self,
        channel: ChannelKind,
        recipient: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.0
            .entry(channel)
            .or_default()
            .insert(recipient.into(), reason.into());
    }

    /// Record a channel-wide failure under the [`GENERAL_KEY`] sentinel.
    pub fn record_general(&mut self, channel: ChannelKind, reason: impl Into<String>) {
        self.record(channel, GENERAL_KEY, reason);
    }

    /// Fold a channel's partial failures into the report.
    pub fn merge(&mut self, channel: ChannelKind, failures: PartialFailures) {
        for (recipient, reason) in failures {
            self.record(channel, recipient, reason);
        }
    }

    /// Total number of failure entries across all channels.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    /// True when no attempted send failed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Failures recorded for one channel, if any.
    pub fn channel(&self, channel: ChannelKind) -> Option<&PartialFailures> {
        self.0.get(&channel)
    }
}
