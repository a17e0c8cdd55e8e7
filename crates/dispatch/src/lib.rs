//! Notification dispatch core.
//!
//! Takes a logical [`Notification`](huddle_common::types::Notification),
//! persists a record, resolves each recipient's per-channel contact details,
//! fans out to every requested channel, and returns a single
//! [`DispatchOutcome`](dispatcher::DispatchOutcome) that separates hard
//! failure (nothing attempted) from partial failure (some sends failed,
//! collected in the [`ErrorReport`](report::ErrorReport)).

pub mod channel;
pub mod directory;
pub mod dispatcher;
pub mod push;
pub mod report;
pub mod sms;
pub mod store;
