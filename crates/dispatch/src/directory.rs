//! Recipient directory boundary.
//!
//! The directory owns contact resolution (push token, phone number) per
//! recipient identifier. The dispatch core only consumes the bulk lookup
//! and must be able to tell "this identifier is unknown" (non-fatal,
//! reported per recipient) apart from "the directory is down" (fatal to
//! the whole dispatch).

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use huddle_common::error::AppError;
use huddle_common::types::RecipientContact;

/// Bulk contact lookup.
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    /// Resolve recipient identifiers to contact records.
    ///
    /// `Err` means the directory itself was unavailable. Identifiers absent
    /// from the returned map are individually unknown, which the caller
    /// handles per recipient.
    async fn resolve(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, RecipientContact>, AppError>;
}

/// PostgreSQL-backed recipient directory.
pub struct PgRecipientDirectory {
    pool: PgPool,
}

impl PgRecipientDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientDirectory for PgRecipientDirectory {
    async fn resolve(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, RecipientContact>, AppError> {
        let rows: Vec<(String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT id, push_token, phone_number FROM recipients WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Directory(e.to_string()))?;

        let contacts = rows
            .into_iter()
            .map(|(id, push_token, phone_number)| {
                (
                    id,
                    RecipientContact {
                        push_token,
                        phone_number,
                    },
                )
            })
            .collect();

        Ok(contacts)
    }
}
