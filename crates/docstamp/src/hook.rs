use crate::{path::AttrPath, schema::DocumentView, types::Duration, value::Value};
use serde::Serialize;
use thiserror::Error as ThisError;

///
/// HookError
///

#[derive(Debug, ThisError)]
pub enum HookError {
    #[error("document has no creation timestamp at '{path}'")]
    MissingCreationDate { path: AttrPath },

    #[error("attribute at '{path}' is not a timestamp")]
    NotATimestamp { path: AttrPath },
}

///
/// PrePersistHook
///
/// Fixes the persisted expiration value at document creation:
/// `expires_path = read(date_path) + ttl`. The TTL is captured when the
/// schema is configured; documents keep the expiration they were created
/// with even if the configuration changes later.
///

#[derive(Clone, Debug, Serialize)]
pub struct PrePersistHook {
    date_path: AttrPath,
    expires_path: AttrPath,
    ttl: Duration,
}

impl PrePersistHook {
    #[must_use]
    pub const fn new(date_path: AttrPath, expires_path: AttrPath, ttl: Duration) -> Self {
        Self {
            date_path,
            expires_path,
            ttl,
        }
    }

    #[must_use]
    pub const fn expires_path(&self) -> &AttrPath {
        &self.expires_path
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Pure computation step run by the host's creation flow. Returns the
    /// attribute update to apply, or `None` when the document is not new
    /// (the hook must no-op on updates).
    pub fn apply(
        &self,
        is_new: bool,
        doc: &dyn DocumentView,
    ) -> Result<Option<(AttrPath, Value)>, HookError> {
        if !is_new {
            return Ok(None);
        }

        let value = doc.get(&self.date_path).ok_or_else(|| {
            HookError::MissingCreationDate {
                path: self.date_path.clone(),
            }
        })?;
        let created = value.as_timestamp().ok_or_else(|| HookError::NotATimestamp {
            path: self.date_path.clone(),
        })?;

        Ok(Some((
            self.expires_path.clone(),
            Value::Timestamp(created + self.ttl),
        )))
    }
}
