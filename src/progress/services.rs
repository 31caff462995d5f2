use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::{
    dto::{Envelope, ListEnvelope, RecordEnvelope},
    error::ProgressError,
    repo::ProgressStore,
    repo_types::{ModuleName, ProgressRecord, ProgressUpsert},
};
use crate::auth::Principal;

/// Reads and writes progress on behalf of the caller's principal.
///
/// Holds no state of its own between calls. The principal is passed into
/// every operation and every operation answers with an envelope.
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn ProgressStore>,
}

fn require_principal(principal: Option<Principal>) -> Result<Uuid, ProgressError> {
    principal
        .map(|p| p.user_id)
        .ok_or(ProgressError::AuthenticationMissing)
}

fn require_module_name(raw: Option<&str>) -> Result<ModuleName, ProgressError> {
    raw.and_then(ModuleName::parse)
        .ok_or_else(ProgressError::missing_module_name)
}

fn log_failure(op: &str, err: &ProgressError) {
    match err {
        ProgressError::Store(_) => error!(op, error = %err, "progress store call failed"),
        _ => warn!(op, error = %err, "progress request rejected"),
    }
}

impl ProgressService {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    pub async fn upsert(
        &self,
        principal: Option<Principal>,
        module_name: Option<&str>,
        is_completed: bool,
    ) -> RecordEnvelope {
        match self.try_upsert(principal, module_name, is_completed).await {
            Ok(record) => {
                let message = if is_completed {
                    "Module marked as complete!"
                } else {
                    "Progress updated successfully!"
                };
                Envelope::ok(Some(record)).with_message(message)
            }
            Err(err) => {
                log_failure("upsert", &err);
                Envelope::failed(None, err)
            }
        }
    }

    async fn try_upsert(
        &self,
        principal: Option<Principal>,
        module_name: Option<&str>,
        is_completed: bool,
    ) -> Result<ProgressRecord, ProgressError> {
        let user_id = require_principal(principal)?;
        let module_name = require_module_name(module_name)?;
        let entry = ProgressUpsert {
            user_id,
            module_name,
            is_completed,
            last_accessed: OffsetDateTime::now_utc(),
        };
        let record = self
            .store
            .upsert(&entry)
            .await
            .map_err(|e| ProgressError::store("update", &e))?;
        debug!(%user_id, module = %record.module_name, is_completed, "progress upserted");
        Ok(record)
    }

    pub async fn get(&self, principal: Option<Principal>, module_name: Option<&str>) -> RecordEnvelope {
        match self.try_get(principal, module_name).await {
            Ok(record) => {
                let exists = record.is_some();
                Envelope::ok(record).with_exists(exists)
            }
            Err(err) => {
                log_failure("get", &err);
                Envelope::failed(None, err).with_exists(false)
            }
        }
    }

    async fn try_get(
        &self,
        principal: Option<Principal>,
        module_name: Option<&str>,
    ) -> Result<Option<ProgressRecord>, ProgressError> {
        let user_id = require_principal(principal)?;
        let module_name = require_module_name(module_name)?;
        self.store
            .find(user_id, &module_name)
            .await
            .map_err(|e| ProgressError::store("fetch", &e))
    }

    pub async fn list(&self, principal: Option<Principal>) -> ListEnvelope {
        match self.try_list(principal).await {
            Ok(records) => {
                let count = records.len();
                Envelope::ok(records).with_count(count)
            }
            Err(err) => {
                log_failure("list", &err);
                Envelope::failed(Vec::new(), err).with_count(0)
            }
        }
    }

    async fn try_list(&self, principal: Option<Principal>) -> Result<Vec<ProgressRecord>, ProgressError> {
        let user_id = require_principal(principal)?;
        self.store
            .list(user_id)
            .await
            .map_err(|e| ProgressError::store("fetch", &e))
    }

    pub async fn delete(&self, principal: Option<Principal>, module_name: Option<&str>) -> RecordEnvelope {
        match self.try_delete(principal, module_name).await {
            Ok(()) => Envelope::ok(None).with_message("Progress deleted successfully"),
            Err(err) => {
                log_failure("delete", &err);
                Envelope::failed(None, err)
            }
        }
    }

    async fn try_delete(
        &self,
        principal: Option<Principal>,
        module_name: Option<&str>,
    ) -> Result<(), ProgressError> {
        let user_id = require_principal(principal)?;
        let module_name = require_module_name(module_name)?;
        self.store
            .delete(user_id, &module_name)
            .await
            .map_err(|e| ProgressError::store("delete", &e))
    }
}
