use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use super::repo::ProgressStore;
use super::repo_types::{ModuleName, ProgressRecord, ProgressUpsert};

#[derive(Debug, Clone)]
struct Slot {
    record: ProgressRecord,
    // write order, breaks ties between equal timestamps
    seq: u64,
}

#[derive(Default)]
struct Inner {
    rows: HashMap<(Uuid, String), Slot>,
    next_seq: u64,
    fail_with: Option<String>,
}

/// `ProgressStore` kept in a map, used by tests in place of Postgres.
#[derive(Clone, Default)]
pub struct MemoryProgressStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail with `msg`, standing in for a store outage.
    pub fn fail_with(&self, msg: &str) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.fail_with = Some(msg.to_string());
        }
    }

    pub fn row_count(&self) -> usize {
        self.inner.lock().map(|g| g.rows.len()).unwrap_or(0)
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> anyhow::Result<T> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| anyhow::anyhow!("memory store poisoned: {e}"))?;
        if let Some(msg) = &guard.fail_with {
            anyhow::bail!("{msg}");
        }
        Ok(f(&mut guard))
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn upsert(&self, entry: &ProgressUpsert) -> anyhow::Result<ProgressRecord> {
        self.with_inner(|inner| {
            inner.next_seq += 1;
            let seq = inner.next_seq;
            let key = (entry.user_id, entry.module_name.as_str().to_string());
            let slot = inner.rows.entry(key).or_insert_with(|| Slot {
                record: ProgressRecord {
                    id: Uuid::new_v4(),
                    user_id: entry.user_id,
                    module_name: entry.module_name.as_str().to_string(),
                    is_completed: entry.is_completed,
                    last_accessed: entry.last_accessed,
                    created_at: entry.last_accessed,
                },
                seq,
            });
            slot.record.is_completed = entry.is_completed;
            slot.record.last_accessed = entry.last_accessed;
            slot.seq = seq;
            slot.record.clone()
        })
    }

    async fn find(
        &self,
        user_id: Uuid,
        module_name: &ModuleName,
    ) -> anyhow::Result<Option<ProgressRecord>> {
        self.with_inner(|inner| {
            inner
                .rows
                .get(&(user_id, module_name.as_str().to_string()))
                .map(|slot| slot.record.clone())
        })
    }

    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<ProgressRecord>> {
        self.with_inner(|inner| {
            let mut slots: Vec<&Slot> = inner
                .rows
                .values()
                .filter(|slot| slot.record.user_id == user_id)
                .collect();
            slots.sort_by(|a, b| {
                b.record
                    .last_accessed
                    .cmp(&a.record.last_accessed)
                    .then(b.seq.cmp(&a.seq))
            });
            slots.into_iter().map(|slot| slot.record.clone()).collect()
        })
    }

    async fn delete(&self, user_id: Uuid, module_name: &ModuleName) -> anyhow::Result<()> {
        self.with_inner(|inner| {
            inner.rows.remove(&(user_id, module_name.as_str().to_string()));
        })
    }
}
