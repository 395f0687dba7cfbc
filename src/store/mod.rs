mod file;
mod memory;
mod redis;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis::RedisStore;

use crate::constants::{VACATIONS_KEY, VACATION_INDEX_KEY};
use crate::error::{AppError, Result};
use crate::models::{PlannedVacation, VacationList};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Opaque string key-value storage. Values are written whole and read whole.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    /// Removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;
    async fn health_check(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

/// Typed access to the stored vacation list and the "current" index.
///
/// Read-modify-write operations are serialized through an internal lock so
/// two concurrent saves cannot drop each other's vacation.
#[derive(Clone)]
pub struct VacationRepository {
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl VacationRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        VacationRepository {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }

    /// The stored list, or an empty one if nothing was saved yet
    pub async fn load(&self) -> Result<VacationList> {
        match self.store.get(VACATIONS_KEY).await? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                AppError::Storage(format!("Stored vacation list is unreadable: {}", e))
            }),
            None => Ok(VacationList::new()),
        }
    }

    pub async fn save(&self, list: &VacationList) -> Result<()> {
        let json = serde_json::to_string(list)?;
        self.store.set(VACATIONS_KEY, json).await
    }

    pub async fn current_index(&self) -> Result<Option<usize>> {
        match self.store.get(VACATION_INDEX_KEY).await? {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| AppError::Storage(format!("Stored vacation index '{}' is not a number", raw))),
            None => Ok(None),
        }
    }

    pub async fn set_current_index(&self, index: usize) -> Result<()> {
        self.store.set(VACATION_INDEX_KEY, index.to_string()).await
    }

    /// The vacation at `index`, which becomes the current one.
    pub async fn select(&self, index: usize) -> Result<PlannedVacation> {
        let _guard = self.write_lock.lock().await;
        let list = self.load().await?;
        let vacation = list.get(index)?.clone();
        self.set_current_index(index).await?;
        Ok(vacation)
    }

    /// Add a vacation to the sorted list, persist it, and make it current.
    /// Returns its index in the list.
    pub async fn add(&self, vacation: PlannedVacation) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;
        let index = list.add(vacation);
        self.save(&list).await?;
        self.set_current_index(index).await?;
        tracing::info!(index, total = list.len(), "Vacation saved at index {}", index);
        Ok(index)
    }

    /// Delete a vacation. The current index keeps pointing at the same
    /// vacation, and is cleared if that vacation is the one deleted.
    pub async fn remove(&self, index: usize) -> Result<PlannedVacation> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;
        let removed = list.remove(index)?;
        self.save(&list).await?;

        match self.current_index().await? {
            Some(current) if current == index => self.store.delete(VACATION_INDEX_KEY).await?,
            Some(current) if current > index => self.set_current_index(current - 1).await?,
            _ => {}
        }
        tracing::info!(index, name = %removed.name, "Vacation '{}' deleted", removed.name);
        Ok(removed)
    }
}
