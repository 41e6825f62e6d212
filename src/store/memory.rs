use super::types::{StoreError, StudentPatch, StudentRecord};
use crate::validation::verify_email;
use tokio::sync::RwLock;

/// Ordered, process-local collection of student records.
///
/// One reader/writer lock covers the whole collection: lookups share the read side while every
/// mutation takes the write side and serializes against all other access. Guards live only for
/// the duration of each method, so callers never observe the lock and never keep references
/// into the collection. Construct one per server (or per test) and share it through an `Arc`.
#[derive(Debug, Default)]
pub struct StudentStore {
    records: RwLock<Vec<StudentRecord>>,
}

impl StudentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new record, returning a snapshot of the whole collection afterwards.
    ///
    /// Duplicate ids are rejected before the email is checked; an empty email is accepted.
    pub async fn insert(&self, record: StudentRecord) -> Result<Vec<StudentRecord>, StoreError> {
        let mut records = self.records.write().await;

        if records.iter().any(|existing| existing.id == record.id) {
            return Err(StoreError::Conflict(record.id));
        }
        if !record.email.is_empty() && !verify_email(&record.email) {
            return Err(StoreError::InvalidEmail(record.email));
        }

        tracing::debug!(id = record.id, "Inserting student record");
        records.push(record);
        Ok(records.clone())
    }

    /// Fetch a copy of the record with `id`.
    pub async fn get(&self, id: i64) -> Result<StudentRecord, StoreError> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Return every record in insertion order; an empty store is reported as [`StoreError::Empty`].
    pub async fn list(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let records = self.records.read().await;
        if records.is_empty() {
            return Err(StoreError::Empty);
        }
        Ok(records.clone())
    }

    /// Apply `patch` to the record with `id` and return the updated record.
    ///
    /// A supplied email is validated before any field is written, so a rejected update leaves
    /// the record untouched.
    pub async fn update(&self, id: i64, patch: &StudentPatch) -> Result<StudentRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Some(email) = patch.effective_email() {
            if !verify_email(email) {
                return Err(StoreError::InvalidEmail(email.to_string()));
            }
        }

        patch.apply_to(record);
        tracing::debug!(id, "Updated student record");
        Ok(record.clone())
    }

    /// Remove the record with `id`, keeping the relative order of the remaining records.
    pub async fn delete(&self, id: i64) -> Result<StudentRecord, StoreError> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|record| record.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = records.remove(index);
        tracing::debug!(id, "Deleted student record");
        Ok(removed)
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
