//! In-memory adapter over an ordered list of records.

use super::{AdapterError, BatchQuery, DataAdapter};
use crate::core::Record;
use async_trait::async_trait;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

type IdAssigner<R> = Box<dyn Fn(&mut R, &[R]) + Send + Sync>;

/// Adapter that keeps records in memory, in insertion order.
///
/// Column selections are accepted but ignored: whole records are always
/// returned. `update` rejects a change when the stored record no longer
/// equals the `original` the caller loaded.
///
/// # Example
///
/// ```rust
/// use datasource::adapter::MemoryAdapter;
/// use datasource::core::{DynRecord, Record};
///
/// let adapter = MemoryAdapter::new(vec![DynRecord::new().with("id", 1)])
///     .with_id_assigner(|record: &mut DynRecord, existing: &[DynRecord]| {
///         let next = existing.len() as i64 + 1;
///         let _ = record.set_field("id", next.into());
///     });
/// assert_eq!(adapter.len(), 1);
/// ```
pub struct MemoryAdapter<R: Record> {
    records: RwLock<Vec<R>>,
    assign_id: Option<IdAssigner<R>>,
}

impl<R: Record> MemoryAdapter<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
            assign_id: None,
        }
    }

    /// Set the function that gives created records their id.
    ///
    /// It receives the new record and the records already stored.
    pub fn with_id_assigner<F>(mut self, assign: F) -> Self
    where
        F: Fn(&mut R, &[R]) + Send + Sync + 'static,
    {
        self.assign_id = Some(Box::new(assign));
        self
    }

    /// Copy of the stored records.
    pub fn records(&self) -> Vec<R> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn position_of(records: &[R], id: &R::Id) -> Option<usize> {
        records.iter().position(|r| r.id().as_ref() == Some(id))
    }
}

#[async_trait]
impl<R: Record> DataAdapter<R> for MemoryAdapter<R> {
    async fn get_first(
        &self,
        query: BatchQuery,
        cancel: CancellationToken,
    ) -> Result<Vec<R>, AdapterError> {
        if cancel.is_cancelled() {
            return Err(AdapterError::Cancelled);
        }
        let records = self.records.read();
        let count = query.count.unwrap_or(records.len());
        Ok(records.iter().take(count).cloned().collect())
    }

    async fn get_record(
        &self,
        id: &R::Id,
        _columns: Option<&[String]>,
        cancel: CancellationToken,
    ) -> Result<Option<R>, AdapterError> {
        if cancel.is_cancelled() {
            return Err(AdapterError::Cancelled);
        }
        let records = self.records.read();
        Ok(Self::position_of(&records, id).map(|index| records[index].clone()))
    }

    async fn create(&self, record: &R) -> Result<R, AdapterError> {
        let mut records = self.records.write();
        let mut created = record.clone();
        if let Some(assign) = &self.assign_id {
            assign(&mut created, &records);
        }
        if let Some(id) = created.id() {
            if Self::position_of(&records, &id).is_some() {
                return Err(AdapterError::rejected(format!(
                    "a record with id {id:?} already exists"
                )));
            }
        }
        records.push(created.clone());
        Ok(created)
    }

    async fn update(&self, record: &R, original: &R) -> Result<R, AdapterError> {
        let id = original
            .id()
            .ok_or_else(|| AdapterError::rejected("original record has no id"))?;
        let mut records = self.records.write();
        let index = Self::position_of(&records, &id)
            .ok_or_else(|| AdapterError::rejected(format!("no record with id {id:?}")))?;
        if records[index] != *original {
            return Err(AdapterError::rejected(
                "record changed since it was loaded",
            ));
        }
        records[index] = record.clone();
        Ok(record.clone())
    }
}
