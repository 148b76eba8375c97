//! Data adapter contract.
//!
//! A session never talks to storage directly. It goes through a
//! [`DataAdapter`], which fetches pages and single records and persists
//! new or changed ones. The two fetch operations receive a
//! [`CancellationToken`]; an adapter may observe it to abort I/O early,
//! but the session does not rely on that to stay correct.

mod memory;

pub use memory::MemoryAdapter;

use crate::core::Record;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors an adapter can report.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The operation observed its cancellation token and stopped.
    #[error("Operation cancelled")]
    Cancelled,

    /// The backend refused the request (conflict, validation, ...).
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    /// Transport or storage failure.
    #[error("Backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AdapterError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Parameters of a collection fetch.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct BatchQuery {
    /// Fields to return for each record; `None` means all.
    pub columns: Option<Vec<String>>,
    /// Maximum number of records; `None` means no limit.
    pub count: Option<usize>,
}

/// Source and sink of records for a session.
#[async_trait]
pub trait DataAdapter<R: Record>: Send + Sync {
    /// Up to `query.count` records in the adapter's natural order.
    async fn get_first(
        &self,
        query: BatchQuery,
        cancel: CancellationToken,
    ) -> Result<Vec<R>, AdapterError>;

    /// A single record by id, or `None` if it does not exist.
    async fn get_record(
        &self,
        id: &R::Id,
        columns: Option<&[String]>,
        cancel: CancellationToken,
    ) -> Result<Option<R>, AdapterError>;

    /// Persist a new record, returning it as stored.
    async fn create(&self, record: &R) -> Result<R, AdapterError>;

    /// Persist changes to an existing record.
    ///
    /// `original` is the record as it was loaded, for conflict detection.
    async fn update(&self, record: &R, original: &R) -> Result<R, AdapterError>;
}

#[async_trait]
impl<R, A> DataAdapter<R> for Arc<A>
where
    R: Record,
    A: DataAdapter<R> + ?Sized,
{
    async fn get_first(
        &self,
        query: BatchQuery,
        cancel: CancellationToken,
    ) -> Result<Vec<R>, AdapterError> {
        (**self).get_first(query, cancel).await
    }

    async fn get_record(
        &self,
        id: &R::Id,
        columns: Option<&[String]>,
        cancel: CancellationToken,
    ) -> Result<Option<R>, AdapterError> {
        (**self).get_record(id, columns, cancel).await
    }

    async fn create(&self, record: &R) -> Result<R, AdapterError> {
        (**self).create(record).await
    }

    async fn update(&self, record: &R, original: &R) -> Result<R, AdapterError> {
        (**self).update(record, original).await
    }
}
