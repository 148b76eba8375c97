//! Per-session configuration.

use crate::adapter::BatchQuery;
use serde::{Deserialize, Serialize};

/// Number of records requested per collection fetch when unset.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Number of mode transitions a session keeps when unset.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Options a session is created with.
///
/// Deserializes with defaults for missing keys, so a host can keep it in
/// its own configuration file.
///
/// # Example
///
/// ```rust
/// use datasource::session::DatasourceOptions;
///
/// let options = DatasourceOptions::new()
///     .with_batch_size(20)
///     .with_collection_fields(["id", "name"]);
/// assert_eq!(options.batch_size(), 20);
///
/// let from_config: DatasourceOptions = serde_json::from_str("{}").unwrap();
/// assert_eq!(from_config.batch_size(), 50);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasourceOptions {
    /// Fields requested for records of the loaded page.
    pub collection_record_fields: Option<Vec<String>>,
    /// Fields requested for the active record.
    pub active_record_fields: Option<Vec<String>>,
    /// Page size; `0` falls back to [`DEFAULT_BATCH_SIZE`].
    pub batch_size: usize,
    /// Mode transitions kept in the session history; `None` keeps all.
    pub history_limit: Option<usize>,
}

impl Default for DatasourceOptions {
    fn default() -> Self {
        Self {
            collection_record_fields: None,
            active_record_fields: None,
            batch_size: DEFAULT_BATCH_SIZE,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl DatasourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_history_limit(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.history_limit = limit.into();
        self
    }

    pub fn with_collection_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collection_record_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_active_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_record_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Effective page size.
    pub fn batch_size(&self) -> usize {
        if self.batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            self.batch_size
        }
    }

    /// Query for the collection fetch issued by `init`.
    pub fn batch_query(&self) -> BatchQuery {
        BatchQuery {
            columns: self.collection_record_fields.clone(),
            count: Some(self.batch_size()),
        }
    }

    pub fn active_fields(&self) -> Option<&[String]> {
        self.active_record_fields.as_deref()
    }
}
