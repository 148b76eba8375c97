//! The canonical state of a datasource session.

use super::mode::UpdateMode;
use super::record::Record;
use serde::{Deserialize, Serialize};

/// Serializable snapshot of one session.
///
/// `pointer` is the index of `active_record` within `records`, or `None`
/// when there is no active record or it is not part of the loaded page.
/// In an editing mode the stored pointer is left as it was on entry.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct DatasourceState<R: Record> {
    pub active_record: Option<R>,
    pub original_record: Option<R>,
    pub records: Vec<R>,
    pub pointer: Option<usize>,
    pub update_mode: UpdateMode,
    pub locked: bool,
}

impl<R: Record> Default for DatasourceState<R> {
    fn default() -> Self {
        Self {
            active_record: None,
            original_record: None,
            records: Vec::new(),
            pointer: None,
            update_mode: UpdateMode::Browse,
            locked: false,
        }
    }
}

impl<R: Record> DatasourceState<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_browsing(&self) -> bool {
        self.update_mode.is_browsing()
    }

    /// Index of the active record within `records`, matched by id.
    pub fn locate(&self) -> Option<usize> {
        let id = self.active_record.as_ref()?.id()?;
        self.records
            .iter()
            .position(|record| record.id().as_ref() == Some(&id))
    }

    /// Replace the loaded page.
    ///
    /// The pointer follows the active record only while browsing.
    pub fn set_records(&mut self, records: Vec<R>) {
        self.records = records;
        if self.is_browsing() {
            self.pointer = self.locate();
        }
    }

    /// Replace the active record.
    ///
    /// With `preserve_original` unset the record becomes the new original
    /// and the pointer is recomputed; with it set, only the working copy
    /// changes.
    pub fn set_active_record(&mut self, record: Option<R>, preserve_original: bool) {
        self.active_record = record;
        if !preserve_original {
            self.original_record = self.active_record.clone();
            self.pointer = self.locate();
        }
    }

    pub fn set_update_mode(&mut self, mode: UpdateMode) {
        self.update_mode = mode;
        if mode.is_browsing() {
            self.pointer = self.locate();
        }
    }

    /// Check whether the pointer agrees with the active record and page.
    pub fn pointer_is_consistent(&self) -> bool {
        self.pointer == self.locate()
    }
}
