//! Editing commands.
//!
//! `edit`, `add` and `copy` leave `Browse`; `save` and `cancel` return to
//! it; `update` and `patch` change the working copy of the active record
//! in between. Entering an editing mode supersedes any outstanding record
//! fetch so a late positioning result cannot replace the record being
//! edited.

use super::fetch::FetchKind;
use super::lock::LockGuard;
use super::Session;
use crate::adapter::DataAdapter;
use crate::core::{validate_fields, Action, FieldError, Record, UpdateMode};
use crate::error::{Result, SessionError};
use serde_json::Value;
use stillwater::validation::Validation;
use tracing::{debug, warn};

/// How a save reaches the adapter.
enum Persist<R> {
    Create,
    Update { original: R },
}

impl<R: Record, A: DataAdapter<R>> Session<R, A> {
    /// Start editing the active record in place.
    ///
    /// Requires an original record to compare against when saving.
    pub fn edit(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.guard(self.id, Action::Edit)?;
        if inner.state.original_record.is_none() {
            return Err(SessionError::MissingOriginal { session: self.id });
        }
        inner.fetches.supersede(FetchKind::Record);
        inner.transition(self.id, Action::Edit);
        Ok(())
    }

    /// Start editing a new record.
    ///
    /// The new record has the active record's fields with every value
    /// cleared, or no fields at all if nothing is active. The original
    /// record and the stored pointer are kept.
    pub fn add(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.guard(self.id, Action::Add)?;
        let blank = inner
            .state
            .active_record
            .as_ref()
            .map(R::cleared)
            .unwrap_or_else(R::empty);
        inner.fetches.supersede(FetchKind::Record);
        inner.state.set_active_record(Some(blank), true);
        inner.transition(self.id, Action::Add);
        Ok(())
    }

    /// Start editing a duplicate of the active record.
    pub fn copy(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.guard(self.id, Action::Copy)?;
        let duplicate = inner
            .state
            .active_record
            .clone()
            .unwrap_or_else(R::empty);
        inner.fetches.supersede(FetchKind::Record);
        inner.state.set_active_record(Some(duplicate), true);
        inner.transition(self.id, Action::Copy);
        Ok(())
    }

    /// Discard edits and return to `Browse`.
    pub fn cancel(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.guard(self.id, Action::Cancel)?;
        let original = inner.state.original_record.clone();
        inner.state.set_active_record(original, true);
        inner.transition(self.id, Action::Cancel);
        Ok(())
    }

    /// Set one field of the active record.
    ///
    /// The record is left untouched if the field is unknown or the value
    /// does not fit it.
    pub fn update(&self, field: &str, value: impl Into<Value>) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.guard(self.id, Action::Update)?;
        let mut record = inner
            .state
            .active_record
            .clone()
            .ok_or(SessionError::NoActiveRecord { session: self.id })?;
        record
            .set_field(field, value.into())
            .map_err(|e| SessionError::field(self.id, e))?;
        inner.state.set_active_record(Some(record), true);
        Ok(())
    }

    /// Set several fields of the active record at once.
    ///
    /// Every field name is checked before anything is written; all unknown
    /// names are reported together and no field is changed.
    pub fn patch<I, K>(&self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let fields: Vec<(String, Value)> = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();

        let mut inner = self.inner.lock();
        inner.guard(self.id, Action::Update)?;
        let mut record = inner
            .state
            .active_record
            .clone()
            .ok_or(SessionError::NoActiveRecord { session: self.id })?;

        if let Validation::Failure(errors) =
            validate_fields(&record, fields.iter().map(|(name, _)| name.as_str()))
        {
            let unknown = errors
                .iter()
                .filter_map(|e| match e {
                    FieldError::Unknown { field } => Some(field.clone()),
                    _ => None,
                })
                .collect();
            return Err(SessionError::UnknownFields {
                session: self.id,
                fields: unknown,
            });
        }

        for (name, value) in fields {
            record
                .set_field(&name, value)
                .map_err(|e| SessionError::field(self.id, e))?;
        }
        inner.state.set_active_record(Some(record), true);
        Ok(())
    }

    /// Persist the active record and reload the page.
    ///
    /// `Add` and `Copy` go through the adapter's `create`, `Update`
    /// through its `update`. The session is locked for the duration of
    /// that call. On success the lock is released and the returned record
    /// becomes the active and original record in one step, the mode
    /// returns to `Browse` and [`Session::init`] runs. On failure the lock is released and the state is left as it
    /// was.
    pub async fn save(&self) -> Result<R> {
        let (mode, record, persist, lock) = {
            let mut inner = self.inner.lock();
            inner.guard(self.id, Action::Save)?;
            let mode = inner.state.update_mode;
            let record = inner
                .state
                .active_record
                .clone()
                .ok_or(SessionError::NoActiveRecord { session: self.id })?;
            let persist = if mode.creates_record() {
                Persist::Create
            } else {
                let original = inner
                    .state
                    .original_record
                    .clone()
                    .ok_or(SessionError::MissingOriginal { session: self.id })?;
                Persist::Update { original }
            };
            let lock = LockGuard::acquire(&self.inner, &mut inner, self.id)?;
            (mode, record, persist, lock)
        };
        debug!(session = %self.id, %mode, "saving record");

        let saved = match &persist {
            Persist::Create => self.adapter.create(&record).await,
            Persist::Update { original } => self.adapter.update(&record, original).await,
        };

        let saved = match saved {
            Ok(saved) => saved,
            Err(e) => {
                drop(lock);
                warn!(session = %self.id, %mode, error = %e, "save failed");
                return Err(SessionError::adapter(self.id, e));
            }
        };

        lock.commit(|inner| {
            inner.state.set_active_record(Some(saved.clone()), false);
            inner.transition(self.id, Action::Save);
        });
        debug!(session = %self.id, "record saved, reloading page");

        self.init().await?;
        Ok(saved)
    }

    /// Check whether the session is editing a record that does not exist yet.
    pub fn is_creating(&self) -> bool {
        matches!(self.update_mode(), UpdateMode::Add | UpdateMode::Copy)
    }
}
