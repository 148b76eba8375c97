//! Loading and positioning.
//!
//! These commands fetch from the adapter and commit the result only when
//! their ticket is still current; superseded results are dropped without
//! touching state or surfacing an error.

use super::fetch::FetchKind;
use super::{Outcome, Session};
use crate::adapter::DataAdapter;
use crate::core::{Action, Record};
use crate::error::{Result, SessionError};
use tracing::debug;

impl<R: Record, A: DataAdapter<R>> Session<R, A> {
    /// Load the first page and make its first record active.
    ///
    /// Supersedes any outstanding fetch of either kind. Once the page is
    /// committed the session always returns to `Browse`, even if the first
    /// record's fetch was superseded in the meantime; in that case the
    /// active record is left alone and [`Outcome::Superseded`] is returned.
    /// If the page itself was superseded nothing is committed.
    pub async fn init(&self) -> Result<Outcome> {
        let (batch, record) = {
            let mut inner = self.inner.lock();
            inner.guard(self.id, Action::Init)?;
            let batch = inner.fetches.issue(FetchKind::Batch);
            let record = inner.fetches.issue(FetchKind::Record);
            (batch, record)
        };
        debug!(session = %self.id, generation = batch.generation(), "loading page");

        let fetched = self
            .adapter
            .get_first(self.options.batch_query(), batch.token())
            .await;

        let first_id = {
            let mut inner = self.inner.lock();
            if !inner.fetches.is_current(&batch) {
                debug!(session = %self.id, generation = batch.generation(), "discarding stale page");
                return Ok(Outcome::Superseded);
            }
            inner.fetches.settle(&batch);
            let records = fetched.map_err(|e| SessionError::adapter(self.id, e))?;
            inner.ensure_unlocked(self.id)?;
            let first_id = records.first().and_then(R::id);
            debug!(session = %self.id, count = records.len(), "page loaded");
            inner.state.set_records(records);
            first_id
        };

        let active = match first_id {
            Some(id) => {
                self.adapter
                    .get_record(&id, self.options.active_fields(), record.token())
                    .await
            }
            None => Ok(None),
        };

        let mut inner = self.inner.lock();
        let active = if inner.fetches.is_current(&record) {
            inner.fetches.settle(&record);
            Some(active.map_err(|e| SessionError::adapter(self.id, e))?)
        } else {
            debug!(session = %self.id, "discarding stale first record");
            None
        };
        inner.ensure_unlocked(self.id)?;
        let outcome = match active {
            Some(active) => {
                inner.state.set_active_record(active, false);
                Outcome::Applied
            }
            None => Outcome::Superseded,
        };
        inner.transition(self.id, Action::Init);
        Ok(outcome)
    }

    /// Fetch the record with `id` and make it active.
    ///
    /// Only allowed while browsing. If another positioning command starts
    /// before this one settles, this one returns [`Outcome::Superseded`]
    /// and the active record reflects the newer command instead.
    pub async fn reposition_by_id(&self, id: &R::Id) -> Result<Outcome> {
        let ticket = {
            let mut inner = self.inner.lock();
            inner.guard(self.id, Action::Reposition)?;
            inner.fetches.issue(FetchKind::Record)
        };
        debug!(session = %self.id, generation = ticket.generation(), ?id, "fetching record");

        let fetched = self
            .adapter
            .get_record(id, self.options.active_fields(), ticket.token())
            .await;

        let mut inner = self.inner.lock();
        if !inner.fetches.is_current(&ticket) {
            debug!(session = %self.id, generation = ticket.generation(), "discarding stale record");
            return Ok(Outcome::Superseded);
        }
        inner.fetches.settle(&ticket);
        let record = fetched.map_err(|e| SessionError::adapter(self.id, e))?;
        inner.ensure_unlocked(self.id)?;
        inner.state.set_active_record(record, false);
        Ok(Outcome::Applied)
    }

    /// Make the record at `index` of the loaded page active.
    pub async fn reposition(&self, index: usize) -> Result<Outcome> {
        let id = {
            let inner = self.inner.lock();
            inner.guard(self.id, Action::Reposition)?;
            let records = &inner.state.records;
            records
                .get(index)
                .and_then(R::id)
                .ok_or_else(|| SessionError::NotFound {
                    session: self.id,
                    index,
                    len: records.len(),
                })?
        };
        self.reposition_by_id(&id).await
    }

    /// Move to the previous record; no-op on the first one.
    pub async fn prev(&self) -> Result<Outcome> {
        let target = {
            let inner = self.inner.lock();
            inner.guard(self.id, Action::Reposition)?;
            match inner.state.pointer {
                Some(pointer) if pointer > 0 => Some(pointer - 1),
                _ => None,
            }
        };
        match target {
            Some(index) => self.reposition(index).await,
            None => Ok(Outcome::Skipped),
        }
    }

    /// Move to the next record; no-op on the last one.
    ///
    /// Without a pointer, moves to the first record of the page.
    pub async fn next(&self) -> Result<Outcome> {
        let target = {
            let inner = self.inner.lock();
            inner.guard(self.id, Action::Reposition)?;
            let len = inner.state.records.len();
            match inner.state.pointer {
                Some(pointer) if pointer + 1 < len => Some(pointer + 1),
                Some(_) => None,
                None if len > 0 => Some(0),
                None => None,
            }
        };
        match target {
            Some(index) => self.reposition(index).await,
            None => Ok(Outcome::Skipped),
        }
    }

    /// Cancel outstanding fetches of both kinds without starting new ones.
    pub fn cancel_fetches(&self) {
        self.inner.lock().fetches.supersede_all();
        debug!(session = %self.id, "fetches cancelled");
    }
}
