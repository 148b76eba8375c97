//! Session lock.
//!
//! While a session is locked, every state-mutating command fails with
//! [`SessionError::Locked`]. `save` holds the lock across the adapter's
//! `create`/`update` call through a [`LockGuard`]. On success the guard
//! is consumed by [`LockGuard::commit`], which clears the flag and applies
//! the result in one critical section; on failure dropping it releases
//! the flag.

use super::{Inner, Session, SessionId};
use crate::adapter::DataAdapter;
use crate::core::Record;
use crate::error::{Result, SessionError};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Scoped hold on a session's lock flag.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub(crate) struct LockGuard<'a, R: Record> {
    inner: &'a Mutex<Inner<R>>,
    session: SessionId,
    released: bool,
}

impl<'a, R: Record> LockGuard<'a, R> {
    /// Set the flag on an already acquired state and return its guard.
    pub(super) fn acquire(
        inner: &'a Mutex<Inner<R>>,
        held: &mut Inner<R>,
        session: SessionId,
    ) -> Result<Self> {
        if held.state.locked {
            return Err(SessionError::Locked { session });
        }
        held.state.locked = true;
        debug!(session = %session, "lock acquired");
        Ok(Self {
            inner,
            session,
            released: false,
        })
    }

    /// Clear the flag and run `apply` under the same state lock.
    ///
    /// No other command can observe the session unlocked before `apply`
    /// has run.
    pub(super) fn commit<T>(mut self, apply: impl FnOnce(&mut Inner<R>) -> T) -> T {
        let mut inner = self.inner.lock();
        if !inner.state.locked {
            warn!(session = %self.session, "lock was already released before its guard committed");
        }
        inner.state.locked = false;
        debug!(session = %self.session, "lock released");
        let output = apply(&mut inner);
        drop(inner);
        self.released = true;
        output
    }
}

impl<R: Record> Drop for LockGuard<'_, R> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let mut inner = self.inner.lock();
        if inner.state.locked {
            inner.state.locked = false;
            debug!(session = %self.session, "lock released");
        } else {
            warn!(session = %self.session, "lock was already released before its guard dropped");
        }
    }
}

impl<R: Record, A: DataAdapter<R>> Session<R, A> {
    /// Set the lock flag.
    ///
    /// Fails with [`SessionError::Locked`] if the session is already locked.
    pub fn lock(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state.locked {
            return Err(SessionError::Locked { session: self.id });
        }
        inner.state.locked = true;
        debug!(session = %self.id, "locked");
        Ok(())
    }

    /// Clear the lock flag.
    ///
    /// Fails with [`SessionError::NotUnlocked`] if the session is not locked.
    pub fn unlock(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.state.locked {
            return Err(SessionError::NotUnlocked { session: self.id });
        }
        inner.state.locked = false;
        debug!(session = %self.id, "unlocked");
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.inner.lock().state.locked
    }
}
