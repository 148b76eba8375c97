//! Host-side registry of live sessions.

use super::{DatasourceOptions, Session, SessionId};
use crate::adapter::DataAdapter;
use crate::core::Record;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Owns the sessions of one host, addressed by [`SessionId`].
///
/// The registry is an ordinary value; nothing is registered globally.
pub struct SessionRegistry<R: Record, A: DataAdapter<R>> {
    sessions: RwLock<HashMap<SessionId, Arc<Session<R, A>>>>,
}

impl<R: Record, A: DataAdapter<R>> SessionRegistry<R, A> {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session and register it under its id.
    pub fn spawn(&self, adapter: A, options: DatasourceOptions) -> Arc<Session<R, A>> {
        self.insert(Session::create(adapter, options))
    }

    /// Register an existing session.
    pub fn insert(&self, session: Session<R, A>) -> Arc<Session<R, A>> {
        let session = Arc::new(session);
        self.sessions
            .write()
            .insert(session.id(), Arc::clone(&session));
        session
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<Session<R, A>>> {
        self.sessions.read().get(&id).cloned()
    }

    /// Deregister a session and cancel its outstanding fetches.
    pub fn dispose(&self, id: SessionId) -> Option<Arc<Session<R, A>>> {
        let session = self.sessions.write().remove(&id)?;
        session.cancel_fetches();
        info!(session = %id, "session disposed");
        Some(session)
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.read().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl<R: Record, A: DataAdapter<R>> Default for SessionRegistry<R, A> {
    fn default() -> Self {
        Self::new()
    }
}
