//! Datasource sessions.
//!
//! A [`Session`] is one independently addressable instance of the record
//! state machine, bound to a single adapter and option set. It is the
//! "imperative shell" around the pure core: it checks guards, talks to
//! the adapter and commits results to its [`DatasourceState`].
//!
//! # Concurrency
//!
//! Commands take `&self` and may overlap (for example several
//! `reposition_by_id` calls joined on one task). State sits behind a
//! mutex that is only held between suspension points, so every commit is
//! atomic and checks its fetch ticket in the same critical section.

mod fetch;
mod id;
mod lock;
mod modes;
mod navigation;
mod options;
mod registry;

pub use fetch::{FetchKind, Ticket};
pub use id::SessionId;
pub use options::{DatasourceOptions, DEFAULT_BATCH_SIZE, DEFAULT_HISTORY_LIMIT};
pub use registry::SessionRegistry;

use crate::adapter::DataAdapter;
use crate::core::{Action, DatasourceState, ModeHistory, ModeTransition, Record, UpdateMode};
use crate::error::{Result, SessionError};
use chrono::Utc;
use fetch::FetchCoordinator;
use parking_lot::Mutex;
use tracing::{debug, info};

/// What became of a positioning or loading command.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// The fetched data was committed.
    Applied,
    /// A newer command of the same kind took over; nothing was committed.
    Superseded,
    /// Nothing to do (already at the edge of the page).
    Skipped,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

struct Inner<R: Record> {
    state: DatasourceState<R>,
    fetches: FetchCoordinator,
    history: ModeHistory,
}

impl<R: Record> Inner<R> {
    fn guard(&self, session: SessionId, action: Action) -> Result<()> {
        action
            .check(self.state.update_mode, self.state.locked)
            .map_err(|rejection| SessionError::rejected(session, action, rejection))
    }

    fn ensure_unlocked(&self, session: SessionId) -> Result<()> {
        if self.state.locked {
            return Err(SessionError::Locked { session });
        }
        Ok(())
    }

    /// Move to the action's target mode, recording the change.
    fn transition(&mut self, session: SessionId, action: Action) {
        let Some(to) = action.target() else {
            return;
        };
        let from = self.state.update_mode;
        if from != to {
            self.history.push(ModeTransition {
                from,
                to,
                action,
                timestamp: Utc::now(),
            });
            debug!(session = %session, %action, %from, %to, "mode changed");
        }
        self.state.set_update_mode(to);
    }
}

/// One record-browsing session.
///
/// # Example
///
/// ```rust
/// use datasource::adapter::MemoryAdapter;
/// use datasource::core::{DynRecord, UpdateMode};
/// use datasource::session::{DatasourceOptions, Session};
///
/// # #[tokio::main]
/// # async fn main() {
/// let adapter = MemoryAdapter::new(vec![
///     DynRecord::new().with("id", 1).with("name", "Ada"),
///     DynRecord::new().with("id", 2).with("name", "Grace"),
/// ]);
/// let session = Session::create(adapter, DatasourceOptions::default());
///
/// session.init().await.unwrap();
/// assert_eq!(session.pointer(), Some(0));
///
/// session.next().await.unwrap();
/// session.edit().unwrap();
/// session.update("name", "Grace Hopper").unwrap();
/// session.save().await.unwrap();
/// assert_eq!(session.update_mode(), UpdateMode::Browse);
/// # }
/// ```
pub struct Session<R: Record, A: DataAdapter<R>> {
    id: SessionId,
    adapter: A,
    options: DatasourceOptions,
    inner: Mutex<Inner<R>>,
}

impl<R: Record, A: DataAdapter<R>> Session<R, A> {
    /// Create an empty session in `Browse` mode.
    ///
    /// No fetch starts until [`Session::init`] runs.
    pub fn create(adapter: A, options: DatasourceOptions) -> Self {
        let id = SessionId::new();
        info!(session = %id, batch_size = options.batch_size(), "session created");
        let history = match options.history_limit {
            Some(limit) => ModeHistory::bounded(limit),
            None => ModeHistory::new(),
        };
        Self {
            id,
            adapter,
            options,
            inner: Mutex::new(Inner {
                state: DatasourceState::new(),
                fetches: FetchCoordinator::new(),
                history,
            }),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn options(&self) -> &DatasourceOptions {
        &self.options
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Copy of the full session state.
    pub fn snapshot(&self) -> DatasourceState<R> {
        self.inner.lock().state.clone()
    }

    pub fn records(&self) -> Vec<R> {
        self.inner.lock().state.records.clone()
    }

    pub fn pointer(&self) -> Option<usize> {
        self.inner.lock().state.pointer
    }

    pub fn active_record(&self) -> Option<R> {
        self.inner.lock().state.active_record.clone()
    }

    pub fn original_record(&self) -> Option<R> {
        self.inner.lock().state.original_record.clone()
    }

    pub fn update_mode(&self) -> UpdateMode {
        self.inner.lock().state.update_mode
    }

    pub fn is_browsing(&self) -> bool {
        self.inner.lock().state.is_browsing()
    }

    /// Check whether a fetch of `kind` is outstanding.
    pub fn is_fetching(&self, kind: FetchKind) -> bool {
        self.inner.lock().fetches.in_flight(kind)
    }

    /// Most recent mode changes, up to the configured history limit.
    pub fn history(&self) -> ModeHistory {
        self.inner.lock().history.clone()
    }
}
