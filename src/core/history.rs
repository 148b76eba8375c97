//! Mode transition history.
//!
//! Every time a session changes mode it records which action caused the
//! change and when. `record` returns a new history rather than mutating
//! the existing one; a session appends in place with `push`. A bounded
//! history keeps only its most recent transitions.

use super::guard::Action;
use super::mode::UpdateMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single mode change.
///
/// # Example
///
/// ```rust
/// use datasource::core::{Action, ModeTransition, UpdateMode};
/// use chrono::Utc;
///
/// let transition = ModeTransition {
///     from: UpdateMode::Browse,
///     to: UpdateMode::Update,
///     action: Action::Edit,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.action, Action::Edit);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ModeTransition {
    /// The mode being left
    pub from: UpdateMode,
    /// The mode being entered
    pub to: UpdateMode,
    /// The action that caused the change
    pub action: Action,
    /// When the change was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of mode transitions.
///
/// # Example
///
/// ```rust
/// use datasource::core::{Action, ModeHistory, ModeTransition, UpdateMode};
/// use chrono::Utc;
///
/// let history = ModeHistory::new()
///     .record(ModeTransition {
///         from: UpdateMode::Browse,
///         to: UpdateMode::Add,
///         action: Action::Add,
///         timestamp: Utc::now(),
///     })
///     .record(ModeTransition {
///         from: UpdateMode::Add,
///         to: UpdateMode::Browse,
///         action: Action::Cancel,
///         timestamp: Utc::now(),
///     });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![UpdateMode::Browse, UpdateMode::Add, UpdateMode::Browse]);
/// ```
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ModeHistory {
    transitions: Vec<ModeTransition>,
    #[serde(default)]
    limit: Option<usize>,
}

impl ModeHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            limit: None,
        }
    }

    /// History that keeps at most `limit` transitions, dropping the oldest.
    pub fn bounded(limit: usize) -> Self {
        Self {
            transitions: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: ModeTransition) -> Self {
        let mut next = self.clone();
        next.push(transition);
        next
    }

    /// Append a transition in place.
    pub fn push(&mut self, transition: ModeTransition) {
        self.transitions.push(transition);
        if let Some(limit) = self.limit {
            let excess = self.transitions.len().saturating_sub(limit);
            self.transitions.drain(..excess);
        }
    }

    /// Modes traversed: the first retained `from`, then each `to`.
    pub fn get_path(&self) -> Vec<UpdateMode> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the first and last recorded transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&ModeTransition> {
        self.transitions.last()
    }

    pub fn transitions(&self) -> &[ModeTransition] {
        &self.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(from: UpdateMode, to: UpdateMode, action: Action) -> ModeTransition {
        ModeTransition {
            from,
            to,
            action,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = ModeHistory::new();
        assert_eq!(history.transitions().len(), 0);
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = ModeHistory::new();
        let new_history =
            history.record(transition(UpdateMode::Browse, UpdateMode::Update, Action::Edit));

        assert_eq!(history.transitions().len(), 0);
        assert_eq!(new_history.transitions().len(), 1);
    }

    #[test]
    fn bounded_history_drops_oldest_transitions() {
        let mut history = ModeHistory::bounded(2);
        history.push(transition(UpdateMode::Browse, UpdateMode::Update, Action::Edit));
        history.push(transition(UpdateMode::Update, UpdateMode::Browse, Action::Cancel));
        history.push(transition(UpdateMode::Browse, UpdateMode::Add, Action::Add));

        assert_eq!(history.transitions().len(), 2);
        assert_eq!(
            history.get_path(),
            vec![UpdateMode::Update, UpdateMode::Browse, UpdateMode::Add]
        );
    }

    #[test]
    fn push_matches_record() {
        let t = transition(UpdateMode::Browse, UpdateMode::Copy, Action::Copy);
        let mut pushed = ModeHistory::new();
        pushed.push(t.clone());

        assert_eq!(pushed, ModeHistory::new().record(t));
    }

    #[test]
    fn get_path_returns_mode_sequence() {
        let history = ModeHistory::new()
            .record(transition(UpdateMode::Browse, UpdateMode::Copy, Action::Copy))
            .record(transition(UpdateMode::Copy, UpdateMode::Browse, Action::Save));

        assert_eq!(
            history.get_path(),
            vec![UpdateMode::Browse, UpdateMode::Copy, UpdateMode::Browse]
        );
        assert_eq!(history.last().map(|t| t.action), Some(Action::Save));
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let history =
            ModeHistory::new().record(transition(UpdateMode::Browse, UpdateMode::Add, Action::Add));

        std::thread::sleep(std::time::Duration::from_millis(10));

        let history =
            history.record(transition(UpdateMode::Add, UpdateMode::Browse, Action::Cancel));

        let duration = history.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = ModeHistory::new().record(transition(
            UpdateMode::Browse,
            UpdateMode::Update,
            Action::Edit,
        ));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: ModeHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(history, deserialized);
    }
}
