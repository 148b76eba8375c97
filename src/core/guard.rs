//! Preconditions for session actions.
//!
//! Every command a session accepts is an [`Action`]. Before an action
//! touches state, its guard is checked against the current mode and lock
//! flag. Guards are pure: they only inspect the values they are given.

use super::mode::UpdateMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Commands the presentation layer can issue to a session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Action {
    Init,
    Reposition,
    Edit,
    Add,
    Copy,
    Save,
    Cancel,
    Update,
}

/// Which modes an action may run from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModeRequirement {
    /// Any mode.
    Any,
    /// Exactly this mode.
    Exactly(UpdateMode),
    /// Any mode other than `Browse`.
    Editing,
}

impl ModeRequirement {
    pub fn allows(&self, mode: UpdateMode) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(required) => *required == mode,
            Self::Editing => mode.is_editing(),
        }
    }

    /// The single mode this requirement expects, if there is one.
    pub fn expected(&self) -> Option<UpdateMode> {
        match self {
            Self::Exactly(mode) => Some(*mode),
            Self::Any | Self::Editing => None,
        }
    }
}

/// Why a guard rejected an action.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rejection {
    Locked,
    WrongMode {
        current: UpdateMode,
        expected: Option<UpdateMode>,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Reposition => "reposition",
            Self::Edit => "edit",
            Self::Add => "add",
            Self::Copy => "copy",
            Self::Save => "save",
            Self::Cancel => "cancel",
            Self::Update => "update",
        }
    }

    pub fn requirement(&self) -> ModeRequirement {
        match self {
            Self::Init => ModeRequirement::Any,
            Self::Reposition | Self::Edit | Self::Add | Self::Copy => {
                ModeRequirement::Exactly(UpdateMode::Browse)
            }
            Self::Save | Self::Cancel | Self::Update => ModeRequirement::Editing,
        }
    }

    /// Mode the session moves to when the action completes, if it changes mode.
    pub fn target(&self) -> Option<UpdateMode> {
        match self {
            Self::Edit => Some(UpdateMode::Update),
            Self::Add => Some(UpdateMode::Add),
            Self::Copy => Some(UpdateMode::Copy),
            Self::Save | Self::Cancel | Self::Init => Some(UpdateMode::Browse),
            Self::Reposition | Self::Update => None,
        }
    }

    /// Check whether the action may run.
    ///
    /// The mode is checked before the lock, so a caller in the wrong mode
    /// learns about the mode even while a save is in flight.
    ///
    /// # Example
    ///
    /// ```rust
    /// use datasource::core::{Action, Rejection, UpdateMode};
    ///
    /// assert!(Action::Edit.check(UpdateMode::Browse, false).is_ok());
    /// assert_eq!(Action::Edit.check(UpdateMode::Browse, true), Err(Rejection::Locked));
    /// assert!(matches!(
    ///     Action::Save.check(UpdateMode::Browse, false),
    ///     Err(Rejection::WrongMode { expected: None, .. })
    /// ));
    /// ```
    pub fn check(&self, mode: UpdateMode, locked: bool) -> Result<(), Rejection> {
        let requirement = self.requirement();
        if !requirement.allows(mode) {
            return Err(Rejection::WrongMode {
                current: mode,
                expected: requirement.expected(),
            });
        }
        if locked {
            return Err(Rejection::Locked);
        }
        Ok(())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
