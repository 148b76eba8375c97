//! Update modes of a datasource session.
//!
//! A session is always in exactly one mode. `Browse` is the initial mode
//! and the only one in which the active record may be repositioned; the
//! other three are editing modes that end with `save` or `cancel`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Editing mode of a session.
///
/// All methods are pure.
///
/// # Example
///
/// ```rust
/// use datasource::core::UpdateMode;
///
/// assert!(UpdateMode::Browse.is_browsing());
/// assert!(UpdateMode::Add.is_editing());
/// assert_eq!(UpdateMode::Copy.name(), "Copy");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum UpdateMode {
    /// Viewing records; positioning is allowed.
    #[default]
    Browse,
    /// Editing the active record in place.
    Update,
    /// Editing a new, blank record.
    Add,
    /// Editing a duplicate of the active record.
    Copy,
}

impl UpdateMode {
    /// Get the mode's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Browse => "Browse",
            Self::Update => "Update",
            Self::Add => "Add",
            Self::Copy => "Copy",
        }
    }

    /// Check if this is the browsing mode.
    pub fn is_browsing(&self) -> bool {
        matches!(self, Self::Browse)
    }

    /// Check if this is one of the editing modes.
    pub fn is_editing(&self) -> bool {
        !self.is_browsing()
    }

    /// Check if saving in this mode creates a new record.
    ///
    /// `Add` and `Copy` persist through the adapter's `create`, `Update`
    /// through its `update`.
    pub fn creates_record(&self) -> bool {
        matches!(self, Self::Add | Self::Copy)
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
