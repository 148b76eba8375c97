//! Session error types.

use crate::adapter::AdapterError;
use crate::core::{Action, FieldError, Rejection, UpdateMode};
use crate::session::SessionId;
use thiserror::Error;

/// Errors returned by session commands.
///
/// Every variant carries the id of the session that rejected the command.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session {session} is locked by an outstanding save")]
    Locked { session: SessionId },

    #[error("Session {session} is not locked")]
    NotUnlocked { session: SessionId },

    #[error("Session {session}: cannot {action} in {current} mode{}", expected_suffix(.expected))]
    WrongMode {
        session: SessionId,
        action: Action,
        current: UpdateMode,
        /// `None` means any editing mode would have been accepted.
        expected: Option<UpdateMode>,
    },

    #[error("Session {session} has no active record")]
    NoActiveRecord { session: SessionId },

    #[error("Session {session} has no original record")]
    MissingOriginal { session: SessionId },

    #[error("Session {session}: unknown field '{field}'")]
    UnknownField { session: SessionId, field: String },

    #[error("Session {session}: unknown fields {fields:?}")]
    UnknownFields {
        session: SessionId,
        fields: Vec<String>,
    },

    #[error("Session {session}: invalid value for field '{field}': {message}")]
    InvalidFieldValue {
        session: SessionId,
        field: String,
        message: String,
    },

    #[error("Session {session}: no record at index {index} (page holds {len})")]
    NotFound {
        session: SessionId,
        index: usize,
        len: usize,
    },

    #[error("Session {session}: adapter failed: {source}")]
    Adapter {
        session: SessionId,
        #[source]
        source: AdapterError,
    },
}

fn expected_suffix(expected: &Option<UpdateMode>) -> String {
    match expected {
        Some(mode) => format!(" (expected {mode})"),
        None => " (expected an editing mode)".to_string(),
    }
}

impl SessionError {
    pub(crate) fn rejected(session: SessionId, action: Action, rejection: Rejection) -> Self {
        match rejection {
            Rejection::Locked => Self::Locked { session },
            Rejection::WrongMode { current, expected } => Self::WrongMode {
                session,
                action,
                current,
                expected,
            },
        }
    }

    pub(crate) fn field(session: SessionId, error: FieldError) -> Self {
        match error {
            FieldError::Unknown { field } => Self::UnknownField { session, field },
            FieldError::InvalidValue { field, message } => Self::InvalidFieldValue {
                session,
                field,
                message,
            },
            FieldError::NotAnObject => Self::InvalidFieldValue {
                session,
                field: String::new(),
                message: FieldError::NotAnObject.to_string(),
            },
        }
    }

    pub(crate) fn adapter(session: SessionId, source: AdapterError) -> Self {
        Self::Adapter { session, source }
    }

    /// Session that raised the error.
    pub fn session(&self) -> SessionId {
        match self {
            Self::Locked { session }
            | Self::NotUnlocked { session }
            | Self::WrongMode { session, .. }
            | Self::NoActiveRecord { session }
            | Self::MissingOriginal { session }
            | Self::UnknownField { session, .. }
            | Self::UnknownFields { session, .. }
            | Self::InvalidFieldValue { session, .. }
            | Self::NotFound { session, .. }
            | Self::Adapter { session, .. } => *session,
        }
    }

    /// The adapter's own error, when the failure came from the adapter.
    pub fn adapter_error(&self) -> Option<&AdapterError> {
        match self {
            Self::Adapter { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
