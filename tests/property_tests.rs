//! Property-based tests for guards, mode history and session invariants.
//!
//! These tests use proptest to drive sessions through random command
//! sequences and check that the invariants hold after every step.

use chrono::Utc;
use datasource::adapter::MemoryAdapter;
use datasource::core::{Action, DynRecord, ModeHistory, ModeTransition, Record, Rejection};
use datasource::session::{DatasourceOptions, Session};
use datasource::{SessionError, UpdateMode};
use proptest::prelude::*;
use serde_json::json;

#[derive(Clone, Copy, Debug)]
enum Op {
    Init,
    Next,
    Prev,
    Reposition(usize),
    Edit,
    Add,
    Copy,
    Update,
    Cancel,
    Save,
}

prop_compose! {
    fn arbitrary_mode()(variant in 0..4u8) -> UpdateMode {
        match variant {
            0 => UpdateMode::Browse,
            1 => UpdateMode::Update,
            2 => UpdateMode::Add,
            _ => UpdateMode::Copy,
        }
    }
}

prop_compose! {
    fn arbitrary_action()(variant in 0..8u8) -> Action {
        match variant {
            0 => Action::Init,
            1 => Action::Reposition,
            2 => Action::Edit,
            3 => Action::Add,
            4 => Action::Copy,
            5 => Action::Save,
            6 => Action::Cancel,
            _ => Action::Update,
        }
    }
}

prop_compose! {
    fn arbitrary_op()(variant in 0..10u8, index in 0..10usize) -> Op {
        match variant {
            0 => Op::Init,
            1 => Op::Next,
            2 => Op::Prev,
            3 => Op::Reposition(index),
            4 => Op::Edit,
            5 => Op::Add,
            6 => Op::Copy,
            7 => Op::Update,
            8 => Op::Cancel,
            _ => Op::Save,
        }
    }
}

type MemorySession = Session<DynRecord, MemoryAdapter<DynRecord>>;

fn session(len: i64, batch_size: usize) -> MemorySession {
    let records = (1..=len)
        .map(|id| DynRecord::new().with("id", id).with("name", format!("r{id}")))
        .collect();
    let adapter = MemoryAdapter::new(records).with_id_assigner(|record, existing| {
        let next = existing
            .iter()
            .filter_map(DynRecord::id)
            .filter_map(|id| id.as_i64())
            .max()
            .unwrap_or(0)
            + 1;
        let _ = record.set_field("id", json!(next));
    });
    Session::create(adapter, DatasourceOptions::new().with_batch_size(batch_size))
}

async fn apply(session: &MemorySession, op: Op, step: usize) -> Result<(), SessionError> {
    match op {
        Op::Init => session.init().await.map(drop),
        Op::Next => session.next().await.map(drop),
        Op::Prev => session.prev().await.map(drop),
        Op::Reposition(index) => session.reposition(index).await.map(drop),
        Op::Edit => session.edit(),
        Op::Add => session.add(),
        Op::Copy => session.copy(),
        Op::Update => session.update("name", format!("edit{step}")),
        Op::Cancel => session.cancel(),
        Op::Save => session.save().await.map(drop),
    }
}

/// Errors raised by a precondition check, before anything is touched.
fn is_rejection(error: &SessionError) -> bool {
    matches!(
        error,
        SessionError::Locked { .. }
            | SessionError::WrongMode { .. }
            | SessionError::NotFound { .. }
            | SessionError::MissingOriginal { .. }
            | SessionError::NoActiveRecord { .. }
            | SessionError::UnknownField { .. }
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn guard_is_deterministic(
        action in arbitrary_action(),
        mode in arbitrary_mode(),
        locked in any::<bool>()
    ) {
        prop_assert_eq!(action.check(mode, locked), action.check(mode, locked));
    }

    #[test]
    fn lock_only_matters_when_mode_allows(action in arbitrary_action(), mode in arbitrary_mode()) {
        let allowed = action.requirement().allows(mode);
        prop_assert_eq!(action.check(mode, false).is_ok(), allowed);
        if allowed {
            prop_assert_eq!(action.check(mode, true), Err(Rejection::Locked));
        } else {
            let is_wrong_mode = matches!(
                action.check(mode, true),
                Err(Rejection::WrongMode { current, .. }) if current == mode
            );
            prop_assert!(is_wrong_mode);
        }
    }

    #[test]
    fn history_path_follows_recorded_modes(modes in prop::collection::vec(arbitrary_mode(), 1..10)) {
        let mut history = ModeHistory::new();
        let mut from = UpdateMode::Browse;
        for to in &modes {
            history = history.record(ModeTransition {
                from,
                to: *to,
                action: Action::Update,
                timestamp: Utc::now(),
            });
            from = *to;
        }

        let path = history.get_path();
        prop_assert_eq!(path.len(), modes.len() + 1);
        prop_assert_eq!(path[0], UpdateMode::Browse);
        prop_assert_eq!(&path[1..], &modes[..]);
    }

    #[test]
    fn history_record_is_pure(from in arbitrary_mode(), to in arbitrary_mode()) {
        let history = ModeHistory::new();
        let next = history.record(ModeTransition {
            from,
            to,
            action: Action::Edit,
            timestamp: Utc::now(),
        });

        prop_assert_eq!(history.transitions().len(), 0);
        prop_assert_eq!(next.transitions().len(), 1);
    }

    #[test]
    fn session_invariants_hold_across_command_sequences(
        len in 0..8i64,
        batch_size in 1..6usize,
        ops in prop::collection::vec(arbitrary_op(), 1..40)
    ) {
        let rt = runtime();
        let session = session(len, batch_size);
        rt.block_on(session.init()).unwrap();
        let mut editing_pointer = None;

        for (step, op) in ops.into_iter().enumerate() {
            let before = session.snapshot();
            let result = rt.block_on(apply(&session, op, step));
            let after = session.snapshot();

            prop_assert!(!after.locked, "lock leaked after {:?}", op);

            if let Err(error) = &result {
                if is_rejection(error) {
                    prop_assert_eq!(&after, &before, "rejected {:?} changed state", op);
                }
            }

            if after.update_mode.is_browsing() {
                prop_assert!(after.pointer_is_consistent(), "pointer drifted after {:?}", op);
                editing_pointer = None;
            } else {
                let expected = *editing_pointer.get_or_insert(before.pointer);
                prop_assert_eq!(after.pointer, expected, "pointer moved while editing ({:?})", op);
            }
        }
    }

    #[test]
    fn save_always_returns_to_browse(
        len in 1..5i64,
        start in 0..3u8,
        name in "[a-z]{1,8}"
    ) {
        let rt = runtime();
        let session = session(len, 10);
        rt.block_on(session.init()).unwrap();

        match start {
            0 => session.edit().unwrap(),
            1 => session.add().unwrap(),
            _ => session.copy().unwrap(),
        }
        session.update("name", name.clone()).unwrap();
        let saved = rt.block_on(session.save()).unwrap();

        prop_assert_eq!(saved.get("name"), Some(&json!(name)));
        prop_assert_eq!(session.update_mode(), UpdateMode::Browse);
        prop_assert!(!session.is_locked());
        prop_assert!(session.snapshot().pointer_is_consistent());
    }
}
