//! Datasource: a record-session state machine
//!
//! A session browses a paginated collection of records through a
//! pluggable adapter, keeps one record active, and lets it be edited,
//! added or copied under a small mode state machine. Only the latest
//! fetch of each kind is ever applied, and a lock keeps state frozen
//! while a save is in flight.
//!
//! # Core Concepts
//!
//! - **Record**: Application data with an identity, via the `Record` trait
//! - **Adapter**: Fetches and persists records, via the `DataAdapter` trait
//! - **Session**: One state machine bound to an adapter, owning a
//!   serializable `DatasourceState`
//! - **Modes**: `Browse`, `Update`, `Add`, `Copy`, governed by action guards
//!
//! # Example
//!
//! ```rust
//! use datasource::adapter::MemoryAdapter;
//! use datasource::core::{DynRecord, UpdateMode};
//! use datasource::session::{DatasourceOptions, Session};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let adapter = MemoryAdapter::new(vec![
//!     DynRecord::new().with("id", 1).with("name", "Ada"),
//!     DynRecord::new().with("id", 2).with("name", "Grace"),
//! ]);
//! let session = Session::create(adapter, DatasourceOptions::new().with_batch_size(10));
//!
//! session.init().await.unwrap();
//! session.copy().unwrap();
//! assert_eq!(session.update_mode(), UpdateMode::Copy);
//!
//! session.cancel().unwrap();
//! assert!(session.is_browsing());
//! # }
//! ```

pub mod adapter;
pub mod core;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use adapter::{AdapterError, BatchQuery, DataAdapter};
pub use core::{DatasourceState, Record, UpdateMode};
pub use error::{Result, SessionError};
pub use session::{DatasourceOptions, Outcome, Session, SessionId, SessionRegistry};
