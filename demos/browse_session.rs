//! Browse Session
//!
//! This example walks a session through browsing, editing and adding
//! records against the in-memory adapter.
//!
//! Key concepts:
//! - Loading the first page with `init`
//! - Moving through the page with `next`, `prev` and `reposition`
//! - Editing under `Update` mode and saving through the adapter
//! - Guards rejecting commands issued in the wrong mode
//!
//! Run with: RUST_LOG=debug cargo run --example browse_session

use datasource::adapter::MemoryAdapter;
use datasource::core::{DynRecord, Record};
use datasource::session::{DatasourceOptions, SessionRegistry};
use datasource::SessionError;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn person(id: i64, name: &str) -> DynRecord {
    DynRecord::new().with("id", id).with("name", name)
}

#[tokio::main]
async fn main() -> Result<(), SessionError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Browse Session Example ===\n");

    let adapter = MemoryAdapter::new(vec![
        person(1, "Ada"),
        person(2, "Grace"),
        person(3, "Barbara"),
    ])
    .with_id_assigner(|record, existing| {
        let next = existing
            .iter()
            .filter_map(DynRecord::id)
            .filter_map(|id| id.as_i64())
            .max()
            .unwrap_or(0)
            + 1;
        let _ = record.set_field("id", json!(next));
    });

    let registry: SessionRegistry<DynRecord, _> = SessionRegistry::new();
    let session = registry.spawn(adapter, DatasourceOptions::new().with_batch_size(2));
    println!("Session {} created", session.id());

    // Load the first page
    session.init().await?;
    println!(
        "Loaded {} records, pointer at {:?}",
        session.records().len(),
        session.pointer()
    );

    // Walk the page
    session.next().await?;
    println!("After next: {:?}", session.active_record());
    let outcome = session.next().await?;
    println!("Next on the last record: {outcome:?}");

    // Edit the active record
    session.edit()?;
    session.update("name", "Grace Hopper")?;
    println!("\nEditing in {} mode: {:?}", session.update_mode(), session.active_record());

    match session.reposition(0).await {
        Err(e) => println!("Rejected as expected: {e}"),
        Ok(outcome) => println!("Unexpected: {outcome:?}"),
    }

    let saved = session.save().await?;
    println!("Saved: {saved:?}");
    println!("Back in {} mode at {:?}", session.update_mode(), session.pointer());

    // Add a new record
    session.add()?;
    session.update("name", "Barbara Liskov")?;
    let created = session.save().await?;
    println!("\nCreated: {created:?}");

    println!("\nMode path: {:?}", session.history().get_path());

    registry.dispose(session.id());
    println!("Registry now holds {} sessions", registry.len());

    Ok(())
}
