//! magam-store: JSON-file persistence for records and their checklists.

use anyhow::Result;

pub mod checklists;
pub mod events;

pub use checklists::ChecklistStore;
pub use events::EventStore;

/// Remove a record together with its checklist; the record owns the
/// checklist, so they go as one. Idempotent like `EventStore::remove`.
pub fn delete_record(
    events: &mut EventStore,
    checklists: &mut ChecklistStore,
    id: &str,
) -> Result<bool> {
    let removed = events.remove(id)?;
    checklists.remove(id)?;
    Ok(removed)
}
