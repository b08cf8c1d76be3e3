//! Per-record checklist persistence, keyed by the owning record's id.

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use magam_core::checklist;
use magam_core::{ChecklistItem, EventType};

pub struct ChecklistStore {
    path: PathBuf,
    lists: BTreeMap<String, Vec<ChecklistItem>>,
}

impl ChecklistStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let lists = if path.exists() {
            let s = fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, lists })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.lists)?;
        fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }

    /// A record's checklist; a record with none yet is simply empty.
    pub fn get(&self, record_id: &str) -> &[ChecklistItem] {
        self.lists
            .get(record_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace a record's checklist wholesale.
    pub fn put(&mut self, record_id: &str, items: Vec<ChecklistItem>) -> Result<()> {
        self.lists.insert(record_id.to_string(), items);
        self.save()
    }

    /// Seed the event-type template against the record, nothing completed.
    pub fn seed(&mut self, record_id: &str, event_type: EventType) -> Result<&[ChecklistItem]> {
        self.lists
            .insert(record_id.to_string(), checklist::seed(event_type));
        self.save()?;
        Ok(self.get(record_id))
    }

    /// Flip one item (0-based index) and return its new completed state.
    /// An out-of-range index errors without touching the list.
    pub fn toggle(&mut self, record_id: &str, index: usize) -> Result<bool> {
        let items = match self.lists.get_mut(record_id) {
            Some(items) => items,
            None => bail!("no checklist for record {record_id}"),
        };
        if index >= items.len() {
            bail!("checklist index {index} out of range (len {})", items.len());
        }
        items[index].completed = !items[index].completed;
        let state = items[index].completed;
        self.save()?;
        Ok(state)
    }

    /// Drop a record's checklist. Missing is fine.
    pub fn remove(&mut self, record_id: &str) -> Result<bool> {
        let removed = self.lists.remove(record_id).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("magam-checklists-{tag}-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn test_seed_and_toggle_round_trip() {
        let path = temp_path("seed");
        let mut store = ChecklistStore::load(&path).unwrap();

        store.seed("rec-1", EventType::Exam).unwrap();
        assert_eq!(store.get("rec-1").len(), 5);
        assert_eq!(store.get("rec-1")[0].text, "학습 계획 수립");

        // each toggle hits the file, not just the in-memory list
        assert!(store.toggle("rec-1", 0).unwrap());
        let reopened = ChecklistStore::load(&path).unwrap();
        assert!(reopened.get("rec-1")[0].completed);

        assert!(!store.toggle("rec-1", 0).unwrap());
        let reopened = ChecklistStore::load(&path).unwrap();
        assert!(!reopened.get("rec-1")[0].completed);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_toggle_out_of_range_keeps_state() {
        let path = temp_path("range");
        let mut store = ChecklistStore::load(&path).unwrap();
        store.seed("rec-1", EventType::Assignment).unwrap();

        assert!(store.toggle("rec-1", 9).is_err());
        assert!(store.get("rec-1").iter().all(|i| !i.completed));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_toggle_unknown_record_errors() {
        let path = temp_path("ghost");
        let mut store = ChecklistStore::load(&path).unwrap();
        assert!(store.toggle("nope", 0).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_checklist_is_empty() {
        let path = temp_path("empty");
        let store = ChecklistStore::load(&path).unwrap();
        assert!(store.get("rec-9").is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let path = temp_path("remove");
        let mut store = ChecklistStore::load(&path).unwrap();
        store.seed("rec-1", EventType::Personal).unwrap();

        assert!(store.remove("rec-1").unwrap());
        assert!(!store.remove("rec-1").unwrap());
        let _ = fs::remove_file(&path);
    }
}
