//! JSON-file record store. An explicit handle created from a path; callers
//! own it and pass it where needed, there is no global connection state.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use magam_core::AssignmentRecord;

pub struct EventStore {
    path: PathBuf,
    records: Vec<AssignmentRecord>,
}

impl EventStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            let s = fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?
        } else {
            Vec::new()
        };
        Ok(Self { path, records })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }

    pub fn list(&self) -> &[AssignmentRecord] {
        &self.records
    }

    /// Records whose deadline lands on `date`, ordered by start time.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&AssignmentRecord> {
        let mut hits: Vec<&AssignmentRecord> =
            self.records.iter().filter(|r| r.date == date).collect();
        hits.sort_by_key(|r| r.start_time);
        hits
    }

    pub fn get(&self, id: &str) -> Option<&AssignmentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Insert a record; an empty id gets a fresh UUID v4. Returns the
    /// stored record (with its final id).
    pub fn insert(&mut self, mut record: AssignmentRecord) -> Result<AssignmentRecord> {
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        if let Err(reason) = record.validate() {
            bail!("invalid record: {reason}");
        }
        if self.get(&record.id).is_some() {
            bail!("duplicate record id: {}", record.id);
        }
        self.records.push(record.clone());
        self.save()?;
        Ok(record)
    }

    /// Replace the record carrying the same id.
    pub fn update(&mut self, record: AssignmentRecord) -> Result<()> {
        if let Err(reason) = record.validate() {
            bail!("invalid record: {reason}");
        }
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record,
            None => bail!("no record with id {}", record.id),
        }
        self.save()
    }

    /// Remove by id. A repeat delete is not an error, just `false`.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}
