use crate::errors::TrackerError;
use crate::models::{Entry, EntryData};
use crate::storage::{load_document, persist_document};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

/// Append-only log of workout entries backed by one JSON document.
///
/// Entries keep the order they were appended in; nothing here sorts by date.
#[derive(Debug)]
pub struct EntryStore {
    path: PathBuf,
    data: EntryData,
}

impl EntryStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, TrackerError> {
        let path = path.into();
        let data: EntryData = load_document(&path).await?;
        info!("loaded {} entries from {}", data.entries.len(), path.display());
        Ok(Self { path, data })
    }

    /// Tags every entry with `group` and writes the batch through to disk.
    pub async fn append(&mut self, entries: Vec<Entry>, group: &str) -> Result<Vec<Entry>, TrackerError> {
        let mut next = self.data.clone();
        let start = next.entries.len();
        next.entries.extend(entries.into_iter().map(|mut entry| {
            entry.workout_group = group.to_string();
            entry
        }));

        persist_document(&self.path, &next).await?;
        let appended = next.entries[start..].to_vec();
        self.data = next;

        info!("appended {} entries for {group}", appended.len());
        Ok(appended)
    }

    pub fn all(&self) -> &[Entry] {
        &self.data.entries
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<Entry, TrackerError> {
        let index = self
            .data
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| TrackerError::not_found(format!("entry {id}")))?;

        let mut next = self.data.clone();
        let removed = next.entries.remove(index);
        persist_document(&self.path, &next).await?;
        self.data = next;

        info!("deleted entry {id} ({} on {})", removed.exercise, removed.date);
        Ok(removed)
    }

    pub fn for_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.data
            .entries
            .iter()
            .filter(move |entry| entry.workout_group == group)
    }

    pub fn for_exercise<'a>(&'a self, exercise: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.data
            .entries
            .iter()
            .filter(move |entry| entry.exercise == exercise)
    }

    /// Every entry, latest date first. Same-day entries keep append order.
    pub fn newest_first(&self) -> Vec<Entry> {
        let mut entries = self.data.entries.clone();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }
}
