//! Saved pictures.
//!
//! The engine only knows how to encode its surface. Turning that into a stored picture is the
//! job of a [`PictureStore`]: the app ships an in-memory store (web, tests) and a store that
//! keeps one JSON document per picture in a directory (native).

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::engine::DrawingEngine;
use crate::error::SaveError;

/// Number of pictures per gallery page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Errors that can occur while storing or listing pictures
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize picture: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to access picture store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid picture file {path}: {reason}")]
    InvalidRecord { path: PathBuf, reason: String },
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A saved drawing as handed to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureRecord {
    pub id: Uuid,
    /// When the picture was saved, as a calendar date for display
    #[serde(default)]
    pub date: DateTime<Utc>,
    /// PNG data URI of the surface
    pub src: String,
    /// Milliseconds since the UNIX epoch, supplied by the caller
    pub timestamp: u64,
    pub user_email: String,
}

impl PictureRecord {
    pub fn new(src: String, timestamp: u64, user_email: impl Into<String>) -> Self {
        let date = i64::try_from(timestamp)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_default();
        Self {
            id: Uuid::new_v4(),
            date,
            src,
            timestamp,
            user_email: user_email.into(),
        }
    }

    /// Position of this record in the newest-first gallery order
    pub fn cursor(&self) -> PageCursor {
        PageCursor {
            timestamp: self.timestamp,
            id: self.id,
        }
    }
}

/// Marks the last record of a page; the next page starts after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub timestamp: u64,
    pub id: Uuid,
}

impl PageCursor {
    fn is_before(&self, record: &PictureRecord) -> bool {
        (record.timestamp, record.id) < (self.timestamp, self.id)
    }
}

/// Durable storage for saved pictures
pub trait PictureStore {
    fn save(&mut self, record: &PictureRecord) -> PersistenceResult<()>;

    /// Every stored record, in no particular order
    fn load_all(&self) -> PersistenceResult<Vec<PictureRecord>>;

    /// Up to `limit` records newest first, starting after `after` when given
    fn list_page(&self, after: Option<PageCursor>, limit: usize) -> PersistenceResult<Vec<PictureRecord>> {
        Ok(page_of(self.load_all()?, after, limit))
    }

    /// Every record whose author contains `query`, ignoring case, newest first and unpaginated
    fn search_by_user(&self, query: &str) -> PersistenceResult<Vec<PictureRecord>> {
        let needle = query.trim().to_lowercase();
        let mut records: Vec<PictureRecord> = self
            .load_all()?
            .into_iter()
            .filter(|record| record.user_email.to_lowercase().contains(&needle))
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }
}

/// Encode the engine's surface and hand it to `store`
pub fn save_picture(
    engine: &DrawingEngine,
    store: &mut dyn PictureStore,
    user_email: &str,
    timestamp: u64,
) -> Result<PictureRecord, SaveError> {
    if !engine.is_mounted() {
        return Err(SaveError::NotMounted);
    }
    let src = engine.to_data_uri()?;
    let record = PictureRecord::new(src, timestamp, user_email);
    store.save(&record)?;
    log::info!("Saved picture {} for {}", record.id, record.user_email);
    Ok(record)
}

fn sort_newest_first(records: &mut [PictureRecord]) {
    records.sort_by_key(|record| Reverse((record.timestamp, record.id)));
}

fn page_of(mut records: Vec<PictureRecord>, after: Option<PageCursor>, limit: usize) -> Vec<PictureRecord> {
    sort_newest_first(&mut records);
    records
        .into_iter()
        .filter(|record| after.is_none_or(|cursor| cursor.is_before(record)))
        .take(limit)
        .collect()
}

/// Keeps pictures in memory for the lifetime of the app
#[derive(Debug, Default)]
pub struct MemoryPictureStore {
    records: Vec<PictureRecord>,
}

impl MemoryPictureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PictureStore for MemoryPictureStore {
    fn save(&mut self, record: &PictureRecord) -> PersistenceResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn load_all(&self) -> PersistenceResult<Vec<PictureRecord>> {
        Ok(self.records.clone())
    }
}

/// Stores each picture as a pretty-printed JSON file in a directory
#[derive(Debug, Clone)]
pub struct JsonDirectoryStore {
    /// Directory where picture files are stored
    dir: PathBuf,
}

impl JsonDirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, record: &PictureRecord) -> PathBuf {
        self.dir
            .join(format!("picture_{}_{}.json", record.timestamp, record.id))
    }

    fn read_record(path: &Path) -> PersistenceResult<PictureRecord> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| PersistenceError::InvalidRecord {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl PictureStore for JsonDirectoryStore {
    fn save(&mut self, record: &PictureRecord) -> PersistenceResult<()> {
        // Create the directory if it doesn't exist
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.record_path(record), json)?;
        Ok(())
    }

    fn load_all(&self) -> PersistenceResult<Vec<PictureRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_picture = path
                .file_name()
                .map(|name| name.to_string_lossy())
                .is_some_and(|name| name.starts_with("picture_") && name.ends_with(".json"));
            if !is_picture {
                continue;
            }
            match Self::read_record(&path) {
                Ok(record) => records.push(record),
                Err(err) => log::warn!("Skipping unreadable picture: {err}"),
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: u64) -> PictureRecord {
        PictureRecord::new(format!("data:image/png;base64,{timestamp}"), timestamp, "ada@example.com")
    }

    #[test]
    fn record_serializes_camel_case() {
        let json = serde_json::to_value(record(42)).unwrap();
        assert_eq!(json["userEmail"], "ada@example.com");
        assert_eq!(json["timestamp"], 42);
        assert!(json.get("user_email").is_none());
    }

    #[test]
    fn record_date_follows_timestamp() {
        let record = record(1_700_000_000_000);
        assert_eq!(record.date.timestamp_millis(), 1_700_000_000_000);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["date"].as_str().unwrap().starts_with("2023-11-14"));
    }

    #[test]
    fn records_without_date_still_load() {
        let json = r#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","src":"data:","timestamp":5,"userEmail":"a@b.c"}"#;
        let record: PictureRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, DateTime::<Utc>::default());
    }

    #[test]
    fn search_matches_author_ignoring_case() {
        let mut store = MemoryPictureStore::new();
        for timestamp in 1..=12 {
            store.save(&record(timestamp)).unwrap();
        }
        store
            .save(&PictureRecord::new("data:".to_owned(), 50, "grace@example.com"))
            .unwrap();

        let ada = store.search_by_user("  ADA@").unwrap();
        assert_eq!(ada.len(), 12);
        assert_eq!(ada[0].timestamp, 12);

        let grace = store.search_by_user("grace").unwrap();
        assert_eq!(grace.len(), 1);
        assert!(store.search_by_user("nobody").unwrap().is_empty());
    }

    #[test]
    fn memory_store_pages_newest_first() {
        let mut store = MemoryPictureStore::new();
        for timestamp in 1..=25 {
            store.save(&record(timestamp)).unwrap();
        }

        let first = store.list_page(None, DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].timestamp, 25);
        assert_eq!(first[9].timestamp, 16);

        let second = store.list_page(first.last().map(PictureRecord::cursor), DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(second[0].timestamp, 15);

        let third = store.list_page(second.last().map(PictureRecord::cursor), DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(third.len(), 5);
        assert_eq!(third[4].timestamp, 1);
    }

    #[test]
    fn equal_timestamps_are_not_skipped_between_pages() {
        let mut store = MemoryPictureStore::new();
        for _ in 0..3 {
            store.save(&record(7)).unwrap();
        }
        let first = store.list_page(None, 2).unwrap();
        let second = store.list_page(first.last().map(PictureRecord::cursor), 2).unwrap();
        assert_eq!(first.len() + second.len(), 3);
    }

    #[test]
    fn directory_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirectoryStore::new(dir.path().join("pictures"));
        assert!(store.list_page(None, 10).unwrap().is_empty());

        let saved = record(1000);
        store.save(&saved).unwrap();
        store.save(&record(2000)).unwrap();
        fs::write(dir.path().join("pictures").join("notes.txt"), "ignored").unwrap();

        let listed = store.list_page(None, 10).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1], saved);
    }

    #[test]
    fn save_requires_mounted_surface() {
        let engine = DrawingEngine::default();
        let mut store = MemoryPictureStore::new();
        let result = save_picture(&engine, &mut store, "ada@example.com", 1);
        assert!(matches!(result, Err(SaveError::NotMounted)));
        assert!(store.is_empty());
    }

    #[test]
    fn save_stores_png_data_uri() {
        let mut engine = DrawingEngine::default();
        engine.mount(8, 8);
        let mut store = MemoryPictureStore::new();
        let record = save_picture(&engine, &mut store, "ada@example.com", 99).unwrap();
        assert!(record.src.starts_with("data:image/png;base64,"));
        assert_eq!(store.list_page(None, 10).unwrap(), vec![record]);
    }
}
