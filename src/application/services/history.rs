//! History of saved submissions
//!
//! Records live in a single compact JSON array file, newest first. Loading
//! is tolerant: a corrupt file reads as an empty history, and individual
//! entries are coerced into shape instead of being rejected.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value as Json};
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::json::{self, dispose};
use crate::domain::{parser, SavedTree, TreeJson, Value};
use crate::infrastructure::traits::FileSystem;

/// File name of the store inside the data directory.
pub const STORE_FILE_NAME: &str = "trees.json";

/// Most recent submissions kept by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Fresh identifier for a record.
pub(crate) fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time as ISO-8601 UTC with millisecond precision.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Persistence collaborator for saved trees.
pub struct HistoryService {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl HistoryService {
    /// Create a history service backed by the store file at `path`.
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records, newest first.
    ///
    /// A missing store is an empty history. Malformed content is logged and
    /// also treated as empty; only I/O failures are errors.
    pub fn load(&self) -> ApplicationResult<Vec<SavedTree>> {
        if !self.fs.exists(&self.path) {
            debug!("load: no store at {}", self.path.display());
            return Ok(Vec::new());
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read", &self.path)?;

        let parsed = match json::from_str::<TreeJson>(&content) {
            Ok(v) => v.into_inner(),
            Err(e) => {
                warn!("ignoring unreadable history {}: {}", self.path.display(), e);
                return Ok(Vec::new());
            }
        };
        let entries = match parsed {
            Json::Array(entries) => entries,
            other => {
                dispose(other);
                warn!("ignoring history {}: not a JSON array", self.path.display());
                return Ok(Vec::new());
            }
        };

        let total = entries.len();
        let records: Vec<SavedTree> = entries
            .into_iter()
            .map(normalize_entry)
            .filter(|r| !r.numbers.is_empty())
            .collect();
        debug!("load: {} of {} entries usable", records.len(), total);
        Ok(records)
    }

    /// Replace the stored list.
    pub fn save(&self, records: &[SavedTree]) -> ApplicationResult<()> {
        debug!("save: {} records to {}", records.len(), self.path.display());
        let content = json::to_string(records).map_err(|e| ApplicationError::Storage {
            context: format!("serialize {}", self.path.display()),
            source: Box::new(e),
        })?;
        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create directory for", &self.path)?;
        self.fs
            .write(&self.path, &content)
            .with_path_context("write", &self.path)
    }

    /// Insert `record` at the front and keep at most `cap` records.
    pub fn append(&self, record: SavedTree, cap: usize) -> ApplicationResult<Vec<SavedTree>> {
        debug!("append: id={} cap={}", record.id, cap);
        let mut records = self.load()?;
        records.insert(0, record);
        records.truncate(cap);
        self.save(&records)?;
        Ok(records)
    }

    /// Look up one record.
    pub fn get(&self, id: &str) -> ApplicationResult<Option<SavedTree>> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    /// Delete one record. Returns whether it existed.
    pub fn remove_by_id(&self, id: &str) -> ApplicationResult<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            debug!("remove_by_id: {} not found", id);
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    /// Delete the whole store.
    pub fn clear(&self) -> ApplicationResult<()> {
        debug!("clear: {}", self.path.display());
        if self.fs.exists(&self.path) {
            self.fs
                .remove_file(&self.path)
                .with_path_context("remove", &self.path)?;
        }
        Ok(())
    }
}

/// Coerce one stored entry into a record.
fn normalize_entry(entry: Json) -> SavedTree {
    let mut fields = match entry {
        Json::Object(fields) => fields,
        other => {
            dispose(other);
            Map::new()
        }
    };

    let id = scalar_text(fields.get("id")).unwrap_or_else(new_record_id);
    let created_at = scalar_text(fields.get("createdAt")).unwrap_or_else(now_timestamp);
    let balanced = fields.get("balanced").is_some_and(truthy);
    let numbers = match fields.remove("numbers") {
        Some(Json::Array(items)) => items.into_iter().filter_map(coerce_number).collect(),
        Some(other) => {
            dispose(other);
            Vec::new()
        }
        None => Vec::new(),
    };
    let tree_json = fields
        .remove("json")
        .filter(|j| !j.is_null())
        .map(TreeJson::from);
    dispose(Json::Object(fields));

    SavedTree {
        id,
        created_at,
        numbers,
        balanced,
        json: tree_json,
    }
}

/// Text of a string, number or bool; `None` for anything else.
fn scalar_text(value: Option<&Json>) -> Option<String> {
    match value? {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric coercion of a stored list item: `null`, `false` and blank
/// strings count as 0, `true` as 1. Containers are dropped.
fn coerce_number(item: Json) -> Option<Value> {
    match item {
        Json::Number(n) => n.as_f64().and_then(Value::new),
        Json::Null => Some(Value::from(0)),
        Json::Bool(b) => Some(Value::from(i32::from(b))),
        Json::String(s) if s.trim().is_empty() => Some(Value::from(0)),
        Json::String(s) => parser::parse_token(s.trim()),
        other => {
            dispose(other);
            None
        }
    }
}

fn truthy(v: &Json) -> bool {
    match v {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Json::String(s) => !s.is_empty(),
        Json::Array(_) | Json::Object(_) => true,
    }
}
