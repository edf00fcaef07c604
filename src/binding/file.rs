//! Host model backed by a document on disk
//!
//! The document is a JSON (or YAML, by extension) object with the same keys a
//! notebook host would sync: `current_view`, `recommendations` and, after an
//! export, `selectedVisLst`. Edits made by another process are picked up by
//! `poll`, which compares modification times and diffs the reloaded document.

use super::{diff_documents, ChangeNotification, HostBinding, Subscribers, Subscription};
use crate::error::{BindingError, BindingResult};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }

    fn parse(self, contents: &str) -> BindingResult<Map<String, Value>> {
        let value: Value = match self {
            DocumentFormat::Json => serde_json::from_str(contents)?,
            DocumentFormat::Yaml => serde_yaml::from_str(contents)?,
        };
        match value {
            Value::Object(map) => Ok(map),
            // An empty YAML file parses as null
            Value::Null => Ok(Map::new()),
            _ => Err(BindingError::NotAnObject),
        }
    }

    fn render(self, document: &Map<String, Value>) -> BindingResult<String> {
        Ok(match self {
            DocumentFormat::Json => serde_json::to_string_pretty(document)?,
            DocumentFormat::Yaml => serde_yaml::to_string(document)?,
        })
    }
}

#[derive(Debug)]
pub struct FileBinding {
    path: PathBuf,
    format: DocumentFormat,
    document: Map<String, Value>,
    pending: Map<String, Value>,
    modified: Option<SystemTime>,
    subscribers: Subscribers,
}

impl FileBinding {
    /// Open and parse the host document
    pub fn open(path: impl Into<PathBuf>) -> BindingResult<Self> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path);
        let document = read_document(&path, format)?;
        let modified = modified_time(&path);

        tracing::info!(path = %path.display(), keys = document.len(), "opened host document");

        Ok(Self {
            path,
            format,
            document,
            pending: Map::new(),
            modified,
            subscribers: Subscribers::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the document and notify subscribers of the keys that changed
    fn reload(&mut self, modified: Option<SystemTime>) -> BindingResult<()> {
        // A half-written file fails to parse; the next poll retries it
        let reloaded = read_document(&self.path, self.format)?;
        self.modified = modified;

        let changed = diff_documents(&self.document, &reloaded);
        self.document = reloaded;

        if !changed.is_empty() {
            tracing::info!(keys = ?changed.keys().collect::<Vec<_>>(), "host document changed");
            self.subscribers.notify(&ChangeNotification::new(changed));
        }
        Ok(())
    }
}

fn read_document(path: &Path, format: DocumentFormat) -> BindingResult<Map<String, Value>> {
    let contents = fs::read_to_string(path).map_err(|source| BindingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&contents)
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl HostBinding for FileBinding {
    fn get(&self, key: &str) -> BindingResult<Option<Value>> {
        Ok(self
            .pending
            .get(key)
            .or_else(|| self.document.get(key))
            .cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> BindingResult<()> {
        self.pending.insert(key.to_string(), value);
        Ok(())
    }

    fn save(&mut self) -> BindingResult<()> {
        // Host edits since the last poll must survive the write
        self.reload(modified_time(&self.path))?;

        let mut next = self.document.clone();
        next.extend(self.pending.clone());

        let contents = self.format.render(&next)?;
        fs::write(&self.path, contents).map_err(|source| BindingError::Io {
            path: self.path.clone(),
            source,
        })?;

        // Our own write must not come back as a host change on the next poll
        self.document = next;
        self.pending.clear();
        self.modified = modified_time(&self.path);
        tracing::debug!(path = %self.path.display(), "saved host document");
        Ok(())
    }

    fn subscribe(&mut self) -> BindingResult<Subscription> {
        Ok(self.subscribers.subscribe())
    }

    fn poll(&mut self) -> BindingResult<()> {
        let modified = modified_time(&self.path);
        if modified == self.modified {
            return Ok(());
        }
        self.reload(modified)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
