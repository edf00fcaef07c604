//! Host binding - the widget's connection to the model that owns its data
//!
//! The host owns `current_view` and `recommendations`; the widget only reads
//! them and writes `selectedVisLst` on export. The binding is injected into the
//! widget as a trait object so tests can substitute an in-memory model.

pub mod file;
pub mod memory;
pub mod subscription;

pub use file::FileBinding;
pub use memory::MemoryBinding;
pub use subscription::{Subscribers, Subscription};

use crate::error::BindingResult;
use serde_json::{Map, Value};

/// Host key holding the chart currently shown in the notebook
pub const CURRENT_VIEW_KEY: &str = "current_view";
/// Host key holding the list of recommendation groups
pub const RECOMMENDATIONS_KEY: &str = "recommendations";

/// Keys that changed on the host side, with their new values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChangeNotification {
    pub changed: Map<String, Value>,
}

impl ChangeNotification {
    pub fn new(changed: Map<String, Value>) -> Self {
        Self { changed }
    }

    pub fn single(key: impl Into<String>, value: Value) -> Self {
        let mut changed = Map::new();
        changed.insert(key.into(), value);
        Self { changed }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.changed.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.changed.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Typed access to the host model
///
/// `set` only stages a value; nothing reaches the host until `save`.
/// Notifications delivered through a [`Subscription`] describe host-side
/// changes only, never the binding's own saves.
pub trait HostBinding {
    /// Read a key, seeing staged values before committed ones
    fn get(&self, key: &str) -> BindingResult<Option<Value>>;

    /// Stage a value for the next `save`
    fn set(&mut self, key: &str, value: Value) -> BindingResult<()>;

    /// Commit all staged values to the host
    fn save(&mut self) -> BindingResult<()>;

    /// Register for change notifications; dropping the handle unsubscribes
    fn subscribe(&mut self) -> BindingResult<Subscription>;

    /// Check the host for changes and deliver notifications
    ///
    /// Bindings that push changes as they happen keep the default.
    fn poll(&mut self) -> BindingResult<()> {
        Ok(())
    }

    /// Short human-readable description for status lines
    fn describe(&self) -> String {
        "host".to_string()
    }
}

/// Keys whose values differ between two documents; removed keys map to `null`
pub fn diff_documents(old: &Map<String, Value>, new: &Map<String, Value>) -> Map<String, Value> {
    let mut changed = Map::new();

    for (key, value) in new {
        if old.get(key) != Some(value) {
            changed.insert(key.clone(), value.clone());
        }
    }
    for key in old.keys() {
        if !new.contains_key(key) {
            changed.insert(key.clone(), Value::Null);
        }
    }

    changed
}
