//! In-memory host model
//!
//! Clones share the same model, so a test can hand one clone to the widget
//! and keep another to play the host.

use super::{ChangeNotification, HostBinding, Subscribers, Subscription};
use crate::error::{BindingError, BindingResult};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct ModelState {
    committed: Map<String, Value>,
    pending: Map<String, Value>,
    save_count: usize,
    fail_next_save: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBinding {
    state: Rc<RefCell<ModelState>>,
    subscribers: Subscribers,
}

impl MemoryBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing host document
    pub fn with_document(document: Map<String, Value>) -> Self {
        let binding = Self::new();
        binding.state.borrow_mut().committed = document;
        binding
    }

    /// Host-side write: commit the value and notify subscribers
    pub fn host_update(&self, key: &str, value: Value) {
        self.state
            .borrow_mut()
            .committed
            .insert(key.to_string(), value.clone());
        self.subscribers
            .notify(&ChangeNotification::single(key, value));
    }

    /// Value the host currently holds, ignoring staged writes
    pub fn committed(&self, key: &str) -> Option<Value> {
        self.state.borrow().committed.get(key).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.state.borrow().save_count
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Make the next `save` fail with the given reason
    pub fn fail_next_save(&self, reason: impl Into<String>) {
        self.state.borrow_mut().fail_next_save = Some(reason.into());
    }
}

impl HostBinding for MemoryBinding {
    fn get(&self, key: &str) -> BindingResult<Option<Value>> {
        let state = self.state.borrow();
        Ok(state
            .pending
            .get(key)
            .or_else(|| state.committed.get(key))
            .cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> BindingResult<()> {
        self.state
            .borrow_mut()
            .pending
            .insert(key.to_string(), value);
        Ok(())
    }

    fn save(&mut self) -> BindingResult<()> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = state.fail_next_save.take() {
            return Err(BindingError::SaveRejected(reason));
        }

        let pending = std::mem::take(&mut state.pending);
        state.committed.extend(pending);
        state.save_count += 1;
        Ok(())
    }

    fn subscribe(&mut self) -> BindingResult<Subscription> {
        Ok(self.subscribers.subscribe())
    }

    fn describe(&self) -> String {
        "in-memory model".to_string()
    }
}
