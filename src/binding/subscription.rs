//! Change subscriptions
//!
//! A [`Subscription`] is released when it is dropped, so a subscriber cannot
//! leak past its owner or be released twice.

use super::ChangeNotification;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    senders: Vec<(u64, Sender<ChangeNotification>)>,
}

/// The binding-side list of active subscriptions
#[derive(Debug, Clone, Default)]
pub struct Subscribers {
    registry: Rc<RefCell<Registry>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.senders.push((id, tx));
        tracing::debug!(id, "subscription acquired");

        Subscription {
            id,
            receiver: rx,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver a notification to every live subscriber
    pub fn notify(&self, notification: &ChangeNotification) {
        let mut registry = self.registry.borrow_mut();
        registry
            .senders
            .retain(|(_, tx)| tx.send(notification.clone()).is_ok());
    }

    /// Number of subscriptions not yet released
    pub fn len(&self) -> usize {
        self.registry.borrow().senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle to one registration; dropping it unsubscribes
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: Receiver<ChangeNotification>,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// All notifications delivered since the last drain, oldest first
    pub fn drain(&self) -> Vec<ChangeNotification> {
        self.receiver.try_iter().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .senders
                .retain(|(id, _)| *id != self.id);
            tracing::debug!(id = self.id, "subscription released");
        }
    }
}
