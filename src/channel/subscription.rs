use crate::channel::EventCallback;
use crate::model::GameEvent;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

pub(crate) type CallbackMap = Rc<RefCell<HashMap<usize, EventCallback>>>;

/// Handle for a registered event callback; dropping it unsubscribes.
pub struct Subscription {
    id: usize,
    callbacks: Weak<RefCell<HashMap<usize, EventCallback>>>,
}

impl Subscription {
    pub(crate) fn new(id: usize, callbacks: &CallbackMap) -> Self {
        Subscription {
            id,
            callbacks: Rc::downgrade(callbacks),
        }
    }

    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(callbacks) = self.callbacks.upgrade() {
            callbacks.borrow_mut().remove(&self.id);
        }
    }
}

/// Invoke every registered callback once. The map is snapshotted first so a
/// callback may subscribe, unsubscribe, or send again without holding the
/// borrow.
pub(crate) fn dispatch(callbacks: &CallbackMap, event: &GameEvent) {
    let snapshot: Vec<EventCallback> = callbacks.borrow().values().cloned().collect();
    for callback in snapshot {
        callback(event);
    }
}
